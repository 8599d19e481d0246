//! Domain identifiers (strongly-typed IDs).
//!
//! すべての ID は ULID ベースで、Phantom type によって種類ごとに型が分かれます。
//! `BlogId` と `BlogEntryId` は同じ 128-bit 表現ですが、コンパイル時に混同できません。
//!
//! Display は種類ごとのプレフィックス付き（`blog-`, `entry-`, `tag-`, `tx-`）で、
//! この文字列がそのまま ledger のキーになります。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// The supertraits let `Id<T>` pick up its derives for any marker, so generic
/// code over entities can compare, hash and copy ids without extra bounds.
pub trait IdMarker:
    fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord + Send + Sync + 'static
{
    /// Display で使うプレフィックス（例: "blog-", "entry-"）
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// ULID から Id を作成
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// 内部の ULID を取得
    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Error returned when a prefixed id string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id '{input}': expected '{prefix}<ulid>'")]
pub struct ParseIdError {
    pub input: String,
    pub prefix: &'static str,
}

impl<T: IdMarker> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError {
            input: s.to_string(),
            prefix: T::prefix(),
        };
        let raw = s.strip_prefix(T::prefix()).ok_or_else(err)?;
        let ulid = Ulid::from_string(raw).map_err(|_| err())?;
        Ok(Self::from_ulid(ulid))
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Blog のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlogKind {}

impl IdMarker for BlogKind {
    fn prefix() -> &'static str {
        "blog-"
    }
}

/// BlogEntry のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlogEntryKind {}

impl IdMarker for BlogEntryKind {
    fn prefix() -> &'static str {
        "entry-"
    }
}

/// Tag のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKind {}

impl IdMarker for TagKind {
    fn prefix() -> &'static str {
        "tag-"
    }
}

/// Ledger transaction のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Transaction {}

impl IdMarker for Transaction {
    fn prefix() -> &'static str {
        "tx-"
    }
}

/// Identifier of a Blog.
pub type BlogId = Id<BlogKind>;

/// Identifier of a BlogEntry.
pub type BlogEntryId = Id<BlogEntryKind>;

/// Identifier of a Tag.
pub type TagId = Id<TagKind>;

/// Identifier of a ledger transaction.
pub type TransactionId = Id<Transaction>;
