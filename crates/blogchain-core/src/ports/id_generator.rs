//! IdGenerator port - ID 生成の抽象化
//!
//! Stores assign ids on insert through this port; clients never choose them.
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（Clock の時刻 + ランダム部）

use crate::domain::ids::{Id, IdMarker};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は分散システムで使える ID を生成
///
/// The method is object-safe; typed ids come from [`next_id`].
pub trait IdGenerator: Send + Sync {
    fn next_ulid(&self) -> Ulid;
}

/// Generate a typed id from any generator.
pub fn next_id<T: IdMarker>(ids: &dyn IdGenerator) -> Id<T> {
    ids.next_ulid().into()
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}
