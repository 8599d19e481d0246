//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryEntityStore**: entity ごとの in-memory store
//! - **InMemoryLedger**: world state + transaction log

pub mod inmem_ledger;
pub mod inmem_store;

pub use self::inmem_ledger::{InMemoryLedger, LedgerOp, LedgerTransaction};
pub use self::inmem_store::InMemoryEntityStore;
