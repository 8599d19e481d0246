//! Ports - 抽象化レイヤー
//!
//! 各 trait は外部システム（entity store, ledger）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//! In-memory implementations live in `impls`.

pub mod clock;
pub mod entity_store;
pub mod id_generator;
pub mod ledger;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::entity_store::{EntityStore, StoreError};
pub use self::id_generator::{IdGenerator, UlidGenerator, next_id};
pub use self::ledger::{EntityState, Ledger, LedgerError};
