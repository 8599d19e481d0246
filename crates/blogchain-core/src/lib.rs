//! blogchain-core
//!
//! Blog / BlogEntry / Tag の CRUD と、書き込みの ledger mirroring。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, entities, validation, alerts）
//! - **ports**: 抽象化レイヤー（EntityStore, Ledger, Clock, IdGenerator）
//! - **impls**: in-memory 実装（InMemoryEntityStore, InMemoryLedger）
//! - **app**: builder, resources, chaincode, list / form / dialog
//! - **config**: TOML + 環境変数による設定
//! - **observability**: collection counts

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;
