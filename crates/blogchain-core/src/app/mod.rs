//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: アプリケーションの構築とワイヤリング
//! - **EntityResource**: entity ごとの CRUD + ledger mirroring
//! - **ChaincodeService**: ledger の add/get/set/delete と status code
//! - **ListView / EditForm / ConfirmationDialog**: 一覧・編集・削除確認の状態機械

pub mod builder;
pub mod chaincode;
pub mod confirm_dialog;
pub mod edit_form;
pub mod list_view;
pub mod resource;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::chaincode::{
    ChaincodeError, ChaincodeService, EntityStateView, NOT_FOUND, TransactionReceipt,
};
pub use self::confirm_dialog::{ConfirmationDialog, DialogError, DialogState};
pub use self::edit_form::{EditForm, FormError, FormMode};
pub use self::list_view::ListView;
pub use self::resource::{EntityResource, ResourceError};
