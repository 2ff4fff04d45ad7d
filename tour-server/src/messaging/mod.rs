//! 推播模組 - LINE Messaging API 閘道與身分綁定
//!
//! - [`gateway`] - 無狀態轉送：單推 / 群發（去重、空清單不打外部 API）
//! - [`binding`] - 以顯示名稱 + 團體加入碼綁定 LINE 推播身分

pub mod binding;
pub mod gateway;

pub use binding::{BindRequest, bind};
pub use gateway::{LineMessage, MessagingGateway, MulticastOutcome};
