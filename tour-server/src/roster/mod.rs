//! 名冊模組 - 團員名單的讀取正規化、排序、匯入與容錯寫入
//!
//! # 模組結構
//!
//! - [`normalize`] - 新舊欄位正規化（結構漂移的讀取端對策）
//! - [`room_sort`] - 房號自然排序
//! - [`import`] - 試算表標題對映與批次匯入解析
//! - [`service`] - RosterService：對外的名冊操作入口

pub mod import;
pub mod normalize;
pub mod room_sort;
pub mod service;

pub use room_sort::{compare_rooms, sort_by_room};
pub use service::{RosterService, SaveOutcome};
