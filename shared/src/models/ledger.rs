//! Ledger Model

use serde::{Deserialize, Serialize};

/// Ledger entry entity (帳目)
///
/// 金額以 REAL 儲存，幣別另存欄位，與團務現場記帳習慣一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    pub id: i64,
    pub group_id: i64,
    /// 消費日 (ISO 8601 date)
    pub happened_on: Option<String>,
    /// 類別 (餐費/門票/交通/小費/雜支)
    pub category: Option<String>,
    pub description: String,
    pub amount: f64,
    pub currency: String,
    /// 墊付人
    pub payer: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create ledger entry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryCreate {
    pub group_id: i64,
    pub happened_on: Option<String>,
    pub category: Option<String>,
    pub description: String,
    pub amount: f64,
    /// 預設 TWD
    pub currency: Option<String>,
    pub payer: Option<String>,
}

/// Update ledger entry payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerEntryUpdate {
    pub happened_on: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub payer: Option<String>,
}
