//! 名冊欄位正規化
//!
//! 資料庫結構歷經改版（name → full_name、room_no → room_number），
//! 舊資料列可能僅填舊欄位。讀取端的契約：**絕不因欄位缺漏或改名而
//! 漏掉一名團員**，缺漏值一律落到既定預設。

use crate::db::repository::traveler::TravelerRow;
use shared::models::Traveler;
use shared::models::traveler::{DIETARY_NONE, GENDER_UNSPECIFIED};

/// 將資料列正規化為標準團員結構
///
/// 回退順序：`full_name` → `name` → 空字串；`room_number` → `room_no` → 空字串。
/// `gender` 預設「未指定」，`dietary_needs` 預設「無」。
pub fn traveler_from_row(row: TravelerRow) -> Traveler {
    let full_name = first_present(row.full_name, row.name);
    let room_number = first_present(row.room_number, row.room_no);

    Traveler {
        id: row.id,
        full_name: full_name.unwrap_or_default(),
        room_number: room_number.unwrap_or_default(),
        gender: row
            .gender
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| GENDER_UNSPECIFIED.to_string()),
        dietary_needs: row
            .dietary_needs
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DIETARY_NONE.to_string()),
        line_user_id: row.line_user_id,
        group_id: row.group_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// 依序取第一個非空值
fn first_present(primary: Option<String>, legacy: Option<String>) -> Option<String> {
    primary
        .filter(|v| !v.trim().is_empty())
        .or_else(|| legacy.filter(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row() -> TravelerRow {
        TravelerRow {
            id: 1,
            name: None,
            room_no: None,
            full_name: None,
            room_number: None,
            gender: None,
            dietary_needs: None,
            line_user_id: None,
            group_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_legacy_name_fallback() {
        let mut row = make_row();
        row.name = Some("王小明".to_string());
        row.room_no = Some("101".to_string());

        let t = traveler_from_row(row);
        assert_eq!(t.full_name, "王小明");
        assert_eq!(t.room_number, "101");
    }

    #[test]
    fn test_canonical_fields_win_over_legacy() {
        let mut row = make_row();
        row.name = Some("舊名".to_string());
        row.full_name = Some("新名".to_string());
        row.room_no = Some("1".to_string());
        row.room_number = Some("202".to_string());

        let t = traveler_from_row(row);
        assert_eq!(t.full_name, "新名");
        assert_eq!(t.room_number, "202");
    }

    #[test]
    fn test_blank_canonical_falls_back_to_legacy() {
        let mut row = make_row();
        row.full_name = Some("   ".to_string());
        row.name = Some("李四".to_string());

        let t = traveler_from_row(row);
        assert_eq!(t.full_name, "李四");
    }

    #[test]
    fn test_defaults_applied() {
        let mut row = make_row();
        row.full_name = Some("張三".to_string());

        let t = traveler_from_row(row);
        assert_eq!(t.gender, "未指定");
        assert_eq!(t.dietary_needs, "無");
        assert_eq!(t.room_number, "");
    }

    #[test]
    fn test_never_drops_traveler_with_all_fields_missing() {
        let t = traveler_from_row(make_row());
        assert_eq!(t.id, 1);
        assert_eq!(t.full_name, "");
    }
}
