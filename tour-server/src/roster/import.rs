//! 試算表匯入解析
//!
//! 領隊拿到的名單格式五花八門：欄位標題可能是中文（房號/姓名）、
//! 英文（room/name）、大小寫混雜、前後帶空白。這裡負責把任意標題
//! 對映到標準欄位；對不出姓名的資料列直接略過，不中斷整批匯入。

use serde_json::Value;
use shared::models::TravelerCreate;

/// 可對映的名冊欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterField {
    FullName,
    RoomNumber,
    Gender,
    DietaryNeeds,
    LineUserId,
}

/// 將試算表標題對映到標準欄位（不分大小寫、去除前後空白）
pub fn resolve_header(header: &str) -> Option<RosterField> {
    let key = header.trim().to_lowercase();
    match key.as_str() {
        "姓名" | "名字" | "name" | "full_name" | "full name" | "fullname" => {
            Some(RosterField::FullName)
        }
        "房號" | "房号" | "房間" | "房间" | "room" | "room_no" | "room no" | "room_number"
        | "room number" | "roomno" => Some(RosterField::RoomNumber),
        "性別" | "性别" | "gender" | "sex" => Some(RosterField::Gender),
        "飲食" | "饮食" | "飲食需求" | "饮食需求" | "忌口" | "素食" | "diet" | "dietary"
        | "dietary_needs" | "dietary needs" => Some(RosterField::DietaryNeeds),
        "line" | "line id" | "line_id" | "line_user_id" | "lineid" => {
            Some(RosterField::LineUserId)
        }
        _ => None,
    }
}

/// 解析匯入資料列
///
/// 回傳可插入的團員清單；無法解析出姓名的列被靜默丟棄
/// （不計入筆數，也不中斷批次）。
pub fn parse_rows(group_id: Option<i64>, rows: &[Value]) -> Vec<TravelerCreate> {
    rows.iter()
        .filter_map(|row| parse_row(group_id, row))
        .collect()
}

fn parse_row(group_id: Option<i64>, row: &Value) -> Option<TravelerCreate> {
    let obj = row.as_object()?;

    let mut full_name = None;
    let mut room_number = None;
    let mut gender = None;
    let mut dietary_needs = None;
    let mut line_user_id = None;

    for (header, value) in obj {
        let Some(field) = resolve_header(header) else {
            continue;
        };
        let Some(text) = cell_text(value) else {
            continue;
        };
        match field {
            RosterField::FullName => full_name = Some(text),
            RosterField::RoomNumber => room_number = Some(text),
            RosterField::Gender => gender = Some(text),
            RosterField::DietaryNeeds => dietary_needs = Some(text),
            RosterField::LineUserId => line_user_id = Some(text),
        }
    }

    // 姓名是唯一的硬性要求
    let full_name = full_name?;

    Some(TravelerCreate {
        full_name,
        room_number: room_number.unwrap_or_default(),
        gender,
        dietary_needs,
        line_user_id,
        group_id,
    })
}

/// 儲存格轉文字：字串去空白，數字照印（試算表匯出常把房號存成數字）
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_header_aliases() {
        assert_eq!(resolve_header("姓名"), Some(RosterField::FullName));
        assert_eq!(resolve_header(" Name "), Some(RosterField::FullName));
        assert_eq!(resolve_header("房號"), Some(RosterField::RoomNumber));
        assert_eq!(resolve_header("ROOM_NO"), Some(RosterField::RoomNumber));
        assert_eq!(resolve_header("性別"), Some(RosterField::Gender));
        assert_eq!(resolve_header("飲食需求"), Some(RosterField::DietaryNeeds));
        assert_eq!(resolve_header("LINE ID"), Some(RosterField::LineUserId));
        assert_eq!(resolve_header("備註"), None);
    }

    #[test]
    fn test_parse_chinese_headers() {
        let rows = vec![json!({"姓名": "王小明", "房號": "101"})];
        let parsed = parse_rows(None, &rows);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].full_name, "王小明");
        assert_eq!(parsed[0].room_number, "101");
        assert!(parsed[0].gender.is_none());
    }

    #[test]
    fn test_numeric_room_cell() {
        let rows = vec![json!({"姓名": "李四", "房號": 808})];
        let parsed = parse_rows(None, &rows);
        assert_eq!(parsed[0].room_number, "808");
    }

    #[test]
    fn test_rows_without_name_are_dropped() {
        let rows = vec![
            json!({"姓名": "王小明", "房號": "101"}),
            json!({"房號": "102"}),
            json!({"姓名": "  ", "房號": "103"}),
            json!({"name": "Alice", "room": "9"}),
        ];
        let parsed = parse_rows(Some(7), &rows);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].full_name, "王小明");
        assert_eq!(parsed[1].full_name, "Alice");
        assert_eq!(parsed[1].group_id, Some(7));
    }
}
