//! 房號自然排序
//!
//! 房號是自由字串（"101"、"A9"、"本館 1203"），排序需要數值感知：
//! "9" 在 "10" 之前。數字段依數值比較，其餘逐字比較（ASCII 不分大小寫）。

use shared::models::Traveler;
use std::cmp::Ordering;

/// 依房號穩定排序（同房號保持原有順序）
pub fn sort_by_room(travelers: &mut [Traveler]) {
    // slice::sort_by 是穩定排序，平手時保留原順序
    travelers.sort_by(|a, b| compare_rooms(&a.room_number, &b.room_number));
}

/// 數值感知的房號比較
pub fn compare_rooms(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ac), Some(bc)) => {
                if ac.is_ascii_digit() && bc.is_ascii_digit() {
                    // 數字段：先去前導零，依 (位數, 字面) 比較避免溢位
                    let an = take_digits(&mut ai);
                    let bn = take_digits(&mut bi);
                    let at = an.trim_start_matches('0');
                    let bt = bn.trim_start_matches('0');
                    let ord = at.len().cmp(&bt.len()).then_with(|| at.cmp(bt));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                } else {
                    let al = ac.to_ascii_lowercase();
                    let bl = bc.to_ascii_lowercase();
                    match al.cmp(&bl) {
                        Ordering::Equal => {
                            ai.next();
                            bi.next();
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(c) = it.peek().copied() {
        if c.is_ascii_digit() {
            out.push(c);
            it.next();
        } else {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_traveler(id: i64, room: &str) -> Traveler {
        Traveler {
            id,
            full_name: format!("團員{id}"),
            room_number: room.to_string(),
            gender: "未指定".to_string(),
            dietary_needs: "無".to_string(),
            line_user_id: None,
            group_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_numeric_order_nine_before_ten() {
        assert_eq!(compare_rooms("9", "10"), Ordering::Less);
        assert_eq!(compare_rooms("10", "9"), Ordering::Greater);
    }

    #[test]
    fn test_mixed_alnum_rooms() {
        assert_eq!(compare_rooms("A9", "A10"), Ordering::Less);
        assert_eq!(compare_rooms("A10", "B2"), Ordering::Less);
        assert_eq!(compare_rooms("a9", "A10"), Ordering::Less); // 不分大小寫
    }

    #[test]
    fn test_leading_zeros_compare_equal() {
        assert_eq!(compare_rooms("007", "7"), Ordering::Equal);
    }

    #[test]
    fn test_sort_order() {
        let mut travelers = vec![
            make_traveler(1, "10"),
            make_traveler(2, "9"),
            make_traveler(3, "101"),
            make_traveler(4, "2"),
        ];
        sort_by_room(&mut travelers);
        let rooms: Vec<&str> = travelers.iter().map(|t| t.room_number.as_str()).collect();
        assert_eq!(rooms, vec!["2", "9", "10", "101"]);
    }

    #[test]
    fn test_stable_on_ties() {
        // 同房號（夫妻同房）必須保持原有順序
        let mut travelers = vec![
            make_traveler(1, "101"),
            make_traveler(2, "101"),
            make_traveler(3, "9"),
            make_traveler(4, "101"),
        ];
        sort_by_room(&mut travelers);
        let ids: Vec<i64> = travelers.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_empty_rooms_sort_first() {
        let mut travelers = vec![make_traveler(1, "3"), make_traveler(2, "")];
        sort_by_room(&mut travelers);
        assert_eq!(travelers[0].id, 2);
    }

    #[test]
    fn test_long_digit_runs_do_not_overflow() {
        assert_eq!(
            compare_rooms("99999999999999999998", "99999999999999999999"),
            Ordering::Less
        );
    }
}
