//! 航班動態查詢
//!
//! 接機/送機看板用的非關鍵資訊。設定了 API 金鑰就查上游；
//! 金鑰缺漏或上游失敗時改用確定性的假資料產生器，
//! 這個顯示寧可給出穩定的假資料，也不要對使用者報錯。

use serde::{Deserialize, Serialize};

/// 航班動態
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightStatus {
    pub flight_no: String,
    /// 狀態字串（準時/延誤/登機中/已起飛）
    pub status: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    /// 表定起飛 (HH:MM)
    pub scheduled_departure: String,
    /// 表定抵達 (HH:MM)
    pub scheduled_arrival: String,
    pub gate: String,
    /// 資料來源："live" 或 "mock"
    pub source: String,
}

/// 航班查詢客戶端
#[derive(Clone)]
pub struct FlightStatusClient {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl FlightStatusClient {
    pub fn new(api_base: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            api_key,
        }
    }

    /// 查詢航班動態，失敗時回退假資料（不對呼叫端報錯）
    pub async fn lookup(&self, flight_no: &str) -> FlightStatus {
        let Some(key) = self.api_key.as_deref() else {
            return mock_status(flight_no);
        };

        match self.fetch_live(flight_no, key).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(flight_no, error = %e, "Flight lookup failed, falling back to mock data");
                mock_status(flight_no)
            }
        }
    }

    async fn fetch_live(&self, flight_no: &str, key: &str) -> Result<FlightStatus, String> {
        let resp = self
            .http
            .get(&self.api_base)
            .query(&[("access_key", key), ("flight_iata", flight_no)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !resp.status().is_success() {
            return Err(format!("upstream returned {}", resp.status()));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| e.to_string())?;
        let entry = body
            .get("data")
            .and_then(|d| d.get(0))
            .ok_or_else(|| "no flight data in response".to_string())?;

        let text = |path: &[&str]| -> String {
            let mut v = entry;
            for p in path {
                match v.get(p) {
                    Some(next) => v = next,
                    None => return String::new(),
                }
            }
            v.as_str().unwrap_or_default().to_string()
        };

        Ok(FlightStatus {
            flight_no: flight_no.to_string(),
            status: text(&["flight_status"]),
            departure_airport: text(&["departure", "iata"]),
            arrival_airport: text(&["arrival", "iata"]),
            scheduled_departure: text(&["departure", "scheduled"]),
            scheduled_arrival: text(&["arrival", "scheduled"]),
            gate: text(&["departure", "gate"]),
            source: "live".to_string(),
        })
    }
}

/// 確定性假資料：同一航班號永遠得到同一筆結果
///
/// 以 FNV-1a 雜湊航班號取位元，不碰時鐘也不用亂數，
/// 確保重新整理畫面不會看到跳動的假航班。
pub fn mock_status(flight_no: &str) -> FlightStatus {
    const ROUTES: [(&str, &str); 6] = [
        ("TPE", "NRT"),
        ("TPE", "KIX"),
        ("TPE", "HND"),
        ("TSA", "HND"),
        ("TPE", "ICN"),
        ("TPE", "BKK"),
    ];
    const STATUSES: [&str; 4] = ["準時", "準時", "登機中", "延誤"];

    let h = fnv1a(flight_no.trim().to_uppercase().as_bytes());

    let (dep, arr) = ROUTES[(h % ROUTES.len() as u64) as usize];
    let status = STATUSES[((h >> 8) % STATUSES.len() as u64) as usize];
    let dep_hour = 6 + ((h >> 16) % 15); // 06..20
    let dep_min = ((h >> 24) % 12) * 5;
    let duration_min = 150 + ((h >> 32) % 10) * 15;
    let arr_total = dep_hour * 60 + dep_min + duration_min;
    let gate_letter = (b'A' + ((h >> 40) % 4) as u8) as char;
    let gate_no = 1 + ((h >> 44) % 30);

    FlightStatus {
        flight_no: flight_no.trim().to_uppercase(),
        status: status.to_string(),
        departure_airport: dep.to_string(),
        arrival_airport: arr.to_string(),
        scheduled_departure: format!("{dep_hour:02}:{dep_min:02}"),
        scheduled_arrival: format!("{:02}:{:02}", (arr_total / 60) % 24, arr_total % 60),
        gate: format!("{gate_letter}{gate_no}"),
        source: "mock".to_string(),
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
        (h ^ u64::from(*b)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_is_deterministic() {
        let a = mock_status("BR198");
        let b = mock_status("BR198");
        assert_eq!(a, b);
    }

    #[test]
    fn test_mock_normalizes_flight_no() {
        let a = mock_status("br198");
        let b = mock_status(" BR198 ");
        assert_eq!(a, b);
        assert_eq!(a.flight_no, "BR198");
    }

    #[test]
    fn test_mock_fields_are_plausible() {
        let s = mock_status("CI100");
        assert_eq!(s.source, "mock");
        assert!(!s.departure_airport.is_empty());
        assert!(!s.gate.is_empty());
        // HH:MM 格式
        assert_eq!(s.scheduled_departure.len(), 5);
        assert!(s.scheduled_departure.contains(':'));
    }

    #[tokio::test]
    async fn test_lookup_without_key_uses_mock() {
        let client = FlightStatusClient::new("http://127.0.0.1:1", None);
        let s = client.lookup("JX800").await;
        assert_eq!(s.source, "mock");
    }

    #[tokio::test]
    async fn test_lookup_with_unreachable_upstream_falls_back() {
        // 金鑰在但上游打不到 → 回退假資料而非報錯
        let client = FlightStatusClient::new("http://127.0.0.1:1", Some("key".to_string()));
        let s = client.lookup("JX800").await;
        assert_eq!(s.source, "mock");
    }
}
