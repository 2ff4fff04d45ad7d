//! LINE Messaging Gateway
//!
//! 對外推播的無狀態轉送層：不重試、不退避、不做逐收件人結果回報。
//! 上游失敗以不透明錯誤字串回給觸發的操作。
//!
//! 已知限制：群發不處理供應商單次上限的分批（LINE multicast 單次
//! 500 人）；超量由上游直接回錯。

use serde::{Deserialize, Serialize};

use crate::utils::{AppError, AppResult};

/// LINE 文字訊息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl LineMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// 群發結果
#[derive(Debug, Clone, Serialize)]
pub struct MulticastOutcome {
    /// 實際送達對象數（去重後）
    pub recipients: usize,
}

/// 去除重複收件人，保留首見順序
pub fn dedup_recipients(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .filter(|id| !id.trim().is_empty())
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// LINE 推播閘道
#[derive(Clone)]
pub struct MessagingGateway {
    http: reqwest::Client,
    api_base: String,
    channel_token: Option<String>,
}

impl MessagingGateway {
    pub fn new(api_base: impl Into<String>, channel_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            channel_token,
        }
    }

    fn token(&self) -> AppResult<&str> {
        self.channel_token
            .as_deref()
            .ok_or_else(|| AppError::invalid("LINE channel token not configured"))
    }

    /// 單推一則文字訊息
    pub async fn push_to_one(&self, to: &str, text: &str) -> AppResult<()> {
        let token = self.token()?;
        let body = serde_json::json!({
            "to": to,
            "messages": [LineMessage::text(text)],
        });

        let resp = self
            .http
            .post(format!("{}/v2/bot/message/push", self.api_base))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("LINE push failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(AppError::upstream(format!(
                "LINE push returned {status}: {detail}"
            )));
        }
        Ok(())
    }

    /// 群發訊息
    ///
    /// 收件人先去重；去重後為空時不發出任何外部請求，
    /// 直接回傳 0 人的成功結果。成敗為整批一體，無逐人結果。
    pub async fn multicast(
        &self,
        recipient_ids: &[String],
        messages: &[LineMessage],
    ) -> AppResult<MulticastOutcome> {
        let recipients = dedup_recipients(recipient_ids);
        if recipients.is_empty() {
            return Ok(MulticastOutcome { recipients: 0 });
        }

        let token = self.token()?;
        let body = serde_json::json!({
            "to": recipients,
            "messages": messages,
        });

        let resp = self
            .http
            .post(format!("{}/v2/bot/message/multicast", self.api_base))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("LINE multicast failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(AppError::upstream(format!(
                "LINE multicast returned {status}: {detail}"
            )));
        }

        Ok(MulticastOutcome {
            recipients: recipients.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let ids = vec![
            "a".to_string(),
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
            "c".to_string(),
            "b".to_string(),
        ];
        assert_eq!(dedup_recipients(&ids), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dedup_skips_blank_ids() {
        let ids = vec!["".to_string(), "  ".to_string(), "u1".to_string()];
        assert_eq!(dedup_recipients(&ids), vec!["u1"]);
    }

    #[tokio::test]
    async fn test_empty_multicast_is_zero_count_success() {
        // 未設定 token 也必須成功：空清單不應觸發任何外部請求
        let gateway = MessagingGateway::new("http://127.0.0.1:1", None);
        let outcome = gateway.multicast(&[], &[LineMessage::text("hi")]).await.unwrap();
        assert_eq!(outcome.recipients, 0);
    }

    #[tokio::test]
    async fn test_multicast_deduping_to_empty_is_success() {
        let gateway = MessagingGateway::new("http://127.0.0.1:1", None);
        let ids = vec!["".to_string(), " ".to_string()];
        let outcome = gateway.multicast(&ids, &[LineMessage::text("hi")]).await.unwrap();
        assert_eq!(outcome.recipients, 0);
    }

    #[tokio::test]
    async fn test_push_without_token_is_invalid() {
        let gateway = MessagingGateway::new("http://127.0.0.1:1", None);
        let err = gateway.push_to_one("u1", "hello").await.unwrap_err();
        assert!(matches!(err, AppError::Invalid(_)));
    }
}
