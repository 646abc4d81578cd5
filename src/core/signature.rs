//! Webhook 簽章驗證
//!
//! `Stripe-Signature` header 格式為 `t=<unix 秒>,v1=<hex hmac>[,v1=...]`，
//! 以 signing secret 對 `"{t}.{原始 body}"` 計算 HMAC-SHA256。
//! 任一 `v1` 相符即可，其他版本 (`v0`) 忽略。

use crate::domain::billing::Event;
use crate::utils::error::{Result, YpsError};
use ring::hmac;

pub const SIGNATURE_HEADER: &str = "stripe-signature";
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureValidation {
    Valid,
    /// 沒有 header
    Missing,
    /// 有 header 但缺少時間戳記或 `v1`
    Malformed,
    /// 沒有相符的 `v1` 簽章
    Invalid,
    /// 簽章正確但時間戳記超出容許範圍
    Expired { age_secs: i64 },
}

impl SignatureValidation {
    fn describe(&self) -> &'static str {
        match self {
            Self::Valid => "signature valid",
            Self::Missing => "No signatures found matching the expected signature for payload: missing Stripe-Signature header",
            Self::Malformed => "Unable to extract timestamp and signatures from header",
            Self::Invalid => "No signatures found matching the expected signature for payload",
            Self::Expired { .. } => "Timestamp outside the tolerance zone",
        }
    }
}

pub struct WebhookVerifier {
    key: hmac::Key,
    tolerance_secs: u64,
}

impl WebhookVerifier {
    /// `tolerance_secs == 0` 時不檢查時間戳記
    pub fn new(signing_secret: &str, tolerance_secs: u64) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, signing_secret.as_bytes()),
            tolerance_secs,
        }
    }

    pub fn validate(&self, header: Option<&str>, body: &[u8], now_unix: i64) -> SignatureValidation {
        let Some(header) = header else {
            return SignatureValidation::Missing;
        };

        let mut timestamp: Option<i64> = None;
        let mut signatures = Vec::new();
        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = value.parse().ok(),
                Some(("v1", value)) => signatures.push(value),
                _ => {}
            }
        }

        let Some(timestamp) = timestamp else {
            return SignatureValidation::Malformed;
        };
        if signatures.is_empty() {
            return SignatureValidation::Malformed;
        }

        let expected = hex::encode(self.sign(timestamp, body));
        let matched = signatures.iter().any(|candidate| {
            subtle::ConstantTimeEq::ct_eq(candidate.as_bytes(), expected.as_bytes()).into()
        });
        if !matched {
            return SignatureValidation::Invalid;
        }

        let age_secs = now_unix.saturating_sub(timestamp);
        if self.tolerance_secs > 0 && age_secs.unsigned_abs() > self.tolerance_secs {
            return SignatureValidation::Expired { age_secs };
        }

        SignatureValidation::Valid
    }

    /// 驗證並解析事件
    pub fn construct_event(&self, header: Option<&str>, body: &str, now_unix: i64) -> Result<Event> {
        match self.validate(header, body.as_bytes(), now_unix) {
            SignatureValidation::Valid => Ok(serde_json::from_str(body)?),
            failure => Err(YpsError::SignatureError {
                message: failure.describe().to_string(),
            }),
        }
    }

    fn sign(&self, timestamp: i64, body: &[u8]) -> hmac::Tag {
        let mut ctx = hmac::Context::with_key(&self.key);
        ctx.update(timestamp.to_string().as_bytes());
        ctx.update(b".");
        ctx.update(body);
        ctx.sign()
    }
}

/// 產生金流服務會送出的簽章 header
pub fn signature_header(signing_secret: &str, timestamp: i64, body: &str) -> String {
    let verifier = WebhookVerifier::new(signing_secret, 0);
    format!(
        "t={},v1={}",
        timestamp,
        hex::encode(verifier.sign(timestamp, body.as_bytes()))
    )
}
