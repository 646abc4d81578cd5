//! Serverless 事件與回應格式 (Netlify / API Gateway)

use crate::utils::error::{Result, YpsError};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRequest {
    #[serde(default)]
    pub path: String,
    pub http_method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl FunctionRequest {
    pub fn new(http_method: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// 不分大小寫查詢 header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_method(&self, method: &str) -> bool {
        self.http_method.eq_ignore_ascii_case(method)
    }

    /// 解碼 base64 body，之後 `body_str()` 讀到的就是原始內容
    pub fn decoded(mut self) -> Result<Self> {
        if !self.is_base64_encoded {
            return Ok(self);
        }
        if let Some(encoded) = self.body.take() {
            let bytes = general_purpose::STANDARD
                .decode(encoded.trim())
                .map_err(|e| YpsError::validation(format!("Invalid base64 body: {}", e)))?;
            let body = String::from_utf8(bytes)
                .map_err(|e| YpsError::validation(format!("Body is not UTF-8: {}", e)))?;
            self.body = Some(body);
        }
        self.is_base64_encoded = false;
        Ok(self)
    }

    pub fn body_str(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl FunctionResponse {
    pub fn text(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn json<T: Serialize>(status_code: u16, payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => {
                let mut response = Self::text(status_code, body);
                response
                    .headers
                    .insert("content-type".to_string(), "application/json".to_string());
                response
            }
            Err(e) => {
                tracing::error!("Failed to serialize response body: {}", e);
                Self::error(500, "Failed to serialize response")
            }
        }
    }

    /// 回傳 `{"error": message}`
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        let body = serde_json::json!({ "error": message.into() }).to_string();
        let mut response = Self::text(status_code, body);
        response
            .headers
            .insert("content-type".to_string(), "application/json".to_string());
        response
    }

    pub fn method_not_allowed() -> Self {
        Self::text(405, "Method Not Allowed")
    }

    pub fn json_body(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}
