use crate::utils::error::{Result, YpsError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(YpsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(YpsError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(YpsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| YpsError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// 只回報欄位名稱，錯誤訊息不含密鑰內容
pub fn validate_non_empty_secret(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(YpsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(YpsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("site.url", "https://yardpoopservice.com").is_ok());
        assert!(validate_url("site.url", "http://localhost:8888").is_ok());
        assert!(validate_url("site.url", "").is_err());
        assert!(validate_url("site.url", "invalid-url").is_err());
        assert!(validate_url("site.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_secret_hides_value() {
        assert!(validate_non_empty_secret("stripe.secret_key", "sk_test_123").is_ok());
        match validate_non_empty_secret("stripe.secret_key", "   ") {
            Err(YpsError::InvalidConfigValueError { value, .. }) => assert!(value.is_empty()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("webhook.tolerance_seconds", 300u64, 0, 86_400).is_ok());
        assert!(validate_range("webhook.tolerance_seconds", 90_000u64, 0, 86_400).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("whsec_abc".to_string());
        let absent: Option<String> = None;
        assert!(validate_required_field("webhook.secret", &present).is_ok());
        assert!(matches!(
            validate_required_field("webhook.secret", &absent),
            Err(YpsError::MissingConfigError { .. })
        ));
    }
}
