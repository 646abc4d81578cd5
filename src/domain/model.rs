use crate::domain::billing::Address;
use serde::{Deserialize, Serialize};

/// 報價表單選的服務頻率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceFrequency {
    #[serde(rename = "1w")]
    Weekly,
    #[serde(rename = "2w")]
    TwiceWeekly,
    #[serde(rename = "bi")]
    Biweekly,
    #[serde(rename = "mo")]
    Monthly,
}

impl ServiceFrequency {
    /// 寬鬆解析，不認得的代碼一律視為每週
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "2w" => Self::TwiceWeekly,
            "bi" => Self::Biweekly,
            "mo" => Self::Monthly,
            _ => Self::Weekly,
        }
    }

    /// 結帳品項描述用的文字
    pub fn description_label(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::TwiceWeekly => "twice-weekly",
            Self::Biweekly => "bi-weekly",
            Self::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub weekly: f64,
    pub monthly: f64,
}

impl Quote {
    pub const ZERO: Quote = Quote {
        weekly: 0.0,
        monthly: 0.0,
    };

    pub fn is_zero(&self) -> bool {
        self.weekly == 0.0 && self.monthly == 0.0
    }
}

/// 結帳完成時組出的客戶資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub subscription_id: String,
    pub plan: Option<String>,
    pub status: String,
    pub service_frequency: String,
    pub dog_count: String,
    pub service_address: Address,
    pub next_service_date: String,
    pub current_period_end: Option<String>,
    pub created: String,
}

/// 管理後台客戶列表的一列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_address: Option<Address>,
    #[serde(flatten)]
    pub service: ServiceDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetails {
    pub frequency: String,
    pub dogs: String,
    pub next_service_date: String,
    pub status: String,
}

impl ServiceDetails {
    pub const DEFAULT_FREQUENCY: &'static str = "weekly";
    pub const DEFAULT_DOGS: &'static str = "1";
    pub const DEFAULT_STATUS: &'static str = "pending";

    pub fn pending(today: &str) -> Self {
        Self {
            frequency: Self::DEFAULT_FREQUENCY.to_string(),
            dogs: Self::DEFAULT_DOGS.to_string(),
            next_service_date: today.to_string(),
            status: Self::DEFAULT_STATUS.to_string(),
        }
    }
}
