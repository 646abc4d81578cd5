use crate::domain::billing::{
    BillingPortalSession, CheckoutSession, CheckoutSessionParams, Customer, List, Subscription,
};
use crate::domain::model::CustomerRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout_session(&self, params: &CheckoutSessionParams)
        -> Result<CheckoutSession>;
    async fn retrieve_checkout_session(&self, id: &str) -> Result<CheckoutSession>;
    async fn list_checkout_sessions(
        &self,
        customer_id: &str,
        limit: u32,
    ) -> Result<List<CheckoutSession>>;
    async fn create_billing_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<BillingPortalSession>;
    async fn retrieve_subscription(&self, id: &str) -> Result<Subscription>;
    async fn retrieve_customer(&self, id: &str) -> Result<Customer>;
    async fn list_customers(&self, limit: u32, expand: &[&str]) -> Result<List<Customer>>;
}

/// webhook 建立的客戶記錄存放處，實作可以只活在單次呼叫，不保證持久化
pub trait CustomerStore: Send + Sync {
    fn save_customer(&self, customer: CustomerRecord) -> Result<()>;
    fn customers(&self) -> Vec<CustomerRecord>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// 預估服務日使用的本地日期
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
