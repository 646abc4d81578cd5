use crate::domain::model::CustomerRecord;
use crate::domain::ports::CustomerStore;
use crate::utils::error::{Result, YpsError};
use std::sync::Mutex;

/// 只在單次呼叫期間保存的客戶記錄
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    customers: Mutex<Vec<CustomerRecord>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CustomerStore for InMemoryCustomerStore {
    fn save_customer(&self, customer: CustomerRecord) -> Result<()> {
        let mut customers = self
            .customers
            .lock()
            .map_err(|_| YpsError::config("customer store lock poisoned"))?;
        tracing::info!(
            "Customer saved: {}",
            customer.email.as_deref().unwrap_or("<no email>")
        );
        customers.push(customer);
        tracing::debug!("Total customers this invocation: {}", customers.len());
        Ok(())
    }

    fn customers(&self) -> Vec<CustomerRecord> {
        self.customers
            .lock()
            .map(|customers| customers.clone())
            .unwrap_or_default()
    }
}
