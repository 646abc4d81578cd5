use super::Functions;
use crate::app::http::{FunctionRequest, FunctionResponse};
use crate::core::schedule::{format_iso, next_service_date};
use crate::domain::billing::Customer;
use crate::domain::model::{CustomerSummary, ServiceDetails};
use crate::domain::ports::PaymentProvider;
use crate::utils::error::Result;
use futures::future::try_join_all;
use subtle::ConstantTimeEq;

const CUSTOMER_PAGE_SIZE: u32 = 100;

#[derive(Debug, PartialEq, Eq)]
enum AdminAuth {
    Granted,
    MissingCredentials,
    InvalidCredentials,
}

fn check_admin(authorization: Option<&str>, password: &str) -> AdminAuth {
    let Some(provided) = authorization.and_then(|h| h.strip_prefix("Bearer ")) else {
        return AdminAuth::MissingCredentials;
    };
    if bool::from(provided.as_bytes().ct_eq(password.as_bytes())) {
        AdminAuth::Granted
    } else {
        AdminAuth::InvalidCredentials
    }
}

impl<P: PaymentProvider> Functions<P> {
    /// 管理後台的客戶列表，附上預估的下次服務日
    pub async fn get_customers(&self, request: &FunctionRequest) -> FunctionResponse {
        if !request.is_method("GET") {
            return FunctionResponse::method_not_allowed();
        }

        let password = match self.config.require_admin_password() {
            Ok(password) => password,
            Err(e) => {
                tracing::error!("Admin password not configured: {}", e);
                return FunctionResponse::error(500, "Admin password not configured");
            }
        };

        match check_admin(request.header("authorization"), password) {
            AdminAuth::Granted => {}
            AdminAuth::MissingCredentials => {
                return FunctionResponse::error(401, "Unauthorized - Authentication required");
            }
            AdminAuth::InvalidCredentials => {
                tracing::error!("Invalid admin password provided");
                return FunctionResponse::error(403, "Forbidden - Invalid credentials");
            }
        }

        match self.customer_summaries().await {
            Ok(customers) => FunctionResponse::json(200, &customers),
            Err(e) => {
                tracing::error!("Error fetching customers: {}", e);
                FunctionResponse::error(500, e.to_string())
            }
        }
    }

    async fn customer_summaries(&self) -> Result<Vec<CustomerSummary>> {
        let customers = self
            .provider
            .list_customers(CUSTOMER_PAGE_SIZE, &["data.subscriptions"])
            .await?;
        if customers.has_more {
            tracing::warn!(
                "More than {} customers; only the first page is listed",
                CUSTOMER_PAGE_SIZE
            );
        }

        try_join_all(customers.data.into_iter().map(|c| self.summarize(c))).await
    }

    async fn summarize(&self, customer: Customer) -> Result<CustomerSummary> {
        let today = self.clock.today();
        let mut service = ServiceDetails::pending(&format_iso(today));

        if let Some(subscription) = customer.first_subscription() {
            let sessions = self.provider.list_checkout_sessions(&customer.id, 1).await?;

            if let Some(session) = sessions.data.first() {
                if let Some(frequency) = session.metadata_value("frequency") {
                    service.frequency = frequency.to_string();
                }
                if let Some(dogs) = session.metadata_value("dogs") {
                    service.dogs = dogs.to_string();
                }
                service.next_service_date =
                    format_iso(next_service_date(&service.frequency, today));
                service.status = subscription.status.clone();
            }
        }

        Ok(CustomerSummary {
            service_address: customer.shipping_address().cloned(),
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_admin() {
        assert_eq!(check_admin(None, "pw"), AdminAuth::MissingCredentials);
        assert_eq!(check_admin(Some("Basic cHc="), "pw"), AdminAuth::MissingCredentials);
        assert_eq!(check_admin(Some("Bearer nope"), "pw"), AdminAuth::InvalidCredentials);
        assert_eq!(check_admin(Some("Bearer "), "pw"), AdminAuth::InvalidCredentials);
        assert_eq!(check_admin(Some("Bearer pw"), "pw"), AdminAuth::Granted);
    }
}
