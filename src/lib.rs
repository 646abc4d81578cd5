pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::{FixedClock, InMemoryCustomerStore, StripeClient};
pub use app::functions::{FunctionName, Functions};
pub use app::http::{FunctionRequest, FunctionResponse};
pub use config::FunctionsConfig;
pub use crate::core::quote::{calculate_quote, quote_for_input};
pub use crate::core::schedule::{next_service_date, next_service_date_from_str};
pub use utils::error::{Result, YpsError};
