pub mod environment;
pub mod quote;
pub mod schedule;
pub mod signature;

pub use crate::domain::model::{Quote, ServiceFrequency};
pub use crate::utils::error::Result;
