// Adapters layer: concrete implementations of the domain ports.

pub mod clock;
pub mod memory_store;
pub mod stripe;

pub use clock::FixedClock;
pub use memory_store::InMemoryCustomerStore;
pub use stripe::StripeClient;
