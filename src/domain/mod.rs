// Domain layer: value types, provider object model and ports. No I/O here.

pub mod billing;
pub mod model;
pub mod ports;
