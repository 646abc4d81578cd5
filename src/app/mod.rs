// Application layer: serverless handlers built on the domain ports.

pub mod functions;
pub mod http;
