pub mod service;
pub mod transport;
