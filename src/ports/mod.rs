//! Port traits between the domain and its adapters.

pub mod config_port;
pub mod quote_port;
