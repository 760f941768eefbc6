pub mod config;

pub use config::{Limits, ServerConfig, DEFAULT_BIND_ADDR};
