pub mod pushdown_config;
pub use pushdown_config::*;
