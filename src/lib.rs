pub mod types;
pub mod fee_sources;
pub mod sampling;
pub mod store;
pub mod interfaces;
pub mod context;
pub mod error;
pub mod config;
pub mod observability;
pub mod api;
pub mod utils;
