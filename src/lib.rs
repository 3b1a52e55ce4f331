pub mod config;
pub mod duration;
pub mod market_data;
pub mod models;
pub mod quote;
pub mod schema;
pub mod volume;
