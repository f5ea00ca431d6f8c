pub mod config;
pub mod display;
pub mod errors;
pub mod kiosk;
pub mod resolution;
pub mod search;
pub mod store;
pub mod types;
