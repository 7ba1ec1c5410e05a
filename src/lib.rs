pub mod app;
pub mod auth;
pub mod config;
pub mod csrf;
pub mod error;
pub mod forms;
pub mod notify;
pub mod proxy;
pub mod rate_limit;
pub mod sanitize;
pub mod state;
pub mod store;
