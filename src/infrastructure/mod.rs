pub mod config;
pub mod http;
pub mod rendering;
pub mod services;

pub use config::ApiConfig;
pub use http::DashboardApiClient;
