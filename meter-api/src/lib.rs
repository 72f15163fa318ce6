pub mod config;
pub mod error;
pub mod metrics_server;
pub mod observability;
pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod state;
pub mod validation;

pub use config::AppConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
