pub mod config;
pub mod endpoints;
pub mod observability;
pub mod routes;
pub mod seed;
pub mod state;

pub use config::AppConfig;
pub use routes::router;
pub use state::AppState;
