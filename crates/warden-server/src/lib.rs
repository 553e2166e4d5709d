pub mod bootstrap;
pub mod config;
pub mod handlers;
pub mod observability;
pub mod server;

pub use config::{
    AppConfig, BootstrapConfig, LogFormat, LoggingConfig, SeedUserConfig, ServerConfig,
};
pub use observability::init_tracing;
pub use server::{AppState, ServerBuilder, WardenApp, WardenServer, build_app};
