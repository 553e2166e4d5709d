use clap::Parser;
use warden_server::ServerBuilder;
use warden_server::config::loader::{DEFAULT_CONFIG_PATH, load_config};

/// Demonstration API protected by HTTP Basic authentication.
#[derive(Debug, Parser)]
#[command(name = "warden-server", version, about)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "WARDEN_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    let args = Args::parse();

    let cfg = match load_config(Some(&args.config)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = warden_server::init_tracing(&cfg.logging) {
        eprintln!("Logging setup failed: {e}");
        std::process::exit(2);
    }
    tracing::info!(path = %args.config, "Configuration loaded");

    let server = match ServerBuilder::new().with_config(cfg).build().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Server initialization failed: {e}");
            std::process::exit(2);
        }
    };

    if let Err(err) = server.run().await {
        eprintln!("Server error: {err}");
        std::process::exit(1);
    }
}
