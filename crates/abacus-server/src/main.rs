//! Abacus Server CLI
//!
//! Starts the arithmetic HTTP service with its calculation log.

use abacus_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let mut config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        ServerConfig::from_file(config_path)?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        // Use default test configuration
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: abacus-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_test_config()
    };

    // Environment wins over file values
    config.apply_env_overrides()?;

    // Start the server
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Abacus Server - Arithmetic Service with Calculation Log");
    println!();
    println!("USAGE:");
    println!("    abacus-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    abacus-server --config config/abacus.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (default: '0.0.0.0')");
    println!("    - bind_port: Port number (default: 3000)");
    println!("    - database_path: Path to the SQLite database file");
    println!();
    println!("ENVIRONMENT:");
    println!("    ABACUS_DATABASE    Overrides database_path");
    println!("    ABACUS_PORT        Overrides bind_port");
    println!("    RUST_LOG           Log filter (default: info)");
    println!();
}
