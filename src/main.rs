//! relink - campus network auto-reconnect CLI
//!
//! A command-line tool that restores internet access on a managed campus
//! network: detect connectivity, join the campus Wi-Fi when no link is up,
//! and authenticate through the captive portal's web login flow.

use clap::Parser;
use relink_core::config::{DEFAULT_SSID, PLACEHOLDER_CREDENTIAL};
use relink_core::init_logging;

mod cli;

#[derive(Parser)]
#[command(name = "relink")]
#[command(about = "Restore campus network connectivity via Wi-Fi join and captive portal login")]
struct Cli {
    /// Portal account identifier
    #[arg(short = 'u', long, default_value = PLACEHOLDER_CREDENTIAL)]
    username: String,

    /// Portal account secret
    #[arg(short = 'p', long, default_value = PLACEHOLDER_CREDENTIAL)]
    password: String,

    /// Wireless network name to join
    #[arg(short = 's', long, default_value = DEFAULT_SSID)]
    ssid: String,

    /// Run browser automation without a visible window
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let cli = Cli::parse();

    let exit_code =
        cli::connect::run_connect(cli.username, cli.password, cli.ssid, cli.headless).await;
    std::process::exit(exit_code);
}
