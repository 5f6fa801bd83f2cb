//! trander CLI entry point
//!
//! Random place discovery from the terminal

use trander::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
