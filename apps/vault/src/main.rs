//! # Amiibo Vault Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration
//! 3. Open the cache & run migrations
//! 4. Build the repository and the view-state holder
//! 5. Read commands from stdin until `quit` or end of input

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for testability
    match amiibo_vault::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("amiibo-vault: {e}");
            ExitCode::FAILURE
        }
    }
}
