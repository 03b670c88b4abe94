//! PureScan - command-line entry point

use purescan::cli::{CliApp, exit_codes};

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Warning: Failed to load .env file: {}", e);
    }

    let code = match CliApp::new() {
        Ok(app) => match app.run().await {
            Ok(code) => code,
            Err(e) => {
                tracing::error!(error = %e, "Command failed");
                eprintln!("Error: {:#}", e);
                exit_codes::INTERNAL_ERROR
            }
        },
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::CONFIG_ERROR
        }
    };

    std::process::exit(code);
}
