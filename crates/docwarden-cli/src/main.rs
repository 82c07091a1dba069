// DocWarden - track compliance documents and their expiry dates

use docwarden_cli::output;
use docwarden_cli::router::CommandRouter;

#[tokio::main]
async fn main() {
    if let Err(e) = CommandRouter::route().await {
        tracing::debug!(details = %e.technical_details(), "Command failed");
        output::print_error(&e.user_message());
        std::process::exit(e.exit_code());
    }
}
