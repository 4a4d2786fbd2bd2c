//! Basic authentication example.
//!
//! Walks through the OAuth flow: prints the login URL, exchanges the code
//! from the redirect for a token and checks that the broker accepts it.
//!
//! Requires BROKER_API_KEY, BROKER_API_SECRET and BROKER_REDIRECT_URI.
//!
//! Run with: cargo run --example basic_auth -- <auth-code>

use investright_rs::auth::ExposeSecret;
use investright_rs::{AuthClient, NormalizedResponse};

#[tokio::main]
async fn main() -> investright_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let auth = AuthClient::from_env()?;

    let Some(code) = std::env::args().nth(1) else {
        println!("Open this URL, log in and rerun with the `code` from the redirect:");
        println!("  {}", auth.generate_auth_url()?);
        return Ok(());
    };

    println!("Exchanging authorization code...");
    let token = match auth.get_access_token(&code).await? {
        NormalizedResponse::Success { data } => data,
        NormalizedResponse::Error { code, message } => {
            println!("Login rejected: {message} ({code})");
            return Ok(());
        }
    };

    println!("Successfully authenticated!");
    println!("  Token length: {}", token.access_token().expose_secret().len());
    println!("  Expires at:   {:?}", token.expires_at());
    println!("  Refreshable:  {}", token.refresh_token().is_some());

    let valid = auth.validate_token(&token).await?;
    println!("\nBroker accepts token: {valid}");

    if token.refresh_token().is_some() {
        println!("\nRefreshing token...");
        let refreshed = auth.refresh(&token).await?;
        println!("{}", serde_json::to_string_pretty(&refreshed.map(|t| t.expires_at()))?);
    }

    println!("\nDone!");
    Ok(())
}
