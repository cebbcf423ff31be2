//! Libradesk connection smoke check.
//!
//! Probes the configured backend and, when smoke credentials are set in
//! the environment, runs a full login / profile-fetch / logout cycle.

use std::env;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libradesk_client::{Client, ClientConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = ClientConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libradesk_client={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Libradesk client v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Backend: {}", config.api.base_url);

    let client = Client::new(config)?;

    let state = client.auth().initialize();
    if state.is_authenticated {
        tracing::info!(
            "Restored session for {}",
            state.user.as_ref().map(|u| u.email.as_str()).unwrap_or("?")
        );
    } else {
        tracing::info!("No stored session");
    }

    if !client.auth().test_connection().await {
        tracing::error!("Backend unreachable");
        std::process::exit(1);
    }
    tracing::info!("Backend reachable");

    // Optional full cycle against a real account
    let credentials = (
        env::var("LIBRADESK_SMOKE_EMAIL"),
        env::var("LIBRADESK_SMOKE_PASSWORD"),
    );
    if let (Ok(email), Ok(password)) = credentials {
        let user = match client.auth().login(&email, &password, false).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!("Login failed: {}", e);
                std::process::exit(1);
            }
        };
        tracing::info!("Logged in as {} ({})", user.name, user.role);

        let me = client.auth().current_user().await?;
        tracing::info!("Profile confirmed for {}", me.email);

        client.auth().logout().await;
        tracing::info!("Logged out");
    }

    Ok(())
}
