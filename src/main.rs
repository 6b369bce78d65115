use std::sync::Arc;

use forum_warden::{bot, config::Settings, db::CooldownStore};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Forum Warden");

    // Load settings
    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(CooldownStore::load(&settings.cooldown_file));
    info!(
        "Loaded {} proposal cooldowns from {}",
        store.len(),
        store.path().display()
    );

    // Start the bot
    if let Err(e) = bot::framework::run(settings, store).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}
