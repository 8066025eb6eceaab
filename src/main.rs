use std::{env, time::Duration};

use cmdbot::bot::{
    commands::{commands::BotResult, general::general_commands},
    dispatcher::builder::DispatcherBuilder,
    platforms::discord::event_loop::run_discord_bot,
    state::def::{BotConfig, BotError},
};
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> BotResult<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = env::var("CMDBOT_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    let owner_id = env::var("OWNER_ID").unwrap_or_default();
    let config = BotConfig::load_or_create(&config_path, &owner_id)?;
    info!("Loaded config from {config_path}");

    let token = env::var("DISCORD_TOKEN").map_err(|_| BotError::Config("DISCORD_TOKEN is not set".into()))?;

    let dispatcher = DispatcherBuilder::new(config).add_commands(general_commands()).build()?;

    loop {
        if let Err(e) = run_discord_bot(&token, dispatcher.clone()).await {
            error!("Discord client error: {e}");
        }
        warn!("Restarting Discord bot in 5 seconds");
        sleep(Duration::from_secs(5)).await;
    }
}
