use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatpix::bot::{self, dispatch};
use chatpix::config::Config;
use chatpix::openai::{mask_token, OpenAiService};
use chatpix::replicate::ReplicateService;
use chatpix::session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Chatpix Telegram Bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Configuration problems are fatal before any polling starts
    let config = Config::from_env()?;

    info!(
        bot_token_length = config.bot.token.len(),
        openai_api_key = %mask_token(&config.openai.api_key),
        openai_model = %config.openai.model,
        chat_timeout_secs = config.bot.chat_timeout.as_secs(),
        image_timeout_secs = config.bot.image_timeout.as_secs(),
        "Configuration loaded"
    );

    let completion: Arc<dyn chatpix::providers::CompletionProvider> =
        Arc::new(OpenAiService::new(&config.openai)?);
    let image: Arc<dyn chatpix::providers::ImageProvider> =
        Arc::new(ReplicateService::new(&config.replicate)?);

    let router = Arc::new(dispatch::Dispatcher::new(
        SessionStore::new(),
        completion,
        image,
        config.bot.chat_timeout,
        config.bot.image_timeout,
    ));

    // Initialize the bot
    let bot = Bot::new(config.bot.token.clone());

    info!("Bot initialized, starting dispatcher");

    // Set up the dispatcher with the shared router
    let handler = dptree::entry().branch(Update::filter_message().endpoint({
        let router = Arc::clone(&router);
        move |bot: Bot, msg: Message| {
            let router = Arc::clone(&router);
            async move { bot::message_handler(bot, msg, router).await }
        }
    }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
