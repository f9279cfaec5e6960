//! layer-chat: interactive login, then send to or read from a chosen chat.
//!
//! Configure through the environment and run:
//!   API_ID=… API_HASH=… TEST_PHONE_NUMBER=+… cargo run -p layer-chat
//!
//! `TFA_PASSWORD` answers the 2FA challenge; without it you are asked.
//! Logging: RUST_LOG=layer_chat=debug for every RPC and its routing.

use std::sync::Arc;

use layer_chat::{Api, Config, Error, LayerBackend, StdinPrompt, actions, auth};
use layer_client::{Client, InMemoryBackend};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("layer_chat=info,layer_client=warn"),
    )
    .init();

    if let Err(e) = run().await {
        eprintln!("\n✗ {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;
    log::debug!("{config:?}");

    println!("🔌 Connecting …");
    let (client, _shutdown) = Client::connect(layer_client::Config {
        api_id:          config.api_id,
        api_hash:        config.api_hash.clone(),
        session_backend: Arc::new(InMemoryBackend::new()),
        ..Default::default()
    }).await?;

    let mut api    = Api::new(LayerBackend::new(client), config.api_id, config.api_hash.clone());
    let mut prompt = StdinPrompt;

    let me = auth::authenticate(&mut api, &mut prompt, &config).await?;
    println!("✅ Logged in as {me}");

    actions::run(&mut api, &mut prompt, &config).await
}
