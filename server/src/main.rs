use clap::Parser;
use log::{error, info};
use server::assets::RenderAssets;
use server::commands::CommandEngine;
use server::config::ServerConfig;
use server::engine::Engine;
use server::network::Server;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();

    let assets = Arc::new(RenderAssets::generate()?);
    let engine = CommandEngine::new(config.rules(), assets)?;
    let (engine, handle) = Engine::new(engine);

    let server = Server::bind(&config.bind_address(), handle.clone(), config.static_root.clone()).await?;
    info!(
        "Stage delay {}ms, respawn delay {}ms, {} lives",
        config.stage_delay_ms, config.respawn_delay_ms, config.lives
    );

    let engine_handle = tokio::spawn(engine.run());
    let server_handle = tokio::spawn(server.run());

    tokio::select! {
        result = server_handle => {
            match result {
                Ok(Err(e)) => error!("Server error: {}", e),
                Err(e) => error!("Network task panicked: {}", e),
                Ok(Ok(())) => {}
            }
        }
        result = engine_handle => {
            if let Err(e) = result {
                error!("Engine task panicked: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
            handle.shutdown();
        }
    }

    Ok(())
}
