//! `atlas serve` — Start the HTTP gateway with the web UI.

use atlas_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("Atlas Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "   Web search: {}",
        if config.search_enabled() { "enabled" } else { "disabled (LLM-only mode)" }
    );

    atlas_gateway::start(config).await?;

    Ok(())
}
