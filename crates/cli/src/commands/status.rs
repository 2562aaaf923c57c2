//! `atlas status` — Show configuration status.

use atlas_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("Atlas Status");
    println!("============");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Model:          {}", config.model);
    println!("  Temperature:    {}", config.temperature);
    println!("  API key:        {}", if config.has_api_key() { "configured" } else { "NOT SET" });
    println!(
        "  Web search:     {}",
        if config.search_enabled() { "enabled" } else { "disabled (LLM-only mode)" }
    );
    println!("  Results/query:  {}", config.pipeline.results_per_query);
    println!("  Concurrency:    {}", config.pipeline.search_concurrency);
    println!("  Gateway:        {}:{}", config.gateway.host, config.gateway.port);

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  Config file found");
    } else {
        println!("\n  No config file — using defaults and environment variables");
    }

    Ok(())
}
