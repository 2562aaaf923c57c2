//! `atlas research` — Run the research pipeline on a question.

use std::io::Write;

use atlas_config::AppConfig;
use atlas_pipeline::Pipeline;
use tracing::info;

pub async fn run(question: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early — give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set the environment variable:");
        eprintln!("    export GOOGLE_API_KEY='...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        eprintln!("  Get a Gemini key at: https://aistudio.google.com/apikey");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    if !config.search_enabled() {
        info!(
            "GOOGLE_SEARCH_API_KEY / GOOGLE_CSE_ID not set — running in LLM-only mode \
             (no web search)"
        );
    }

    let question = if question.is_empty() {
        prompt_for_question()?
    } else {
        question.join(" ")
    };

    let pipeline = Pipeline::from_config(&config)?;

    eprint!("  Researching...");
    let result = pipeline.run(&question).await;
    eprint!("\r               \r");
    let report = result?;

    if !report.subquestions.is_empty() {
        println!();
        println!("  Sub-questions:");
        for sq in &report.subquestions {
            println!("    - {sq}");
        }
    }

    println!();
    println!("===== Final Report =====");
    println!();
    println!("{}", report.report);

    Ok(())
}

fn prompt_for_question() -> Result<String, Box<dyn std::error::Error>> {
    print!("  Question > ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let question = line.trim().to_string();

    if question.is_empty() {
        return Err("No question provided.".into());
    }

    Ok(question)
}
