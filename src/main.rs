use clap::Parser;
use simple_cea::utils::{logger, validation::Validate};
use simple_cea::{CeaEngine, CeaPipeline, CliConfig, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting simple-cea CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!(
        "✅ Configuration ready: {} (discount rate {}, horizon {} years, WTP {})",
        config.analysis.name,
        config.discount.rate,
        config.discount.horizon_years,
        config.threshold.wtp.value()
    );

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = CeaPipeline::new(storage, config);
    let engine = CeaEngine::new(pipeline);

    let outcome = if cli.dry_run {
        engine.preview().await
    } else {
        engine.run().await
    };

    match outcome {
        Ok(outcome) => {
            tracing::info!(
                "✅ Analysis completed, {} artifact(s) written",
                outcome.artifacts.len()
            );
        }
        Err(e) => {
            tracing::error!("❌ Analysis failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
