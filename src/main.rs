use clap::Parser;
use raffle_lookup::adapters::store::LocalStore;
use raffle_lookup::config::cli::{CliConfig, Command};
use raffle_lookup::config::toml_config::TomlConfig;
use raffle_lookup::config::{Settings, DEFAULT_CONFIG_FILE};
use raffle_lookup::core::ingest::write_csv;
use raffle_lookup::core::query::{format_ticket_numbers, search, summary_line, total_tickets};
use raffle_lookup::utils::error::{ErrorSeverity, RaffleError, Result};
use raffle_lookup::utils::logger;
use raffle_lookup::utils::validation::{validate_required_field, Validate};
use raffle_lookup::{AppState, SheetPipeline, SyncEngine, UploadPipeline};
use std::path::Path;
use std::time::Duration;

fn load_settings(cli: &CliConfig) -> Result<Settings> {
    let toml = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            TomlConfig::from_file(path)?
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            tracing::debug!("Using ./{}", DEFAULT_CONFIG_FILE);
            TomlConfig::from_file(DEFAULT_CONFIG_FILE)?
        }
        None => TomlConfig::default(),
    };

    let mut settings = Settings::from_toml(&toml);
    cli.apply_overrides(&mut settings);
    settings.validate()?;

    tracing::debug!("Resolved settings: {:?}", settings);
    Ok(settings)
}

async fn run(cli: CliConfig, settings: Settings) -> Result<()> {
    let state = AppState::new(LocalStore::new(&settings.state_dir));

    match cli.command {
        Command::Search { query } => {
            if query.trim().is_empty() {
                println!("Enter a seller name to search");
                return Ok(());
            }

            let dataset = state.dataset().await?;
            let found = search(&dataset.entries, &query);
            if found.is_empty() {
                println!("No tickets found for \"{}\"", query);
                println!("Please check the spelling and try again");
                return Ok(());
            }

            let total = total_tickets(&found);
            println!(
                "{} ticket{} sold by \"{}\"",
                total,
                if total == 1 { "" } else { "s" },
                query
            );
            for entry in found {
                let numbers = entry.tickets.ticket_numbers();
                if numbers.is_empty() {
                    println!("  {:<28} {:>4}", entry.display_name(), entry.ticket_count);
                } else {
                    println!(
                        "  {:<28} {:>4}  ({})",
                        entry.display_name(),
                        entry.ticket_count,
                        format_ticket_numbers(&numbers)
                    );
                }
            }
        }
        Command::List => {
            let dataset = state.dataset().await?;
            for entry in &dataset.entries {
                println!("  {:<28} {:>4}", entry.display_name(), entry.ticket_count);
            }
            println!("{}", summary_line(&dataset, &state.last_updated().await?));
        }
        Command::Upload { file } => {
            let engine = SyncEngine::new(UploadPipeline::new(file, state));
            let summary = engine.run().await?;
            println!("✅ {}", summary.message());
        }
        Command::Sync { watch, .. } => {
            let stored = state.sheet_url().await?;
            let sheet_url = settings.sheet_url.clone().or(stored);
            let sheet_url = validate_required_field("sheet.url", &sheet_url)?.clone();

            let pipeline = SheetPipeline::from_config(&settings, sheet_url, state);
            let engine = SyncEngine::new(pipeline);

            if watch {
                let period = Duration::from_secs(settings.refresh_interval_secs);
                tracing::info!("🔁 Refreshing every {:?}, press Ctrl+C to stop", period);
                tokio::select! {
                    rounds = engine.run_every(period, None) => {
                        tracing::info!("Watch finished after {} successful round(s)", rounds);
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Stopping sheet refresh");
                    }
                }
            } else {
                let summary = engine.run().await?;
                println!("✅ {}", summary.message());
            }
        }
        Command::Export { file } => {
            let dataset = state.dataset().await?;
            let csv = write_csv(&dataset)?;
            tokio::fs::write(&file, csv).await?;
            println!(
                "📁 Wrote {} sellers to {}",
                dataset.len(),
                file.display()
            );
        }
        Command::Status => {
            let dataset = state.dataset().await?;
            println!("Data source: {}", state.data_source().await?);
            match state.sheet_url().await? {
                Some(url) => println!("Connected sheet: {}", url),
                None => println!("Connected sheet: none"),
            }
            println!("{}", summary_line(&dataset, &state.last_updated().await?));
        }
        Command::Reset => {
            let summary = state.reset().await?;
            println!("✅ Restored sample data: {}", summary.message());
        }
    }

    Ok(())
}

fn exit_code(err: &RaffleError) -> i32 {
    match err.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2, // 可重試
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let result = match load_settings(&cli) {
        Ok(settings) => run(cli, settings).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let code = exit_code(&e);
        if code > 0 {
            std::process::exit(code);
        }
    }
}
