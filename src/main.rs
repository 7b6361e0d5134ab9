use anyhow::Result;
use callscribe::app::{AnalyzeOptions, run_analyze, run_check, run_models_command};
use callscribe::cli::{Cli, Commands};
use callscribe::config::Config;
use clap::{CommandFactory, Parser};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            audio,
            client,
            customer,
            model,
            language,
            results_dir,
            no_download,
            progress_json,
        } => {
            run_analyze(
                config,
                audio,
                client,
                customer,
                AnalyzeOptions {
                    model,
                    language,
                    results_dir,
                    no_download,
                    progress_json,
                    quiet: cli.quiet,
                },
            )
            .await?;
        }
        Commands::Models { action } => {
            run_models_command(action).await?;
        }
        Commands::Check => {
            run_check(config).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "callscribe",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/callscribe/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };

    Ok(config.with_env_overrides())
}
