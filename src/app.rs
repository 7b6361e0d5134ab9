//! Composition root: wires config, engines, and the pipeline together for
//! the CLI commands.

use crate::audio::AudioNormalizer;
use crate::config::Config;
use crate::error::Result;
use crate::export;
use crate::models;
use crate::pipeline::{CallJob, CallPipeline, CallResult, ProgressEvent};
use crate::stt::{WhisperConfig, WhisperTranscriber};
use crate::translate::HttpTranslator;
use anyhow::Context;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Per-invocation options for the analyze command.
#[derive(Debug, Default)]
pub struct AnalyzeOptions {
    pub model: Option<String>,
    pub language: Option<String>,
    pub results_dir: Option<PathBuf>,
    pub no_download: bool,
    pub progress_json: bool,
    pub quiet: bool,
}

/// Run the full call-processing pipeline on one recording.
pub async fn run_analyze(
    config: Config,
    audio: PathBuf,
    client: String,
    customer: String,
    opts: AnalyzeOptions,
) -> anyhow::Result<()> {
    let model_name = opts.model.unwrap_or_else(|| config.stt.model.clone());
    let language = opts.language.unwrap_or_else(|| config.stt.language.clone());
    let results_dir = opts
        .results_dir
        .unwrap_or_else(|| config.export.results_dir.clone());

    if !models::is_model_installed(&model_name) {
        if opts.no_download {
            anyhow::bail!(
                "Model '{}' is not installed and --no-download was given.\n\
                 Install it with: callscribe models install {}",
                model_name,
                model_name
            );
        }
        models::download_model(&model_name, !opts.quiet)
            .await
            .with_context(|| format!("failed to download model '{}'", model_name))?;
    }
    let model_path = models::model_path(&model_name);

    let job = CallJob::new(audio, client, customer)?;

    if !opts.quiet {
        eprintln!("Processing call {}...", job.id);
    }

    // Progress printer: consumes events until the pipeline drops its sender.
    let (progress_tx, progress_rx) = crossbeam_channel::bounded::<ProgressEvent>(16);
    let progress_json = opts.progress_json;
    let quiet = opts.quiet;
    let printer = std::thread::spawn(move || {
        for event in progress_rx {
            if progress_json {
                if let Ok(line) = serde_json::to_string(&event) {
                    println!("{}", line);
                }
            } else if !quiet {
                eprintln!("  [{:>3}%] {:?}", event.percent, event.stage);
            }
        }
    });

    // Engine construction and the pipeline itself are blocking (model load,
    // ffmpeg, inference, HTTP with timeout), so keep them off the async runtime.
    let outcome = tokio::task::spawn_blocking(move || -> Result<CallResult> {
        let transcriber = WhisperTranscriber::new(WhisperConfig {
            model_path,
            language: language.clone(),
            threads: config.stt.threads,
        })?;
        let translator = HttpTranslator::new(
            config.translation.endpoint.clone(),
            Duration::from_secs(config.translation.timeout_secs),
        )?;

        let pipeline = CallPipeline::new(
            AudioNormalizer::system(config.audio.ffmpeg_path.clone(), config.audio.sample_rate),
            Arc::new(transcriber),
            Arc::new(translator),
        )
        .with_source_language(language)
        .with_progress_sender(progress_tx);

        pipeline.process(&job)
    })
    .await
    .context("pipeline worker panicked")?;

    // Sender dropped with the pipeline; the printer drains and exits.
    if printer.join().is_err() {
        eprintln!("callscribe: progress printer thread panicked");
    }
    let result = outcome?;

    if !opts.quiet {
        print_result(&result);
    }

    let csv_path = export::write_result(&result, &results_dir)?;
    println!("Saved: {}", csv_path.display());

    Ok(())
}

fn print_result(result: &CallResult) {
    println!();
    println!("Client:       {}", result.client_name);
    println!("Customer:     {}", result.customer_name);
    println!("Date of call: {}", result.call_date_str());
    println!("Language:     {}", result.transcript.language);
    println!("Transcript:   {}", result.transcript.text);
    match &result.translation {
        Some(text) => println!("Translation:  {}", text),
        None => println!("Translation:  {}", "(unavailable)".dimmed()),
    }
    match result.verdict {
        crate::interest::Verdict::Interested => {
            println!("Interested:   {}", "Yes".green().bold())
        }
        crate::interest::Verdict::NotInterested => {
            println!("Interested:   {}", "No".red())
        }
    }
    println!("Processing:   {}s", result.processing_time_str());
}

/// Handle `callscribe models <action>`.
pub async fn run_models_command(action: crate::cli::ModelsAction) -> anyhow::Result<()> {
    match action {
        crate::cli::ModelsAction::List => {
            for model in models::list_models() {
                println!("{}", models::download::format_model_info(model));
            }
        }
        crate::cli::ModelsAction::Install { name } => {
            let path = models::download_model(&name, true).await?;
            println!("Installed: {}", path.display());
        }
    }
    Ok(())
}

/// Handle `callscribe check`.
pub async fn run_check(config: Config) -> anyhow::Result<()> {
    // Blocking HTTP probe inside; keep it off the runtime.
    let ok = tokio::task::spawn_blocking(move || crate::diagnostics::check_dependencies(&config))
        .await
        .context("dependency check panicked")?;

    if !ok {
        anyhow::bail!("some required dependencies are missing");
    }
    Ok(())
}
