//! Pipeline orchestration for a single call job.
//!
//! Stages run strictly in sequence; each one consumes the previous
//! stage's output. Failures before the transcript abort the job, failures
//! after it degrade the result (translation is best-effort). Progress is
//! pushed fire-and-forget so a slow or absent observer can never stall
//! processing.

use crate::audio::{AudioNormalizer, CommandRunner};
use crate::error::{CallscribeError, Result};
use crate::interest::InterestScorer;
use crate::pipeline::types::{CallJob, CallResult, ProgressEvent, Stage};
use crate::stt::Transcriber;
use crate::translate::Translator;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Orchestrates one call job from raw upload to `CallResult`.
///
/// Engines are injected as shared handles so a process-wide model (loaded
/// once at startup) can serve many pipelines; the pipeline itself holds no
/// mutable state and one instance may be shared by concurrent workers.
pub struct CallPipeline<R: CommandRunner> {
    normalizer: AudioNormalizer<R>,
    transcriber: Arc<dyn Transcriber>,
    translator: Arc<dyn Translator>,
    scorer: InterestScorer,
    source_language: String,
    progress_tx: Option<crossbeam_channel::Sender<ProgressEvent>>,
}

impl<R: CommandRunner> CallPipeline<R> {
    /// Create a pipeline with the default scorer and source language.
    pub fn new(
        normalizer: AudioNormalizer<R>,
        transcriber: Arc<dyn Transcriber>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            normalizer,
            transcriber,
            translator,
            scorer: InterestScorer::new(),
            source_language: crate::defaults::DEFAULT_SOURCE_LANGUAGE.to_string(),
            progress_tx: None,
        }
    }

    /// Replace the default interest scorer.
    pub fn with_scorer(mut self, scorer: InterestScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Set the spoken language passed to the translation engine.
    pub fn with_source_language(mut self, language: impl Into<String>) -> Self {
        self.source_language = language.into();
        self
    }

    /// Attach a progress channel (crossbeam, non-blocking).
    ///
    /// Senders are clonable, so one sink can observe many concurrent
    /// pipelines; events carry the job id to keep them apart.
    pub fn with_progress_sender(
        mut self,
        tx: crossbeam_channel::Sender<ProgressEvent>,
    ) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Push a milestone without ever blocking the pipeline.
    fn emit(&self, job: &CallJob, stage: Stage) {
        if let Some(ref tx) = self.progress_tx
            && tx.try_send(ProgressEvent::new(job.id, stage)).is_err()
        {
            // Observer gone or buffer full; processing continues regardless.
            warn!("[{}] progress event dropped at {:?}", job.id, stage);
        }
    }

    /// Process one call job to completion.
    ///
    /// Returns the assembled `CallResult`, or the typed error of the first
    /// load-bearing stage that failed. No progress events are emitted for
    /// a job whose normalization fails.
    pub fn process(&self, job: &CallJob) -> Result<CallResult> {
        info!(
            "[{}] processing call for client '{}' / customer '{}'",
            job.id, job.client_name, job.customer_name
        );

        let normalized = self.normalizer.normalize(&job.audio_path).map_err(|e| {
            error!("[{}] normalization failed: {}", job.id, e);
            e
        })?;
        self.emit(job, Stage::Preprocessed);

        let started = Instant::now();

        let transcript = self.transcriber.transcribe(&normalized).map_err(|e| {
            error!("[{}] transcription failed: {}", job.id, e);
            e
        })?;
        if transcript.is_empty() {
            error!("[{}] transcription produced no usable text", job.id);
            return Err(CallscribeError::EmptyTranscript);
        }
        self.emit(job, Stage::Transcribed);

        // Best-effort: a failed translation degrades the record, it does
        // not fail the job.
        let translation = match self
            .translator
            .translate(&transcript.text, &self.source_language)
        {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(
                    "[{}] translation failed, continuing without it: {}",
                    job.id, e
                );
                None
            }
        };

        let processing_time = started.elapsed();
        self.emit(job, Stage::Complete);

        let verdict = self.scorer.score(&transcript.text);

        info!(
            "[{}] done in {:.2}s: verdict={}, translated={}",
            job.id,
            processing_time.as_secs_f64(),
            verdict,
            translation.is_some()
        );

        CallResult::new(job, transcript, translation, verdict, processing_time)
    }
}
