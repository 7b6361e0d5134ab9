//! Data types for the call-processing pipeline.

use crate::error::{CallscribeError, Result};
use crate::interest::Verdict;
use crate::stt::Transcript;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// One call-processing request.
///
/// Created by the upload handler; the pipeline reads the source audio but
/// never deletes it (cleanup is the owner's responsibility).
#[derive(Debug, Clone)]
pub struct CallJob {
    /// Unique id, also used to tag this job's progress events.
    pub id: Uuid,
    /// Path to the uploaded recording.
    pub audio_path: PathBuf,
    /// Agent who handled the call.
    pub client_name: String,
    /// Customer on the call.
    pub customer_name: String,
    /// When the job was submitted.
    pub submitted_at: DateTime<Local>,
}

impl CallJob {
    /// Create a job for an uploaded recording.
    ///
    /// Labels are opaque but must be non-empty.
    pub fn new(
        audio_path: impl Into<PathBuf>,
        client_name: impl Into<String>,
        customer_name: impl Into<String>,
    ) -> Result<Self> {
        let client_name = client_name.into();
        let customer_name = customer_name.into();

        if client_name.trim().is_empty() {
            return Err(CallscribeError::InvalidJob {
                message: "client name is empty".to_string(),
            });
        }
        if customer_name.trim().is_empty() {
            return Err(CallscribeError::InvalidJob {
                message: "customer name is empty".to_string(),
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            audio_path: audio_path.into(),
            client_name,
            customer_name,
            submitted_at: Local::now(),
        })
    }
}

/// Pipeline milestones reported to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Audio normalized, transcription about to start.
    Preprocessed,
    /// Transcript obtained, translation about to start.
    Transcribed,
    /// Processing finished.
    Complete,
}

impl Stage {
    /// Completion percentage at this milestone.
    ///
    /// Non-decreasing across the stage sequence of a single job.
    pub fn percent(&self) -> u8 {
        match self {
            Stage::Preprocessed => 0,
            Stage::Transcribed => 50,
            Stage::Complete => 100,
        }
    }
}

/// A progress milestone for one job, pushed to observers as it happens.
///
/// Events are tagged with the originating job id so subscribers can keep
/// concurrent jobs apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub job_id: Uuid,
    pub stage: Stage,
    pub percent: u8,
}

impl ProgressEvent {
    pub fn new(job_id: Uuid, stage: Stage) -> Self {
        Self {
            job_id,
            stage,
            percent: stage.percent(),
        }
    }
}

/// The terminal record of one processed call.
///
/// Immutable once constructed. `translation` is `None` when the
/// translation service failed, deliberately distinct from an empty
/// string, so consumers can tell "no speech" from "translation failed".
#[derive(Debug, Clone)]
pub struct CallResult {
    pub job_id: Uuid,
    pub client_name: String,
    pub customer_name: String,
    pub call_date: NaiveDate,
    pub transcript: Transcript,
    pub translation: Option<String>,
    pub verdict: Verdict,
    pub processing_time: Duration,
}

impl CallResult {
    /// Assemble the record for a finished job.
    ///
    /// Only constructible from a non-empty transcript; an empty one is the
    /// empty-transcript failure, never a result.
    pub fn new(
        job: &CallJob,
        transcript: Transcript,
        translation: Option<String>,
        verdict: Verdict,
        processing_time: Duration,
    ) -> Result<Self> {
        if transcript.is_empty() {
            return Err(CallscribeError::EmptyTranscript);
        }

        Ok(Self {
            job_id: job.id,
            client_name: job.client_name.clone(),
            customer_name: job.customer_name.clone(),
            call_date: job.submitted_at.date_naive(),
            transcript,
            translation,
            verdict,
            processing_time,
        })
    }

    /// Processing time as fixed two-decimal seconds, the export format.
    pub fn processing_time_str(&self) -> String {
        format!("{:.2}", self.processing_time.as_secs_f64())
    }

    /// Call date in `YYYY-MM-DD`, the export format.
    pub fn call_date_str(&self) -> String {
        self.call_date.format("%Y-%m-%d").to_string()
    }
}
