//! Customer interest scoring over call transcripts.
//!
//! Weighted keyword matching: each phrase carries a weight, presence is
//! binary per phrase (repeated occurrences do not count twice), and the
//! verdict compares the interest total against the disinterest total.
//! Matching is plain substring search with no word-boundary or stemming
//! logic, so phrasing variants the tables don't list are not detected.

use serde::Serialize;
use std::fmt;

/// Phrases that signal purchase interest, with their weights.
pub const INTEREST_WEIGHTS: &[(&str, u32)] = &[
    ("interested", 3),
    ("buy", 4),
    ("purchase", 4),
    ("property", 3),
    ("schedule a visit", 5),
    ("within my budget", 4),
];

/// Phrases that signal disinterest, with their weights.
pub const DISINTEREST_WEIGHTS: &[(&str, u32)] = &[
    ("not interested", 4),
    ("too expensive", 3),
    ("maybe later", 2),
    ("just looking", 2),
    ("out of budget", 3),
    ("not now", 2),
];

/// Binary interest classification of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Interested,
    NotInterested,
}

impl Verdict {
    /// Export representation used in the CSV record.
    pub fn as_export_str(&self) -> &'static str {
        match self {
            Verdict::Interested => "Yes",
            Verdict::NotInterested => "No",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_export_str())
    }
}

/// Weighted keyword scorer.
///
/// Deterministic and case-insensitive. Ties resolve to `NotInterested`:
/// an uncertain signal is never flagged as a hot lead.
#[derive(Debug, Clone)]
pub struct InterestScorer {
    interest: Vec<(String, u32)>,
    disinterest: Vec<(String, u32)>,
}

impl InterestScorer {
    /// Create a scorer with the default weight tables.
    pub fn new() -> Self {
        Self::with_tables(INTEREST_WEIGHTS, DISINTEREST_WEIGHTS)
    }

    /// Create a scorer with custom weight tables.
    ///
    /// Phrases are lowered on construction so scoring never has to.
    pub fn with_tables(interest: &[(&str, u32)], disinterest: &[(&str, u32)]) -> Self {
        let lower = |table: &[(&str, u32)]| {
            table
                .iter()
                .map(|(phrase, weight)| (phrase.to_lowercase(), *weight))
                .collect()
        };
        Self {
            interest: lower(interest),
            disinterest: lower(disinterest),
        }
    }

    /// Sum the weights of the phrases present in the transcript.
    ///
    /// Returns `(interest_total, disinterest_total)`.
    pub fn tally(&self, transcript: &str) -> (u32, u32) {
        let lowered = transcript.to_lowercase();

        let sum = |table: &[(String, u32)]| {
            table
                .iter()
                .filter(|(phrase, _)| lowered.contains(phrase.as_str()))
                .map(|(_, weight)| weight)
                .sum()
        };

        (sum(&self.interest), sum(&self.disinterest))
    }

    /// Classify a transcript.
    ///
    /// `Interested` only when the interest total strictly exceeds the
    /// disinterest total; an empty transcript scores 0 vs 0 and lands on
    /// `NotInterested`.
    pub fn score(&self, transcript: &str) -> Verdict {
        let (interest, disinterest) = self.tally(transcript);
        if interest > disinterest {
            Verdict::Interested
        } else {
            Verdict::NotInterested
        }
    }
}

impl Default for InterestScorer {
    fn default() -> Self {
        Self::new()
    }
}
