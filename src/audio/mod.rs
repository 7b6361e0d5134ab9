//! Audio normalization for uploaded call recordings.

pub mod normalizer;

pub use normalizer::{AudioNormalizer, CommandRunner, SystemCommandRunner};
