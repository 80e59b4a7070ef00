//! Type definitions for the fake account detection pipeline

pub mod account;
pub mod verdict;

pub use account::{AccountRecord, ScoreRequest, SyntheticAccount};
pub use verdict::{AccountVerdict, ErrorPayload};
