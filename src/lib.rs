//! Coursekit Core Library
//!
//! Client-side core for a course-generation service: documents are uploaded,
//! the service generates course content, flashcards and practice questions
//! asynchronously, and the client polls until all three are ready.
//!
//! # Architecture
//!
//! - [`artifact`] - Parsing of the three artifact fields (absent, `"loading"`, JSON)
//! - [`record`] - Flashcard and question records with string-keyed filter fields
//! - [`filter`] - Filter option derivation and AND-filtering
//! - [`navigator`] - Cyclic cursor with a reveal flag
//! - [`browse`] - Filtered deck combining the filter engine and navigator
//! - [`api`] - HTTP client for the course service
//! - [`course`] - Course session controller (polling until stable)
//! - [`validation`] - Local credential and upload checks
//! - [`state`] - Injectable application state: auth, course list, uploads

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod artifact;
pub mod browse;
pub mod course;
pub mod filter;
pub mod navigator;
pub mod record;
pub mod state;
pub mod validation;
mod user_agent;

// Re-export commonly used types
pub use api::{ApiClient, ApiError};
pub use artifact::{Artifact, CourseContent, DecodeError, FlashcardSet, QuestionSet};
pub use browse::{RevealSet, StudyDeck};
pub use course::{
    ApplyPolicy, CourseFetcher, CourseSession, CourseSnapshot, SessionConfig, SessionStatus,
    TokenSource,
};
pub use filter::{ALL, FilterError, FilterOptions, FilterState};
pub use navigator::{Navigator, NavigatorState};
pub use record::{Difficulty, FilterFields, Flashcard, Question, QuestionType, RecordId, StudyRecord};
pub use state::{AppState, Route, StateError};
pub use validation::ValidationError;
