//! CLI command handlers.

mod auth;
mod course;
mod courses;
mod flashcards;
mod questions;
mod upload;

use anyhow::{Result, anyhow};
use coursekit_core::state::{Route, StateError};

use crate::app::Settings;
use crate::cli::Command;

pub use auth::{run_login_command, run_logout_command, run_register_command};
pub use course::run_course_command;
pub use courses::run_courses_command;
pub use flashcards::run_flashcards_command;
pub use questions::run_questions_command;
pub use upload::run_upload_command;

/// Runs one subcommand against the persisted app state.
pub async fn dispatch(command: Command, settings: &Settings) -> Result<()> {
    let mut state = settings.open_state()?;
    match command {
        Command::Login(args) => run_login_command(&mut state, &args).await,
        Command::Register(args) => run_register_command(&mut state, &args).await,
        Command::Logout => run_logout_command(&mut state),
        Command::Courses => run_courses_command(&mut state).await,
        Command::Upload(args) => run_upload_command(&mut state, settings, &args).await,
        Command::Course(args) => run_course_command(&mut state, settings, &args).await,
        Command::Flashcards(args) => run_flashcards_command(&mut state, settings, &args).await,
        Command::Questions(args) => run_questions_command(&mut state, settings, &args).await,
    }
}

/// Adds a next step to errors that end the session.
pub(crate) fn explain(error: StateError) -> anyhow::Error {
    match error.redirect() {
        Some(Route::Login) => anyhow!("{error}\n  Suggestion: run `coursekit login --email <EMAIL> --password <PASSWORD>`."),
        _ => anyhow::Error::new(error),
    }
}
