//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Study companion for an AI course-generation service.
///
/// Upload a document, wait for the service to generate course content,
/// flashcards and practice questions, then study them in the terminal.
#[derive(Parser, Debug)]
#[command(name = "coursekit")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Course service base URL (overrides COURSEKIT_BACKEND_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Seconds between polls while materials are generating (1-3600)
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub poll_interval: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and save the session
    Login(CredentialArgs),
    /// Create an account and save the session
    Register(CredentialArgs),
    /// Forget the saved session
    Logout,
    /// List your courses
    Courses,
    /// Upload a document (.pdf, .doc, .docx, .txt, .md; up to 10MB)
    Upload(UploadArgs),
    /// Show a course, waiting until its materials are generated
    Course(CourseArgs),
    /// Study a course's flashcards interactively
    Flashcards(FlashcardArgs),
    /// List a course's practice questions
    Questions(QuestionArgs),
}

#[derive(Args, Debug)]
pub struct CredentialArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password (at least 6 characters)
    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Document to upload
    pub file: PathBuf,

    /// Keep polling the new course until its materials are ready
    #[arg(long)]
    pub watch: bool,
}

#[derive(Args, Debug)]
pub struct CourseArgs {
    /// Course id
    pub id: String,

    /// Fetch once and print whatever is ready
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Args, Debug)]
pub struct FlashcardArgs {
    /// Course id
    pub id: String,

    /// Only cards in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only cards of this difficulty (easy, medium, hard)
    #[arg(long)]
    pub difficulty: Option<String>,
}

#[derive(Args, Debug)]
pub struct QuestionArgs {
    /// Course id
    pub id: String,

    /// Only questions of this difficulty (easy, medium, hard)
    #[arg(long)]
    pub difficulty: Option<String>,

    /// Only questions of this type (e.g. multiple-choice)
    #[arg(long = "type", value_name = "TYPE")]
    pub question_type: Option<String>,

    /// Only questions from this chapter
    #[arg(long)]
    pub chapter: Option<String>,

    /// Show answers
    #[arg(long)]
    pub answers: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Cli::try_parse_from(["coursekit"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Cli::try_parse_from(["coursekit", "-v", "courses"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Cli::try_parse_from(["coursekit", "courses", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Cli::try_parse_from(["coursekit", "--quiet", "logout"]).unwrap();
        assert!(args.quiet);
        assert!(matches!(args.command, Command::Logout));
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["coursekit", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Cli::try_parse_from(["coursekit", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_login_requires_credentials() {
        let err = Cli::try_parse_from(["coursekit", "login", "--email", "a@b.co"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let args = Cli::try_parse_from([
            "coursekit",
            "login",
            "--email",
            "a@b.co",
            "--password",
            "secret",
        ])
        .unwrap();
        let Command::Login(credentials) = args.command else {
            panic!("expected login");
        };
        assert_eq!(credentials.email, "a@b.co");
    }

    #[test]
    fn test_cli_upload_watch() {
        let args = Cli::try_parse_from(["coursekit", "upload", "notes.md", "--watch"]).unwrap();
        let Command::Upload(upload) = args.command else {
            panic!("expected upload");
        };
        assert_eq!(upload.file, PathBuf::from("notes.md"));
        assert!(upload.watch);
    }

    #[test]
    fn test_cli_questions_filters() {
        let args = Cli::try_parse_from([
            "coursekit",
            "questions",
            "c1",
            "--difficulty",
            "hard",
            "--type",
            "essay",
            "--answers",
        ])
        .unwrap();
        let Command::Questions(questions) = args.command else {
            panic!("expected questions");
        };
        assert_eq!(questions.id, "c1");
        assert_eq!(questions.difficulty.as_deref(), Some("hard"));
        assert_eq!(questions.question_type.as_deref(), Some("essay"));
        assert!(questions.chapter.is_none());
        assert!(questions.answers);
    }

    #[test]
    fn test_cli_poll_interval_range() {
        let args = Cli::try_parse_from(["coursekit", "--poll-interval", "2", "course", "c1"]).unwrap();
        assert_eq!(args.poll_interval, Some(2));

        let err =
            Cli::try_parse_from(["coursekit", "--poll-interval", "0", "course", "c1"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_base_url_is_global() {
        let args = Cli::try_parse_from([
            "coursekit",
            "courses",
            "--base-url",
            "http://localhost:9000",
        ])
        .unwrap();
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:9000"));
    }
}
