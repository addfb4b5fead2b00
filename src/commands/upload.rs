use anyhow::Result;
use coursekit_core::state::{AppState, Route};
use tracing::info;

use super::course::{WaitMode, load_course};
use super::explain;
use crate::app::Settings;
use crate::cli::UploadArgs;
use crate::output;

pub async fn run_upload_command(
    state: &mut AppState,
    settings: &Settings,
    args: &UploadArgs,
) -> Result<()> {
    if let Ok(metadata) = std::fs::metadata(&args.file) {
        info!(
            file = %args.file.display(),
            size = %output::format_bytes(metadata.len()),
            "Uploading document"
        );
    }

    let route = state.upload(&args.file).await.map_err(explain)?;
    let Route::Course(course_id) = route else {
        return Ok(());
    };
    println!("Created course {course_id}");

    if args.watch {
        let snapshot = load_course(state, settings, &course_id, WaitMode::Stable).await?;
        println!("{}", output::status_line(&snapshot));
    } else {
        println!("Run `coursekit course {course_id}` to follow generation.");
    }
    Ok(())
}
