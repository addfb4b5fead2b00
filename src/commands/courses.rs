use anyhow::Result;
use coursekit_core::state::AppState;

use super::explain;
use crate::output;

pub async fn run_courses_command(state: &mut AppState) -> Result<()> {
    let courses = state.fetch_courses().await.map_err(explain)?;
    if courses.is_empty() {
        println!("No courses yet. Upload a document with `coursekit upload <FILE>`.");
        return Ok(());
    }
    for course in courses {
        println!("{}", output::course_line(course));
    }
    Ok(())
}
