//! Text formatting for terminal output.

use coursekit_core::api::CourseSummary;
use coursekit_core::course::{CourseSnapshot, TabInfo};
use coursekit_core::{CourseContent, Flashcard, Question};

const TRUNCATE_AT: usize = 30;

/// Uppercases the first character.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `multiple-choice` -> `Multiple Choice`.
pub(crate) fn kebab_to_title(text: &str) -> String {
    text.split('-').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to 30 characters followed by `...`.
pub(crate) fn truncate(text: &str) -> String {
    if text.chars().count() <= TRUNCATE_AT {
        return text.to_string();
    }
    let head: String = text.chars().take(TRUNCATE_AT).collect();
    format!("{head}...")
}

/// Human-readable size, e.g. `1.5 KB`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

pub(crate) fn course_line(course: &CourseSummary) -> String {
    format!("{}  {}", course.id, truncate(course.display_title()))
}

fn tab_label(tab: &TabInfo) -> String {
    let label = if tab.badge.is_empty() {
        tab.label.to_string()
    } else {
        format!("{} {}", tab.label, tab.badge)
    };
    if tab.enabled {
        label
    } else {
        format!("[{label}]")
    }
}

/// One-line status, e.g. `settled | Course Content | [Flashcards (Generating...)] | Q&A (12)`.
pub(crate) fn status_line(snapshot: &CourseSnapshot) -> String {
    let tabs = snapshot.tabs();
    let labels: Vec<String> = tabs.iter().map(tab_label).collect();
    format!("{} | {}", snapshot.status, labels.join(" | "))
}

pub(crate) fn render_course(content: &CourseContent) -> String {
    let mut out = String::new();
    let title = if content.course_title.trim().is_empty() {
        "Untitled Course"
    } else {
        content.course_title.as_str()
    };
    out.push_str(title);
    out.push('\n');
    if !content.course_summary.is_empty() {
        out.push_str(&content.course_summary);
        out.push('\n');
    }
    for (index, chapter) in content.chapters.iter().enumerate() {
        out.push('\n');
        let emoji = if chapter.emoji.is_empty() {
            String::new()
        } else {
            format!("{} ", chapter.emoji)
        };
        out.push_str(&format!("{emoji}Chapter {}: {}\n", index + 1, chapter.chapter_title));
        if !chapter.chapter_summary.is_empty() {
            out.push_str(&format!("  {}\n", chapter.chapter_summary));
        }
        for topic in &chapter.topics {
            out.push_str(&format!("  - {topic}\n"));
        }
    }
    out
}

pub(crate) fn render_flashcard(card: &Flashcard, position: usize, total: usize, revealed: bool) -> String {
    let mut out = format!(
        "Card {position} of {total}  [{}]  {}\n\n{}\n",
        capitalize(card.difficulty.as_str()),
        card.category,
        card.front
    );
    if revealed {
        out.push_str(&format!("\n-> {}\n", card.back));
    }
    if !card.tags.is_empty() {
        out.push_str(&format!("\n#{}\n", card.tags.join(" #")));
    }
    out
}

pub(crate) fn render_question(question: &Question, show_answer: bool) -> String {
    let mut out = format!(
        "Question {}  [{}] [{}]\n{}\n",
        question.id,
        capitalize(question.difficulty.as_str()),
        kebab_to_title(question.question_type.as_str()),
        question.question
    );
    for (index, option) in question.choices().iter().enumerate() {
        let letter = char::from(b'A' + u8::try_from(index % 26).unwrap_or(0));
        let mark = if show_answer && question.is_correct(option) {
            "  <- correct"
        } else {
            ""
        };
        out.push_str(&format!("  {letter}. {option}{mark}\n"));
    }
    if !question.chapter.is_empty() {
        out.push_str(&format!("Chapter: {}\n", question.chapter));
    }
    if show_answer && !question.answer.is_empty() {
        for paragraph in question.answer.split("\\n") {
            out.push_str(&format!("  {paragraph}\n"));
        }
    }
    out
}
