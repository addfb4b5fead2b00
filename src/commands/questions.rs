use anyhow::{Result, bail};
use coursekit_core::record::QUESTION_FILTER_KEYS;
use coursekit_core::state::AppState;
use coursekit_core::{FilterError, FilterFields, Question, RevealSet, StudyDeck};

use super::course::{WaitMode, load_course};
use crate::app::Settings;
use crate::cli::QuestionArgs;
use crate::output;

pub async fn run_questions_command(
    state: &mut AppState,
    settings: &Settings,
    args: &QuestionArgs,
) -> Result<()> {
    let snapshot = load_course(state, settings, &args.id, WaitMode::Stable).await?;
    let Some(set) = snapshot.questions.ready() else {
        bail!("Questions for course {} are not available", args.id);
    };

    let mut deck = StudyDeck::new(set.questions.clone(), &QUESTION_FILTER_KEYS);
    select_filter(&mut deck, "difficulty", args.difficulty.as_deref())?;
    select_filter(&mut deck, "type", args.question_type.as_deref())?;
    select_filter(&mut deck, "chapter", args.chapter.as_deref())?;

    let mut reveals = RevealSet::new();
    if args.answers {
        reveals.reveal_all(deck.visible().map(|question| &question.id));
    }
    print!("{}", render_list(&deck, &reveals));
    Ok(())
}

fn render_list(deck: &StudyDeck<Question>, reveals: &RevealSet) -> String {
    let mut out = format!("{}\n", deck.summary());
    if deck.visible_len() == 0 {
        out.push_str("No questions match the current filters.\n");
        return out;
    }
    for question in deck.visible() {
        out.push('\n');
        out.push_str(&output::render_question(question, reveals.is_revealed(&question.id)));
    }
    out
}

/// Applies an optional CLI filter, listing the valid values on a miss.
///
/// Values match the course's own spelling first, then ignoring ASCII case.
pub(crate) fn select_filter<R: FilterFields>(
    deck: &mut StudyDeck<R>,
    key: &str,
    value: Option<&str>,
) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let known = deck.options().get(key);
    let value = known
        .and_then(|values| {
            values
                .iter()
                .find(|option| option.as_str() == value)
                .or_else(|| values.iter().find(|option| option.eq_ignore_ascii_case(value)))
        })
        .map_or_else(|| value.to_string(), Clone::clone);

    match deck.select(key, &value) {
        Ok(()) => Ok(()),
        Err(FilterError::UnknownValue { .. }) => {
            let choices = deck
                .options()
                .get(key)
                .map(|values| values.join(", "))
                .unwrap_or_default();
            bail!("No {key} '{value}' in this course. Choose one of: {choices}")
        }
        Err(error) => Err(error.into()),
    }
}
