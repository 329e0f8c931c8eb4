use crate::models::availability::{to_human_readable, Weekday};
use crate::models::{DialogueState, FieldKind, BOOKING_FIELDS};
use crate::services::validation::{validate, ValidationError};

const BOOKING_KEYWORDS: [&str; 3] = ["demo", "book", "schedule"];
const CANCEL_COMMANDS: [&str; 4] = ["cancel", "stop", "quit", "exit"];

pub const CANCEL_ACK: &str =
    "No problem, I've cancelled the booking. Type \"book a demo\" whenever you want to start again.";

/// What the stepper wants the session to do after one answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Answer rejected; the dialogue stays on the same field.
    Rejected(ValidationError),
    /// Answer stored; the message prompts for the next field.
    Prompt(String),
    /// The last field is answered and the booking can be finalized.
    Ready,
}

pub fn is_booking_intent(message: &str) -> bool {
    let lower = message.to_lowercase();
    BOOKING_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub fn is_cancel_command(message: &str) -> bool {
    let trimmed = message.trim();
    CANCEL_COMMANDS
        .iter()
        .any(|c| trimmed.eq_ignore_ascii_case(c))
}

/// Enters the dialogue and returns the first question.
pub fn start(state: &mut DialogueState) -> &'static str {
    state.reset();
    state.is_active = true;
    BOOKING_FIELDS[0].prompt
}

pub fn advance(state: &mut DialogueState, input: &str) -> Step {
    let Some(field) = state.current_field() else {
        tracing::warn!(step = state.step_index, "dialogue out of range, restarting");
        return Step::Prompt(start(state).to_string());
    };

    let value = match validate(field.kind, input, &state.answers) {
        Ok(value) => value,
        Err(e) => return Step::Rejected(e),
    };
    state.answers.insert(field.kind, value.clone());

    let next_index = state.step_index + 1;
    let Some(next) = BOOKING_FIELDS.get(next_index) else {
        return Step::Ready;
    };
    state.step_index = next_index;

    let message = match field.kind {
        FieldKind::SelectedDay => {
            let day = Weekday::parse(&value).map(to_human_readable).unwrap_or_default();
            format!(
                "{value} it is. Available times on {value}: {day}. {}",
                next.prompt
            )
        }
        FieldKind::SelectedTime => format!(
            "{value} on {} noted. {}",
            state.answer(FieldKind::SelectedDay).unwrap_or_default(),
            next.prompt
        ),
        _ => next.prompt.to_string(),
    };

    Step::Prompt(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active() -> DialogueState {
        let mut state = DialogueState::default();
        start(&mut state);
        state
    }

    fn answer_all(state: &mut DialogueState, inputs: &[&str]) -> Vec<Step> {
        inputs.iter().map(|i| advance(state, i)).collect()
    }

    #[test]
    fn test_booking_intent_keywords() {
        assert!(is_booking_intent("I'd like a DEMO"));
        assert!(is_booking_intent("can I book something"));
        assert!(is_booking_intent("Schedule a call"));
        assert!(!is_booking_intent("hello there"));
    }

    #[test]
    fn test_cancel_command_is_whole_message() {
        assert!(is_cancel_command("Cancel"));
        assert!(is_cancel_command("  stop "));
        assert!(!is_cancel_command("please don't cancel"));
    }

    #[test]
    fn test_start_prompts_first_field() {
        let mut state = DialogueState::default();
        assert_eq!(start(&mut state), "What's your full name?");
        assert!(state.is_active);
        assert_eq!(state.step_index, 0);
        assert!(state.answers.is_empty());
    }

    #[test]
    fn test_invalid_answer_does_not_advance() {
        let mut state = active();
        state.step_index = 1;
        state.answers.insert(FieldKind::Name, "Jane".to_string());

        for _ in 0..3 {
            let step = advance(&mut state, "not-an-email");
            assert_eq!(step, Step::Rejected(ValidationError::InvalidEmail));
            assert_eq!(state.step_index, 1);
            assert!(!state.answers.contains_key(&FieldKind::Email));
        }
    }

    #[test]
    fn test_day_selection_lists_times_in_order() {
        let mut state = active();
        answer_all(&mut state, &["Jane Doe", "jane@x.com", "Acme", "+1 555 1234567", "Ayura", "3"]);

        let step = advance(&mut state, "monday works");
        assert_eq!(
            step,
            Step::Prompt(
                "Monday it is. Available times on Monday: 10:00 AM, 11:00 AM, 2:00 PM, 4:00 PM. Which time would you prefer?"
                    .to_string()
            )
        );
        assert_eq!(state.answer(FieldKind::SelectedDay), Some("Monday"));
        assert!(state.answer(FieldKind::SelectedTime).is_none());
    }

    #[test]
    fn test_answers_only_hold_reached_fields() {
        let mut state = active();
        answer_all(&mut state, &["Jane Doe", "jane@x.com", "Acme"]);
        assert_eq!(state.step_index, 3);
        let keys: Vec<FieldKind> = state.answers.keys().copied().collect();
        assert_eq!(keys, vec![FieldKind::Name, FieldKind::Email, FieldKind::Company]);
    }

    #[test]
    fn test_full_sequence_ends_ready() {
        let mut state = active();
        let steps = answer_all(
            &mut state,
            &["Jane Doe", "jane@x.com", "Acme", "+1 555 1234567", "Ayura", "3", "Monday", "10", "none"],
        );
        assert!(steps[..8].iter().all(|s| matches!(s, Step::Prompt(_))));
        assert_eq!(steps[8], Step::Ready);
        assert_eq!(state.step_index, BOOKING_FIELDS.len() - 1);
        assert_eq!(state.answer(FieldKind::SelectedTime), Some("10:00 AM"));
        assert_eq!(state.answer(FieldKind::ProductInterest), Some("Ayura"));
    }

    #[test]
    fn test_out_of_range_step_restarts() {
        let mut state = active();
        state.step_index = 42;
        let step = advance(&mut state, "anything");
        assert_eq!(step, Step::Prompt("What's your full name?".to_string()));
        assert_eq!(state.step_index, 0);
    }
}
