//! Multi-turn registration conversation, modeled as an explicit state value.
//!
//! The flow is passed into and returned from every turn — there is no shared
//! session state — so a driver can persist it, restart it, or drop it to
//! cancel, and the whole thing unit-tests without any messaging platform.
//!
//! Steps: last name → first name → middle name (skippable) → confirm.

use crate::name::{normalize, Profile};
use serde::{Deserialize, Serialize};

pub const PROMPT_LAST: &str = "Enter your last name (letters only).";
pub const PROMPT_FIRST: &str = "Enter your first name (letters only).";
pub const PROMPT_MIDDLE: &str = "Enter your middle name, or skip.";
pub const PROMPT_INVALID: &str =
    "Only letters, spaces and hyphens are allowed. Please try again.";
pub const PROMPT_CONFIRM_HINT: &str = "Confirm, or restart to enter the name again.";

/// Where the conversation stands and what has been collected so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum RegistrationFlow {
    AwaitingLast,
    AwaitingFirst { last: String },
    AwaitingMiddle { last: String, first: String },
    AwaitingConfirm { profile: Profile },
}

/// One user turn, as interpreted by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    Text(String),
    Skip,
    Confirm,
    Restart,
    Cancel,
}

/// Result of a turn: either keep going with a prompt, hand back a completed
/// profile, or stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Continue {
        flow: RegistrationFlow,
        prompt: String,
    },
    Completed(Profile),
    Cancelled,
}

impl RegistrationFlow {
    /// Begin a fresh conversation.
    pub fn start() -> (RegistrationFlow, &'static str) {
        (RegistrationFlow::AwaitingLast, PROMPT_LAST)
    }

    /// Consume one event and produce the next state.
    pub fn advance(self, event: FlowEvent) -> FlowOutcome {
        match event {
            FlowEvent::Cancel => FlowOutcome::Cancelled,
            FlowEvent::Restart => {
                let (flow, prompt) = RegistrationFlow::start();
                FlowOutcome::Continue {
                    flow,
                    prompt: prompt.to_string(),
                }
            }
            event => self.step(event),
        }
    }

    fn step(self, event: FlowEvent) -> FlowOutcome {
        match self {
            RegistrationFlow::AwaitingLast => match text_of(event) {
                Some(raw) => match normalize(&raw) {
                    Ok(last) => continue_with(
                        RegistrationFlow::AwaitingFirst { last },
                        PROMPT_FIRST,
                    ),
                    Err(_) => continue_with(RegistrationFlow::AwaitingLast, PROMPT_INVALID),
                },
                None => continue_with(RegistrationFlow::AwaitingLast, PROMPT_LAST),
            },

            RegistrationFlow::AwaitingFirst { last } => match text_of(event) {
                Some(raw) => match normalize(&raw) {
                    Ok(first) => continue_with(
                        RegistrationFlow::AwaitingMiddle { last, first },
                        PROMPT_MIDDLE,
                    ),
                    Err(_) => continue_with(
                        RegistrationFlow::AwaitingFirst { last },
                        PROMPT_INVALID,
                    ),
                },
                None => continue_with(RegistrationFlow::AwaitingFirst { last }, PROMPT_FIRST),
            },

            RegistrationFlow::AwaitingMiddle { last, first } => match event {
                FlowEvent::Skip => confirm_step(Profile {
                    last,
                    first,
                    middle: None,
                }),
                FlowEvent::Text(raw) => match normalize(&raw) {
                    Ok(middle) => confirm_step(Profile {
                        last,
                        first,
                        middle: Some(middle),
                    }),
                    Err(_) => continue_with(
                        RegistrationFlow::AwaitingMiddle { last, first },
                        PROMPT_INVALID,
                    ),
                },
                _ => continue_with(
                    RegistrationFlow::AwaitingMiddle { last, first },
                    PROMPT_MIDDLE,
                ),
            },

            RegistrationFlow::AwaitingConfirm { profile } => match event {
                FlowEvent::Confirm => FlowOutcome::Completed(profile),
                _ => confirm_step(profile),
            },
        }
    }
}

fn text_of(event: FlowEvent) -> Option<String> {
    match event {
        FlowEvent::Text(raw) => Some(raw),
        _ => None,
    }
}

fn continue_with(flow: RegistrationFlow, prompt: &str) -> FlowOutcome {
    FlowOutcome::Continue {
        flow,
        prompt: prompt.to_string(),
    }
}

fn confirm_step(profile: Profile) -> FlowOutcome {
    let prompt = format!("{}? {}", profile.full_name(), PROMPT_CONFIRM_HINT);
    FlowOutcome::Continue {
        flow: RegistrationFlow::AwaitingConfirm { profile },
        prompt,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(flow: RegistrationFlow, event: FlowEvent) -> (RegistrationFlow, String) {
        match flow.advance(event) {
            FlowOutcome::Continue { flow, prompt } => (flow, prompt),
            other => panic!("expected the flow to continue, got {other:?}"),
        }
    }

    #[test]
    fn happy_path_collects_all_pieces() {
        let (flow, prompt) = RegistrationFlow::start();
        assert_eq!(prompt, PROMPT_LAST);

        let (flow, _) = feed(flow, FlowEvent::Text("иванов".into()));
        let (flow, _) = feed(flow, FlowEvent::Text("иван".into()));
        let (flow, prompt) = feed(flow, FlowEvent::Text("петрович".into()));
        assert!(prompt.contains("Иванов Иван Петрович"));

        match flow.advance(FlowEvent::Confirm) {
            FlowOutcome::Completed(profile) => {
                assert_eq!(profile.full_name(), "Иванов Иван Петрович");
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn middle_name_can_be_skipped() {
        let (flow, _) = RegistrationFlow::start();
        let (flow, _) = feed(flow, FlowEvent::Text("Смит".into()));
        let (flow, _) = feed(flow, FlowEvent::Text("Джон".into()));
        let (flow, _) = feed(flow, FlowEvent::Skip);

        match flow.advance(FlowEvent::Confirm) {
            FlowOutcome::Completed(profile) => assert_eq!(profile.middle, None),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn invalid_input_reprompts_in_place() {
        let (flow, _) = RegistrationFlow::start();
        let (flow, prompt) = feed(flow, FlowEvent::Text("ivan123".into()));
        assert_eq!(prompt, PROMPT_INVALID);
        assert_eq!(flow, RegistrationFlow::AwaitingLast);

        // A valid retry moves on.
        let (flow, prompt) = feed(flow, FlowEvent::Text("иванов".into()));
        assert_eq!(prompt, PROMPT_FIRST);
        assert!(matches!(flow, RegistrationFlow::AwaitingFirst { .. }));
    }

    #[test]
    fn skip_is_only_meaningful_at_the_middle_step() {
        let (flow, _) = RegistrationFlow::start();
        let (flow, prompt) = feed(flow, FlowEvent::Skip);
        assert_eq!(prompt, PROMPT_LAST);
        assert_eq!(flow, RegistrationFlow::AwaitingLast);
    }

    #[test]
    fn restart_returns_to_the_first_step() {
        let (flow, _) = RegistrationFlow::start();
        let (flow, _) = feed(flow, FlowEvent::Text("Иванов".into()));
        let (flow, prompt) = feed(flow, FlowEvent::Restart);
        assert_eq!(prompt, PROMPT_LAST);
        assert_eq!(flow, RegistrationFlow::AwaitingLast);
    }

    #[test]
    fn cancel_works_at_any_step() {
        let (flow, _) = RegistrationFlow::start();
        assert_eq!(flow.advance(FlowEvent::Cancel), FlowOutcome::Cancelled);

        let (flow, _) = RegistrationFlow::start();
        let (flow, _) = feed(flow, FlowEvent::Text("Иванов".into()));
        assert_eq!(flow.advance(FlowEvent::Cancel), FlowOutcome::Cancelled);
    }

    #[test]
    fn unexpected_event_at_confirm_reprompts() {
        let (flow, _) = RegistrationFlow::start();
        let (flow, _) = feed(flow, FlowEvent::Text("Иванов".into()));
        let (flow, _) = feed(flow, FlowEvent::Text("Иван".into()));
        let (flow, _) = feed(flow, FlowEvent::Skip);

        let (flow, prompt) = feed(flow, FlowEvent::Text("да".into()));
        assert!(prompt.contains("Иванов Иван"));
        assert!(matches!(flow, RegistrationFlow::AwaitingConfirm { .. }));
    }

    #[test]
    fn flow_state_survives_serialization() {
        let flow = RegistrationFlow::AwaitingMiddle {
            last: "Иванов".into(),
            first: "Иван".into(),
        };
        let yaml = serde_yaml::to_string(&flow).unwrap();
        assert!(yaml.contains("awaiting_middle"));
        let parsed: RegistrationFlow = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, flow);
    }
}
