//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary intent sequences,
//! with completion outcomes interleaved the way the runtime delivers them.

use super::state::{ConvState, GATEWAY_FAILURE_TEXT};
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,4}",
        "[a-zA-Z0-9 ?']{1,40}",
    ]
}

fn arb_file_name() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}", prop_oneof![Just("csv"), Just("xlsx"), Just("xls")])
        .prop_map(|(stem, ext)| format!("{stem}.{ext}"))
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::UpdateDraft { text }),
        arb_text().prop_map(|text| Event::Submit { text }),
        arb_file_name().prop_map(|name| Event::AttachFile {
            attachment: Attachment::new(name)
        }),
        Just(Event::ClearAttachment),
        arb_text().prop_map(|text| Event::CompletionSucceeded { text }),
        Just(Event::CompletionFailed {
            reason: "simulated".to_string()
        }),
    ]
}

fn is_outcome(event: &Event) -> bool {
    matches!(
        event,
        Event::CompletionSucceeded { .. } | Event::CompletionFailed { .. }
    )
}

fn requests(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::RequestCompletion { .. }))
        .count()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Busy is true exactly while one request is outstanding, and never more
    /// than one request is outstanding.
    #[test]
    fn busy_tracks_outstanding_requests(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = ConvState::default();
        let mut outstanding = 0usize;

        for event in events {
            let outcome = is_outcome(&event);
            if let Ok(result) = transition(&state, event) {
                outstanding += requests(&result.effects);
                if outcome {
                    outstanding -= 1;
                }
                state = result.new_state;
            }
            prop_assert!(outstanding <= 1);
            prop_assert_eq!(state.busy, outstanding == 1);
        }
    }

    /// Refused events never change state.
    #[test]
    fn refused_events_leave_state_unchanged(
        setup in proptest::collection::vec(arb_event(), 0..20),
        next in arb_event(),
    ) {
        let mut state = ConvState::default();
        for event in setup {
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
        }

        let before = state.clone();
        if transition(&state, next).is_err() {
            prop_assert_eq!(state, before);
        }
    }

    /// An accepted submit appends exactly one user message with the text as
    /// given, and its settlement appends exactly one model or system message.
    #[test]
    fn submit_then_settle_appends_two_messages(
        text in "[a-zA-Z0-9?]{1,20}",
        succeed in any::<bool>(),
        reply in arb_text(),
    ) {
        let submitted = transition(&ConvState::default(), Event::Submit { text: text.clone() }).unwrap();
        prop_assert_eq!(submitted.new_state.messages.len(), 1);
        prop_assert_eq!(submitted.new_state.messages[0].author, Author::User);
        prop_assert_eq!(&submitted.new_state.messages[0].text, &text);
        prop_assert!(submitted.new_state.busy);

        let outcome = if succeed {
            Event::CompletionSucceeded { text: reply.clone() }
        } else {
            Event::CompletionFailed { reason: "x".to_string() }
        };
        let settled = transition(&submitted.new_state, outcome).unwrap();
        prop_assert_eq!(settled.new_state.messages.len(), 2);
        prop_assert!(!settled.new_state.busy);

        let last = &settled.new_state.messages[1];
        if succeed {
            prop_assert_eq!(last.author, Author::Model);
            prop_assert_eq!(&last.text, &reply);
        } else {
            prop_assert_eq!(last.author, Author::System);
            prop_assert_eq!(last.text.as_str(), GATEWAY_FAILURE_TEXT);
        }
    }

    /// Messages only grow, except on attachment changes which reset them.
    #[test]
    fn conversation_is_append_only_between_resets(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = ConvState::default();
        for event in events {
            let resets = matches!(event, Event::AttachFile { .. } | Event::ClearAttachment);
            if let Ok(result) = transition(&state, event) {
                if resets {
                    let expected = if result.new_state.attachment.is_some() { 2 } else { 0 };
                    prop_assert_eq!(result.new_state.messages.len(), expected);
                } else {
                    prop_assert!(result.new_state.messages.len() >= state.messages.len());
                    prop_assert_eq!(
                        &result.new_state.messages[..state.messages.len()],
                        &state.messages[..]
                    );
                }
                state = result.new_state;
            }
        }
    }

    /// Blank drafts are always refused.
    #[test]
    fn blank_submit_always_refused(text in "[ \t\n]{0,6}") {
        prop_assert_eq!(
            transition(&ConvState::default(), Event::Submit { text }).unwrap_err(),
            TransitionError::EmptyDraft
        );
    }
}
