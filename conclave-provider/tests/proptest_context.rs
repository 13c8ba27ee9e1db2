//! Property-based tests: context strategy invariants.

use conclave_provider::{ContentPart, ContextStrategy, Role, SlidingWindow, ProviderMessage};
use proptest::prelude::*;

fn arb_message() -> impl Strategy<Value = ProviderMessage> {
    ("[a-zA-Z ]{1,200}", prop_oneof![Just(Role::User), Just(Role::Assistant)]).prop_map(
        |(text, role)| ProviderMessage {
            role,
            content: vec![ContentPart::Text { text }],
        },
    )
}

proptest! {
    #[test]
    fn token_estimate_is_monotonic_in_message_count(
        messages in proptest::collection::vec(arb_message(), 1..20),
    ) {
        let strategy = SlidingWindow::new();
        let mut prev = 0;
        for i in 1..=messages.len() {
            let count = strategy.token_estimate(&messages[..i]);
            prop_assert!(count >= prev, "token estimate decreased: {} -> {} at message {}", prev, count, i);
            prev = count;
        }
    }

    #[test]
    fn token_estimate_is_positive_for_nonempty_text(msg in arb_message()) {
        let strategy = SlidingWindow::new();
        prop_assert!(strategy.token_estimate(std::slice::from_ref(&msg)) > 0);
    }

    #[test]
    fn compact_never_grows_the_transcript(
        messages in proptest::collection::vec(arb_message(), 1..30),
    ) {
        let strategy = SlidingWindow::new();
        let original_len = messages.len();
        let compacted = strategy.compact(messages);
        prop_assert!(compacted.len() <= original_len);
    }

    #[test]
    fn compact_preserves_the_first_message(
        messages in proptest::collection::vec(arb_message(), 3..30),
    ) {
        let strategy = SlidingWindow::new();
        let first = messages[0].clone();
        let compacted = strategy.compact(messages);
        prop_assert_eq!(&compacted[0].content, &first.content);
    }
}
