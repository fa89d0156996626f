//! Property tests for background/redirection resolution.

use proptest::prelude::*;
use shellkit::{BACKGROUND_MARKER, Parser, Pid};

fn parser() -> Parser {
    Parser::new(Pid::from_raw(7), 511)
}

proptest! {
    /// A trailing `&` never survives into the argv, and the background
    /// flag is set exactly when the marker was present and foreground-only
    /// mode was off.
    #[test]
    fn trailing_marker_never_survives(
        words in prop::collection::vec("[a-z]{1,6}", 1..6),
        background in any::<bool>(),
        foreground_only in any::<bool>(),
    ) {
        let mut line = words.join(" ");
        if background {
            line.push_str(" &");
        }

        let cmd = parser().parse(&line).resolve(foreground_only);
        prop_assert_ne!(
            cmd.argv().last().map(String::as_str),
            Some(BACKGROUND_MARKER)
        );
        prop_assert_eq!(cmd.background(), background && !foreground_only);
    }

    /// With foreground-only mode active nothing is ever marked background.
    #[test]
    fn foreground_only_mode_suppresses_background(
        words in prop::collection::vec("[a-z<>&]{1,4}", 1..8),
    ) {
        let line = words.join(" ");
        let cmd = parser().parse(&line).resolve(true);
        prop_assert!(!cmd.background());
    }

    /// Resolution only ever removes tokens: the argv is an ordered
    /// subsequence of the parsed token sequence.
    #[test]
    fn argv_is_an_ordered_subsequence(
        words in prop::collection::vec("[a-z<>&]{1,4}", 0..8),
    ) {
        let line = words.join(" ");
        let parsed = parser().parse(&line);
        let tokens = parsed.tokens().to_vec();

        let cmd = parsed.resolve(false);
        let mut remaining = tokens.iter();
        for arg in cmd.argv() {
            prop_assert!(
                remaining.any(|token| token == arg),
                "argv token {arg:?} not found in order within {tokens:?}"
            );
        }
    }
}
