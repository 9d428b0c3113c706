use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::Run;

/// `**content**`, non-greedy, never across a line break
static BOLD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

/// Split text into alternating plain and bold runs on `**…**` markers.
///
/// Markers are consumed; every other character lands in exactly one run, in
/// order. Markers don't nest: each match ends at the nearest following `**`.
/// Empty runs are skipped, but the result always holds at least one run.
pub fn split_bold_runs(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut last_end = 0;

    for caps in BOLD_REGEX.captures_iter(text) {
        let (Some(whole), Some(content)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last_end {
            push_plain(&mut runs, &text[last_end..whole.start()]);
        }
        if !content.as_str().is_empty() {
            runs.push(Run::bold(content.as_str()));
        }
        last_end = whole.end();
    }

    if last_end < text.len() {
        push_plain(&mut runs, &text[last_end..]);
    }
    if runs.is_empty() {
        runs.push(Run::plain(""));
    }
    runs
}

// An empty `****` leaves two plain gaps side by side; they form one run.
fn push_plain(runs: &mut Vec<Run>, text: &str) {
    match runs.last_mut() {
        Some(last) if !last.bold => last.text.push_str(text),
        _ => runs.push(Run::plain(text)),
    }
}

/// The text a run sequence renders, markers removed.
pub fn runs_text(runs: &[Run]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn no_markers_is_one_plain_run() {
        assert_eq!(split_bold_runs("just text"), vec![Run::plain("just text")]);
    }

    #[test]
    fn empty_text_is_one_empty_run() {
        assert_eq!(split_bold_runs(""), vec![Run::plain("")]);
    }

    #[test]
    fn bold_in_the_middle() {
        assert_eq!(
            split_bold_runs("a **b** c"),
            vec![Run::plain("a "), Run::bold("b"), Run::plain(" c")]
        );
    }

    #[test]
    fn bold_at_edges() {
        assert_eq!(
            split_bold_runs("**start** mid **end**"),
            vec![Run::bold("start"), Run::plain(" mid "), Run::bold("end")]
        );
    }

    #[test]
    fn adjacent_markers_yield_no_empty_run() {
        assert_eq!(
            split_bold_runs("x****y"),
            vec![Run::plain("xy")]
        );
        assert_eq!(
            split_bold_runs("**a** ****b"),
            vec![Run::bold("a"), Run::plain(" b")]
        );
        assert_eq!(split_bold_runs("****"), vec![Run::plain("")]);
    }

    #[test]
    fn first_closing_marker_wins() {
        assert_eq!(
            split_bold_runs("**a **b** c**"),
            vec![Run::bold("a "), Run::plain("b"), Run::bold(" c")]
        );
    }

    #[test]
    fn unmatched_marker_stays_plain() {
        assert_eq!(split_bold_runs("a ** b"), vec![Run::plain("a ** b")]);
    }

    #[test]
    fn marker_does_not_span_lines() {
        assert_eq!(split_bold_runs("**a\nb**"), vec![Run::plain("**a\nb**")]);
    }

    proptest! {
        #[test]
        fn runs_reproduce_text_without_markers(s in "[a-c* \n]{0,40}") {
            let runs = split_bold_runs(&s);
            prop_assert!(!runs.is_empty());
            let expected = BOLD_REGEX.replace_all(&s, "$1");
            prop_assert_eq!(runs_text(&runs), expected.as_ref());
        }

        #[test]
        fn plain_runs_never_touch(s in "[a-c* ]{0,40}") {
            let runs = split_bold_runs(&s);
            for pair in runs.windows(2) {
                prop_assert!(pair[0].bold || pair[1].bold);
            }
        }

        #[test]
        fn text_without_markers_round_trips(s in "[^*]{0,40}") {
            prop_assert_eq!(runs_text(&split_bold_runs(&s)), s);
        }
    }
}
