//! Word-level diff for free-text fields.
//!
//! A single greedy, non-backtracking pass over space-separated tokens. It
//! keeps the longest unbroken runs of shared words and marks everything else;
//! it does not search for a minimal edit script, so inputs with many repeated
//! words can align imperfectly. Good enough for comments and descriptions.

use chlog_types::Segment;

/// Diff `primary` against `secondary`, returning the runs of `primary` with
/// the words absent from `secondary` marked.
///
/// Call it twice with the arguments swapped to get both sides. Joining the
/// returned runs with a single space reproduces `primary` exactly.
pub fn diff_words(primary: &str, secondary: &str) -> Vec<Segment> {
    if primary.is_empty() {
        return Vec::new();
    }
    if primary == secondary {
        return vec![Segment::plain(primary)];
    }

    let theirs: Vec<&str> = secondary.split(' ').collect();
    let mut runs = Runs::default();
    let mut pending: Vec<&str> = Vec::new();
    let mut j = 0;

    for token in primary.split(' ') {
        if theirs.get(j) == Some(&token) {
            runs.push_marked(&mut pending);
            runs.push_plain(token);
            j += 1;
        } else if let Some(k) = find_after(&theirs, j, token) {
            runs.push_marked(&mut pending);
            runs.push_plain(token);
            j = k + 1;
        } else {
            pending.push(token);
        }
    }
    runs.push_marked(&mut pending);
    runs.0
}

/// Position of `token` in `tokens` strictly after `j`.
fn find_after(tokens: &[&str], j: usize, token: &str) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .skip(j + 1)
        .find(|(_, t)| **t == token)
        .map(|(k, _)| k)
}

#[derive(Default)]
struct Runs(Vec<Segment>);

impl Runs {
    fn push_plain(&mut self, token: &str) {
        match self.0.last_mut() {
            Some(last) if !last.highlighted => {
                last.text.push(' ');
                last.text.push_str(token);
            }
            _ => self.0.push(Segment::plain(token)),
        }
    }

    /// Flush buffered unmatched tokens as one marked run.
    fn push_marked(&mut self, pending: &mut Vec<&str>) {
        if pending.is_empty() {
            return;
        }
        self.0.push(Segment::marked(pending.join(" ")));
        pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn marked(segments: &[Segment]) -> Vec<&str> {
        segments
            .iter()
            .filter(|s| s.highlighted)
            .map(|s| s.text.as_str())
            .collect()
    }

    fn rejoin(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn identical_strings_single_plain_run() {
        let runs = diff_words("same text here", "same text here");
        assert_eq!(runs, vec![Segment::plain("same text here")]);
    }

    #[test]
    fn single_word_substitution() {
        let old = diff_words("the quick brown fox", "the slow brown fox");
        let new = diff_words("the slow brown fox", "the quick brown fox");

        assert_eq!(
            old,
            vec![
                Segment::plain("the"),
                Segment::marked("quick"),
                Segment::plain("brown fox"),
            ]
        );
        assert_eq!(marked(&new), vec!["slow"]);
        assert_eq!(rejoin(&new), "the slow brown fox");
    }

    #[test]
    fn appended_words_marked_at_end() {
        let runs = diff_words("MIT license with notes", "MIT license");
        assert_eq!(
            runs,
            vec![Segment::plain("MIT license"), Segment::marked("with notes")]
        );
        assert_eq!(diff_words("MIT license", "MIT license with notes"), vec![Segment::plain("MIT license")]);
    }

    #[test]
    fn adjacent_unmatched_words_form_one_run() {
        let runs = diff_words("keep a b c keep2", "keep x y keep2");
        assert_eq!(marked(&runs), vec!["a b c"]);
    }

    #[test]
    fn forward_search_skips_inserted_words() {
        // "brown" is found further along in the other side, so the words
        // inserted before it on that side do not break the match.
        let runs = diff_words("quick brown", "quick very dark brown");
        assert_eq!(runs, vec![Segment::plain("quick brown")]);
    }

    #[test]
    fn empty_primary_has_no_runs() {
        assert!(diff_words("", "something").is_empty());
        assert!(diff_words("", "").is_empty());
    }

    #[test]
    fn empty_secondary_marks_everything() {
        assert_eq!(diff_words("all new", ""), vec![Segment::marked("all new")]);
    }

    #[test]
    fn repeated_words_match_left_to_right() {
        let runs = diff_words("a a b", "a b");
        assert_eq!(rejoin(&runs), "a a b");
        assert_eq!(marked(&runs), vec!["a"]);
    }

    #[test]
    fn double_spaces_survive_rejoin() {
        let runs = diff_words("one  two", "one three");
        assert_eq!(rejoin(&runs), "one  two");
    }

    #[test]
    fn newlines_stay_inside_tokens() {
        let runs = diff_words("line one\nline two", "line one\nline three");
        assert_eq!(marked(&runs), vec!["two"]);
        assert_eq!(rejoin(&runs), "line one\nline two");
    }

    proptest! {
        #[test]
        fn runs_rejoin_to_primary(a in "[ab c]{0,24}", b in "[ab c]{0,24}") {
            prop_assert_eq!(rejoin(&diff_words(&a, &b)), a);
        }

        #[test]
        fn equal_inputs_have_no_marks(a in "[a-z ]{0,24}") {
            prop_assert!(diff_words(&a, &a).iter().all(|s| !s.highlighted));
        }
    }
}
