//! Word matching engine
//!
//! Tracks per-character typing progress against a target word and owns
//! the word pool levels draw from. Matching is case-insensitive;
//! non-alphanumeric keys are ignored rather than counted as mistakes.

use rand::Rng;

use crate::chars_match;

/// What a level does when the player types a wrong character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchPolicy {
    /// Wrong key resets progress to zero.
    ResetOnError,
    /// Wrong key is ignored; progress is kept.
    IgnoreErrors,
}

/// Result of feeding one key into a word target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Key matched the next expected character.
    Advanced,
    /// Key matched and the word is now fully typed.
    Completed,
    /// Key did not match; the mismatch policy has been applied.
    Rejected,
    /// Key is not a word character (modifier, punctuation) - no effect.
    Ignored,
}

/// A target word with typing progress.
///
/// `matched` counts characters, never bytes, and never exceeds the
/// word length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTarget {
    text: String,
    matched: usize,
}

impl WordTarget {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            matched: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// An empty word is complete from the start.
    pub fn is_complete(&self) -> bool {
        self.matched >= self.len()
    }

    /// The next character the player must type, if any.
    pub fn next_char(&self) -> Option<char> {
        self.text.chars().nth(self.matched)
    }

    /// True if `key` would advance this word from its current progress.
    pub fn accepts(&self, key: char) -> bool {
        self.next_char().is_some_and(|c| chars_match(c, key))
    }

    /// True if `key` would start this word from scratch. Used for
    /// target selection before a word is locked.
    pub fn starts_with_key(&self, key: char) -> bool {
        self.text.chars().next().is_some_and(|c| chars_match(c, key))
    }

    pub fn reset(&mut self) {
        self.matched = 0;
    }

    /// Feed one typed key, applying `policy` on mismatch.
    pub fn submit_key(&mut self, key: char, policy: MismatchPolicy) -> KeyOutcome {
        if self.is_complete() {
            return KeyOutcome::Ignored;
        }
        if !key.is_alphanumeric() {
            return KeyOutcome::Ignored;
        }
        match self.next_char() {
            Some(expected) if chars_match(expected, key) => {
                self.matched += 1;
                if self.is_complete() {
                    KeyOutcome::Completed
                } else {
                    KeyOutcome::Advanced
                }
            }
            _ => {
                if policy == MismatchPolicy::ResetOnError {
                    self.matched = 0;
                }
                KeyOutcome::Rejected
            }
        }
    }
}

/// Pool of candidate words for a level.
///
/// Draws are random but never repeat the previous word back-to-back:
/// if the draw lands on the last word's text, following indices are
/// taken until the text differs (deterministic re-selection, not a
/// re-roll). Comparison is by text, so a bank containing duplicates
/// still never serves the same word twice in a row.
#[derive(Debug, Clone)]
pub struct WordPool {
    words: Vec<String>,
    last: Option<String>,
}

impl WordPool {
    pub fn new(words: Vec<String>) -> Self {
        Self { words, last: None }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Draw a word. Returns `None` only for an empty pool.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<WordTarget> {
        if self.words.is_empty() {
            return None;
        }
        let mut index = rng.random_range(0..self.words.len());
        if let Some(last) = &self.last {
            // Walk forward past any copies of the previous text; a
            // full wrap means every word is identical and a repeat is
            // unavoidable
            for _ in 0..self.words.len() {
                if &self.words[index] != last {
                    break;
                }
                index = (index + 1) % self.words.len();
            }
        }
        self.last = Some(self.words[index].clone());
        Some(WordTarget::new(self.words[index].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn correct_sequence_completes_exactly_at_the_end() {
        let mut w = WordTarget::new("orbit");
        for (i, key) in "orbi".chars().enumerate() {
            assert_eq!(w.submit_key(key, MismatchPolicy::ResetOnError), KeyOutcome::Advanced);
            assert_eq!(w.matched(), i + 1);
            assert!(!w.is_complete());
        }
        assert_eq!(w.submit_key('t', MismatchPolicy::ResetOnError), KeyOutcome::Completed);
        assert!(w.is_complete());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let mut w = WordTarget::new("ORBIT");
        for key in "orbit".chars() {
            assert_ne!(w.submit_key(key, MismatchPolicy::ResetOnError), KeyOutcome::Rejected);
        }
        assert!(w.is_complete());
    }

    #[test]
    fn empty_word_is_immediately_complete() {
        let w = WordTarget::new("");
        assert!(w.is_complete());
        assert_eq!(w.next_char(), None);
    }

    #[test]
    fn non_alphanumeric_keys_are_ignored_not_mismatches() {
        let mut w = WordTarget::new("abc");
        w.submit_key('a', MismatchPolicy::ResetOnError);
        assert_eq!(w.submit_key('!', MismatchPolicy::ResetOnError), KeyOutcome::Ignored);
        assert_eq!(w.matched(), 1); // strict policy did not reset
    }

    #[test]
    fn strict_policy_resets_on_wrong_key() {
        let mut w = WordTarget::new("abc");
        w.submit_key('a', MismatchPolicy::ResetOnError);
        assert_eq!(w.submit_key('x', MismatchPolicy::ResetOnError), KeyOutcome::Rejected);
        assert_eq!(w.matched(), 0);
    }

    #[test]
    fn lenient_policy_keeps_progress_on_wrong_key() {
        let mut w = WordTarget::new("abc");
        w.submit_key('a', MismatchPolicy::IgnoreErrors);
        assert_eq!(w.submit_key('x', MismatchPolicy::IgnoreErrors), KeyOutcome::Rejected);
        assert_eq!(w.matched(), 1);
    }

    #[test]
    fn pool_never_repeats_the_previous_word() {
        let mut pool = WordPool::new(vec!["alpha".into(), "beta".into(), "gamma".into()]);
        let mut rng = Pcg32::seed_from_u64(7);
        let mut prev = pool.draw(&mut rng).unwrap().text().to_string();
        for _ in 0..200 {
            let next = pool.draw(&mut rng).unwrap().text().to_string();
            assert_ne!(next, prev);
            prev = next;
        }
    }

    #[test]
    fn duplicate_bank_entries_still_never_repeat_back_to_back() {
        let mut pool = WordPool::new(vec![
            "echo".into(),
            "echo".into(),
            "echo".into(),
            "delta".into(),
        ]);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut prev = pool.draw(&mut rng).unwrap().text().to_string();
        for _ in 0..200 {
            let next = pool.draw(&mut rng).unwrap().text().to_string();
            assert_ne!(next, prev);
            prev = next;
        }
    }

    #[test]
    fn single_word_pool_may_repeat() {
        let mut pool = WordPool::new(vec!["solo".into()]);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(pool.draw(&mut rng).unwrap().text(), "solo");
        assert_eq!(pool.draw(&mut rng).unwrap().text(), "solo");
    }

    proptest! {
        /// Typing the correct next character length(w) times yields
        /// completion exactly then, never earlier.
        #[test]
        fn completes_after_exactly_len_correct_keys(word in "[a-z]{1,16}") {
            let mut w = WordTarget::new(word.clone());
            let chars: Vec<char> = word.chars().collect();
            for (i, &c) in chars.iter().enumerate() {
                prop_assert!(!w.is_complete());
                let outcome = w.submit_key(c, MismatchPolicy::ResetOnError);
                if i + 1 == chars.len() {
                    prop_assert_eq!(outcome, KeyOutcome::Completed);
                } else {
                    prop_assert_eq!(outcome, KeyOutcome::Advanced);
                }
            }
            prop_assert!(w.is_complete());
        }

        /// Progress stays within [0, len] under any key sequence and
        /// either mismatch policy.
        #[test]
        fn matched_stays_in_bounds(
            word in "[a-z]{1,12}",
            keys in proptest::collection::vec(proptest::char::any(), 0..64),
            strict in proptest::bool::ANY,
        ) {
            let policy = if strict {
                MismatchPolicy::ResetOnError
            } else {
                MismatchPolicy::IgnoreErrors
            };
            let mut w = WordTarget::new(word);
            for key in keys {
                w.submit_key(key, policy);
                prop_assert!(w.matched() <= w.len());
            }
        }
    }
}
