//! Whole-word profanity masking for widget text.

use std::collections::HashSet;

/// Replacement for every masked word, regardless of its length.
pub const MASK: &str = "****";

const DEFAULT_WORDS: &[&str] = &[
    "arse", "arsehole", "ass", "asshole", "bastard", "bitch", "bollocks", "bullshit", "crap",
    "cunt", "damn", "dick", "dickhead", "fuck", "fucked", "fucker", "fucking", "motherfucker",
    "piss", "pissed", "prick", "pussy", "shit", "shitty", "slut", "twat", "wanker", "whore",
];

#[derive(Debug, Clone)]
pub struct ProfanityFilter {
    words: HashSet<String>,
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

impl ProfanityFilter {
    /// Built-in list plus `extra` words. Matching is case-insensitive.
    pub fn new<I, W>(extra: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let words = DEFAULT_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(
                extra
                    .into_iter()
                    .map(|w| w.as_ref().trim().to_lowercase())
                    .filter(|w| !w.is_empty()),
            )
            .collect();
        Self { words }
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Mask listed words. Only whole alphanumeric runs are compared, so
    /// `Classic` is left alone even though it contains a listed word.
    pub fn censor(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut word_start: Option<usize> = None;

        for (idx, ch) in text.char_indices() {
            let in_word = ch.is_alphanumeric() || ch == '\'';
            match (in_word, word_start) {
                (true, None) => word_start = Some(idx),
                (false, Some(start)) => {
                    self.push_word(&mut out, &text[start..idx]);
                    word_start = None;
                    out.push(ch);
                }
                (false, None) => out.push(ch),
                (true, Some(_)) => {}
            }
        }
        if let Some(start) = word_start {
            self.push_word(&mut out, &text[start..]);
        }
        out
    }

    fn push_word(&self, out: &mut String, word: &str) {
        if self.contains_word(word.trim_matches('\'')) {
            out.push_str(MASK);
        } else {
            out.push_str(word);
        }
    }
}
