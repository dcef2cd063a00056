//! Leftmost-greedy dictionary segmentation.
//!
//! At each position the longest dictionary word starting there is taken and
//! the scan jumps past it. When nothing matches the scan moves one character
//! forward and the skipped character becomes part of a gap. Earlier decisions
//! are never revisited, so an early long match can hide a better overall
//! split.

use serde::Serialize;

use crate::dictionary::WordDictionary;

/// A dictionary word found in the segmented text, at byte range `start..end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub word: String,
    pub start: usize,
    pub end: usize,
}

pub struct Segmenter<'d> {
    words: &'d WordDictionary,
}

impl<'d> Segmenter<'d> {
    pub fn new(words: &'d WordDictionary) -> Self {
        Self { words }
    }

    /// Longest dictionary word that starts at byte offset `start`.
    ///
    /// `start` must lie on a char boundary of `text`.
    pub fn longest_match_at<'t>(&self, text: &'t str, start: usize) -> Option<&'t str> {
        let rest = &text[start..];
        let limit = self.words.max_word_chars();
        let mut best = None;

        for (taken, (idx, ch)) in rest.char_indices().enumerate() {
            if taken >= limit {
                break;
            }
            let candidate = &rest[..idx + ch.len_utf8()];
            if self.words.contains(candidate) {
                best = Some(candidate);
            }
        }

        best
    }

    /// Split `text` into non-overlapping dictionary matches, left to right.
    pub fn segment(&self, text: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        let mut cursor = 0;

        while cursor < text.len() {
            match self.longest_match_at(text, cursor) {
                Some(word) => {
                    let end = cursor + word.len();
                    matches.push(Match {
                        word: word.to_string(),
                        start: cursor,
                        end,
                    });
                    cursor = end;
                }
                None => {
                    // Gap: step over one char.
                    cursor += text[cursor..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        matches
    }
}
