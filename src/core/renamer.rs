//! Canonical renaming of compound identifiers.
//!
//! An identifier is washed into `prefix`, `core` and `suffix`, the core is
//! segmented into dictionary words and the words are joined with `_`.
//! Unmatched text before a word is glued onto the preceding group without a
//! separator; every recognized word after the first written text gets one.
//!
//! ```text
//! dictionary {brown, fox}
//! __testBROWNFox  ->  "__" + "test_brown_fox" + ""
//! ```

use serde::Serialize;

use crate::dictionary::WordDictionary;
use crate::segmenter::Segmenter;

pub const SEPARATOR: char = '_';

/// An identifier split into its leading/trailing separator runs and a
/// lower-cased core with every separator removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WashedIdentifier {
    pub prefix: String,
    pub core: String,
    pub suffix: String,
}

/// Split off the leading and trailing `_` runs and normalize the core.
///
/// An identifier made only of underscores is claimed entirely by the prefix.
pub fn wash(identifier: &str) -> WashedIdentifier {
    let body = identifier.trim_start_matches(SEPARATOR);
    let prefix_len = identifier.len() - body.len();

    let suffix_len = if body.is_empty() {
        0
    } else {
        identifier.len() - identifier.trim_end_matches(SEPARATOR).len()
    };

    WashedIdentifier {
        prefix: identifier[..prefix_len].to_string(),
        core: identifier
            .to_lowercase()
            .chars()
            .filter(|&c| c != SEPARATOR)
            .collect(),
        suffix: identifier[identifier.len() - suffix_len..].to_string(),
    }
}

pub struct Renamer<'d> {
    segmenter: Segmenter<'d>,
}

impl<'d> Renamer<'d> {
    pub fn new(words: &'d WordDictionary) -> Self {
        Self {
            segmenter: Segmenter::new(words),
        }
    }

    /// Canonical `_`-delimited form of `identifier`.
    pub fn rename(&self, identifier: &str) -> String {
        let WashedIdentifier {
            prefix,
            core,
            suffix,
        } = wash(identifier);

        let mut result = String::with_capacity(core.len() * 2);
        let mut cursor = 0;

        for found in self.segmenter.segment(&core) {
            if cursor != found.start {
                result.push_str(&core[cursor..found.start]);
            }
            if !result.is_empty() {
                result.push(SEPARATOR);
            }
            result.push_str(&found.word);
            cursor = found.end;
        }

        if cursor != core.len() {
            if !result.is_empty() {
                result.push(SEPARATOR);
            }
            result.push_str(&core[cursor..]);
        }

        format!("{}{}{}", prefix, result, suffix)
    }
}
