//! Definition-site scanning.
//!
//! Finds `<keyword> <identifier>` sites (e.g. `def testbrownfox`) in source
//! text and proposes a canonical name for each one that would change.

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::renamer::Renamer;

/// A proposed rename of the definition whose identifier starts at `offset`.
///
/// Offsets are only meaningful against the content they were computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameCandidate {
    pub old_name: String,
    pub offset: usize,
    pub new_name: String,
}

/// Matches a definition keyword followed by whitespace and an identifier.
#[derive(Debug, Clone)]
pub struct DefinitionPattern {
    regex: Regex,
}

impl DefinitionPattern {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        if keywords.is_empty() || keywords.iter().any(|k| k.as_ref().trim().is_empty()) {
            return Err(Error::validation_invalid_argument(
                "definition_keywords",
                "At least one non-empty definition keyword is required",
            ));
        }

        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k.as_ref().trim()))
            .collect::<Vec<_>>()
            .join("|");

        // The trailing `\b` drops names that continue with a non-ASCII letter.
        let regex = Regex::new(&format!(r"\b(?:{})\s+(?P<name>[A-Za-z0-9_]+)\b", alternation))
            .map_err(|e| Error::internal_unexpected(format!("definition pattern: {}", e)))?;

        Ok(Self { regex })
    }

    /// Every definition identifier in `content` with its byte offset, in source order.
    pub fn definitions<'c>(&'c self, content: &'c str) -> impl Iterator<Item = (usize, &'c str)> + 'c {
        self.regex.captures_iter(content).filter_map(|caps| {
            caps.name("name").map(|name| (name.start(), name.as_str()))
        })
    }

    /// The definition identifier starting exactly at `offset`, if any.
    pub fn definition_at<'c>(&'c self, content: &'c str, offset: usize) -> Option<&'c str> {
        self.definitions(content)
            .take_while(|&(start, _)| start <= offset)
            .find(|&(start, _)| start == offset)
            .map(|(_, name)| name)
    }
}

pub struct Locator<'d> {
    renamer: Renamer<'d>,
    pattern: DefinitionPattern,
}

impl<'d> Locator<'d> {
    pub fn new(renamer: Renamer<'d>, pattern: DefinitionPattern) -> Self {
        Self { renamer, pattern }
    }

    /// Every definition in `content` whose canonical name differs from its current one.
    pub fn find_definitions(&self, content: &str) -> Vec<RenameCandidate> {
        self.pattern
            .definitions(content)
            .filter_map(|(offset, old_name)| {
                let new_name = self.renamer.rename(old_name);
                (new_name != old_name).then(|| RenameCandidate {
                    old_name: old_name.to_string(),
                    offset,
                    new_name,
                })
            })
            .collect()
    }
}
