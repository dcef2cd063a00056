//! Word dictionary used as segmentation vocabulary.
//!
//! Words come from a newline-delimited base list (lower-cased and trimmed on
//! load) and an optional overrides file that adds recognized words and
//! removes unrecognized ones. Overrides are JSON, or XML in the
//! `<dictionary><recognized><word>` layout older word lists use.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

/// Supplementary dictionary file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DictionaryOverrides {
    /// Words to add on top of the base list.
    #[serde(default)]
    pub recognized: Vec<String>,
    /// Words to remove from the base list.
    #[serde(default)]
    pub unrecognized: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WordDictionary {
    words: HashSet<String>,
    max_word_chars: usize,
}

impl WordDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a newline-delimited word list, lower-casing and trimming each line.
    ///
    /// Returns the number of words in the dictionary afterwards.
    pub fn load_base(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::dictionary_not_found(path.display().to_string())
            } else {
                Error::dictionary_load_failed(path.display().to_string(), e.to_string())
            }
        })?;

        self.extend_from_lines(&content);
        Ok(self.len())
    }

    /// Insert every non-blank line of `text`, lower-cased and trimmed.
    pub fn extend_from_lines(&mut self, text: &str) {
        for line in text.lines() {
            let word = line.trim().to_lowercase();
            if !word.is_empty() {
                self.insert(word);
            }
        }
    }

    /// Add each word as given.
    pub fn augment<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for word in words {
            self.insert(word.into());
        }
    }

    /// Remove each word if present. Absent words are ignored.
    pub fn restrict<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.words.remove(word.as_ref());
        }
    }

    /// Apply a supplementary dictionary (JSON or XML): augment, then restrict.
    pub fn load_overrides(&mut self, path: &Path) -> Result<DictionaryOverrides> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::dictionary_not_found(path.display().to_string())
            } else {
                Error::dictionary_load_failed(path.display().to_string(), e.to_string())
            }
        })?;

        let overrides = if content.trim_start().starts_with('<') {
            parse_xml_overrides(&content)
                .map_err(|e| Error::dictionary_invalid_xml(path.display().to_string(), e))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| Error::dictionary_invalid_json(path.display().to_string(), e))?
        };

        self.augment(overrides.recognized.iter().cloned());
        self.restrict(&overrides.unrecognized);

        Ok(overrides)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Upper bound on the char length of any word. Not lowered by `restrict`.
    pub fn max_word_chars(&self) -> usize {
        self.max_word_chars
    }

    fn insert(&mut self, word: String) {
        self.max_word_chars = self.max_word_chars.max(word.chars().count());
        self.words.insert(word);
    }
}

impl<S: Into<String>> FromIterator<S> for WordDictionary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut dictionary = WordDictionary::new();
        dictionary.augment(iter);
        dictionary
    }
}

/// Collect `/dictionary/recognized/word` and `/dictionary/unrecognized/word` text.
fn parse_xml_overrides(content: &str) -> std::result::Result<DictionaryOverrides, String> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut overrides = DictionaryOverrides::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(tag)) => open.push(tag.name().as_ref().to_vec()),
            Ok(Event::End(_)) => {
                open.pop();
            }
            Ok(Event::Text(text)) => {
                let target = match open.as_slice() {
                    [root, list, word] if root == b"dictionary" && word == b"word" => {
                        match list.as_slice() {
                            b"recognized" => Some(&mut overrides.recognized),
                            b"unrecognized" => Some(&mut overrides.unrecognized),
                            _ => None,
                        }
                    }
                    _ => None,
                };
                if let Some(words) = target {
                    let word = text.unescape().map_err(|e| e.to_string())?;
                    words.push(word.into_owned());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
        }
        buf.clear();
    }

    if !open.is_empty() {
        return Err("unclosed elements at end of document".to_string());
    }

    Ok(overrides)
}
