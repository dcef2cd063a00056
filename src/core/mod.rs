// Public modules
pub mod defaults;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod locator;
pub mod refactor;
pub mod renamer;
pub mod segmenter;
pub mod workspace;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use dictionary::WordDictionary;
pub use engine::{ChangeSet, ChangeWarning, FileEdit, RenameEngine, TextualRenameEngine};
pub use error::{Error, ErrorCode, Result};
pub use locator::{Locator, RenameCandidate};
pub use refactor::{DryRunFile, DryRunReport, RefactorDriver, RefactorReport, RenameRecord};
pub use renamer::{Renamer, WashedIdentifier};
pub use segmenter::{Match, Segmenter};
pub use workspace::{FileHandle, Workspace};
