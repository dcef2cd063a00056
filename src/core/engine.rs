//! Rename engines: compute and apply the edits that rename one definition.
//!
//! The driver only talks to the [`RenameEngine`] trait. The bundled
//! [`TextualRenameEngine`] renames every whole-identifier occurrence of the
//! old name across the project. It does not resolve scopes, so a name shared
//! by unrelated definitions is renamed everywhere.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::locator::DefinitionPattern;
use crate::utils::io;
use crate::workspace::{FileHandle, Workspace};

/// New content for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileEdit {
    /// File path relative to the workspace root.
    pub file: String,
    /// Number of replacements in this file.
    pub replacements: usize,
    #[serde(skip)]
    pub real_path: std::path::PathBuf,
    /// New content after all replacements.
    #[serde(skip)]
    pub new_content: String,
}

/// Something worth a second look before trusting a change set.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeWarning {
    /// Warning category.
    pub kind: String,
    /// File path relative to the workspace root.
    pub file: String,
    /// Human-readable description.
    pub message: String,
}

/// Every edit needed to rename one definition and its references.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeSet {
    pub old_name: String,
    pub new_name: String,
    pub edits: Vec<FileEdit>,
    pub warnings: Vec<ChangeWarning>,
}

impl ChangeSet {
    pub fn total_replacements(&self) -> usize {
        self.edits.iter().map(|e| e.replacements).sum()
    }
}

pub trait RenameEngine {
    /// Edits that rename the definition whose identifier starts at `offset`
    /// in `file` to `new_name`, across the whole workspace.
    fn compute_change_set(
        &self,
        workspace: &Workspace,
        file: &FileHandle,
        offset: usize,
        new_name: &str,
    ) -> Result<ChangeSet>;

    /// Commit a change set to storage.
    fn apply(&self, workspace: &Workspace, changes: &ChangeSet) -> Result<()>;
}

pub struct TextualRenameEngine {
    pattern: DefinitionPattern,
}

impl TextualRenameEngine {
    pub fn new(pattern: DefinitionPattern) -> Self {
        Self { pattern }
    }
}

impl RenameEngine for TextualRenameEngine {
    fn compute_change_set(
        &self,
        workspace: &Workspace,
        file: &FileHandle,
        offset: usize,
        new_name: &str,
    ) -> Result<ChangeSet> {
        let declaring = file.read()?;

        if offset > declaring.len() || !declaring.is_char_boundary(offset) {
            return Err(Error::rename_unresolvable(
                &file.path,
                offset,
                "offset is outside the file",
            ));
        }

        let old_name = self
            .pattern
            .definition_at(&declaring, offset)
            .ok_or_else(|| {
                Error::rename_unresolvable(&file.path, offset, "no definition starts at offset")
            })?
            .to_string();

        if !is_identifier(new_name) {
            return Err(Error::rename_invalid_name(&file.path, offset, new_name));
        }

        let mut files = workspace.all_files()?;
        if !files.iter().any(|f| f.real_path == file.real_path) {
            files.push(file.clone());
        }

        let mut edits = Vec::new();
        let mut warnings = Vec::new();

        for target in &files {
            let content = if target.real_path == file.real_path {
                declaring.clone()
            } else {
                target.read()?
            };

            let positions = find_identifier_matches(&content, &old_name);
            if positions.is_empty() {
                continue;
            }

            if !find_identifier_matches(&content, new_name).is_empty() {
                warnings.push(ChangeWarning {
                    kind: "name_collision".to_string(),
                    file: target.path.clone(),
                    message: format!(
                        "'{}' already appears in {}; renaming '{}' may shadow it",
                        new_name, target.path, old_name
                    ),
                });
            }

            edits.push(FileEdit {
                file: target.path.clone(),
                replacements: positions.len(),
                real_path: target.real_path.clone(),
                new_content: replace_at(&content, &positions, old_name.len(), new_name),
            });
        }

        Ok(ChangeSet {
            old_name,
            new_name: new_name.to_string(),
            edits,
            warnings,
        })
    }

    fn apply(&self, workspace: &Workspace, changes: &ChangeSet) -> Result<()> {
        for edit in &changes.edits {
            if !edit.real_path.starts_with(workspace.root()) {
                return Err(Error::internal_unexpected(format!(
                    "edit target {} is outside the project",
                    edit.real_path.display()
                )));
            }
            io::write_file_atomic(&edit.real_path, &edit.new_content, "apply rename")?;
        }
        Ok(())
    }
}

/// Python identifiers may contain non-ASCII letters, so `éfoo` holds no `foo`.
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_ident_char)
}

/// Byte offsets of `name` in `text` where it is not part of a longer identifier.
fn find_identifier_matches(text: &str, name: &str) -> Vec<usize> {
    let mut matches = Vec::new();

    if name.is_empty() || name.len() > text.len() {
        return matches;
    }

    let mut start = 0;
    while let Some(pos) = text[start..].find(name) {
        let abs = start + pos;
        let end = abs + name.len();

        let left_ok = !text[..abs].chars().next_back().is_some_and(is_ident_char);
        let right_ok = !text[end..].chars().next().is_some_and(is_ident_char);

        if left_ok && right_ok {
            matches.push(abs);
            start = end;
        } else {
            start = abs + text[abs..].chars().next().map_or(1, char::len_utf8);
        }
    }

    matches
}

/// Replace `len` bytes at each ascending position, back to front so earlier
/// positions stay valid.
fn replace_at(content: &str, positions: &[usize], len: usize, replacement: &str) -> String {
    let mut result = content.to_string();
    for &pos in positions.iter().rev() {
        result.replace_range(pos..pos + len, replacement);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::Defaults;
    use tempfile::TempDir;

    fn setup(files: &[(&str, &str)]) -> (TempDir, Workspace) {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(full, content).unwrap();
        }
        let workspace = Workspace::open(dir.path(), &Defaults::default()).unwrap();
        (dir, workspace)
    }

    fn engine() -> TextualRenameEngine {
        TextualRenameEngine::new(DefinitionPattern::new(&["def"]).unwrap())
    }

    fn handle(workspace: &Workspace, path: &str) -> FileHandle {
        workspace
            .all_files()
            .unwrap()
            .into_iter()
            .find(|f| f.path == path)
            .unwrap()
    }

    #[test]
    fn identifier_matches_respect_boundaries() {
        let text = "getfox(x); self.getfox; getfoxes; _getfox; getfox";
        assert_eq!(find_identifier_matches(text, "getfox"), vec![0, 16, 43]);
        assert!(find_identifier_matches("", "getfox").is_empty());
    }

    #[test]
    fn identifier_matches_treat_unicode_letters_as_identifier_chars() {
        let text = "éfoo = foo + fooé + ñ_foo; (foo)";
        assert_eq!(find_identifier_matches(text, "foo"), vec![8, 31]);
        assert!(is_identifier("größe"));
        assert!(!is_identifier("get-fox"));
    }

    #[test]
    fn replace_at_keeps_offsets_valid() {
        let replaced = replace_at("ab x ab", &[0, 5], 2, "long_name");
        assert_eq!(replaced, "long_name x long_name");
    }

    #[test]
    fn change_set_covers_all_project_files() {
        let (_dir, workspace) = setup(&[
            ("lib.py", "def getfox(self):\n    return getfox\n"),
            ("use.py", "from lib import getfox\ngetfox()\ngetfoxes()\n"),
            ("other.py", "def unrelated(): pass\n"),
        ]);
        let file = handle(&workspace, "lib.py");

        let changes = engine()
            .compute_change_set(&workspace, &file, 4, "get_fox")
            .unwrap();

        assert_eq!(changes.old_name, "getfox");
        assert_eq!(changes.edits.len(), 2);
        assert_eq!(changes.total_replacements(), 4);
        assert!(changes.warnings.is_empty());

        let lib = changes.edits.iter().find(|e| e.file == "lib.py").unwrap();
        assert_eq!(lib.new_content, "def get_fox(self):\n    return get_fox\n");
        let user = changes.edits.iter().find(|e| e.file == "use.py").unwrap();
        assert_eq!(user.new_content, "from lib import get_fox\nget_fox()\ngetfoxes()\n");
    }

    #[test]
    fn apply_writes_edits() {
        let (dir, workspace) = setup(&[("lib.py", "def getfox(): pass\ngetfox()\n")]);
        let file = handle(&workspace, "lib.py");
        let engine = engine();

        let changes = engine
            .compute_change_set(&workspace, &file, 4, "get_fox")
            .unwrap();
        engine.apply(&workspace, &changes).unwrap();

        let content = std::fs::read_to_string(dir.path().join("lib.py")).unwrap();
        assert_eq!(content, "def get_fox(): pass\nget_fox()\n");
    }

    #[cfg(unix)]
    #[test]
    fn aliased_directories_are_edited_once() {
        let (dir, workspace) = setup(&[("pkg/lib.py", "def getfox(): pass\ngetfox()\n")]);
        std::os::unix::fs::symlink(dir.path().join("pkg"), dir.path().join("alias")).unwrap();
        let file = handle(&workspace, "pkg/lib.py");

        let changes = engine()
            .compute_change_set(&workspace, &file, 4, "get_fox")
            .unwrap();

        assert_eq!(changes.edits.len(), 1);
        assert_eq!(changes.total_replacements(), 2);
    }

    #[test]
    fn offset_must_address_a_definition() {
        let (_dir, workspace) = setup(&[("lib.py", "def getfox(): pass\ngetfox()\n")]);
        let file = handle(&workspace, "lib.py");

        let err = engine()
            .compute_change_set(&workspace, &file, 19, "get_fox")
            .unwrap_err();
        assert_eq!(err.code.as_str(), "rename.unresolvable");

        let err = engine()
            .compute_change_set(&workspace, &file, 500, "get_fox")
            .unwrap_err();
        assert_eq!(err.code.as_str(), "rename.unresolvable");
    }

    #[test]
    fn new_name_must_be_an_identifier() {
        let (_dir, workspace) = setup(&[("lib.py", "def getfox(): pass\n")]);
        let file = handle(&workspace, "lib.py");

        let err = engine()
            .compute_change_set(&workspace, &file, 4, "get fox")
            .unwrap_err();
        assert_eq!(err.code.as_str(), "rename.invalid_name");
    }

    #[test]
    fn existing_new_name_is_flagged() {
        let (_dir, workspace) = setup(&[(
            "lib.py",
            "def getfox(): pass\ndef get_fox(): pass\n",
        )]);
        let file = handle(&workspace, "lib.py");

        let changes = engine()
            .compute_change_set(&workspace, &file, 4, "get_fox")
            .unwrap();

        assert_eq!(changes.warnings.len(), 1);
        assert_eq!(changes.warnings[0].kind, "name_collision");
    }
}
