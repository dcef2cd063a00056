//! Batch renaming driver.
//!
//! Files are processed one at a time. Within a file each pass validates the
//! workspace, re-reads the file, locates candidates and applies only the
//! first one, because an applied rename can move every other offset in the
//! file (and touch other files). The file is done when a pass finds nothing.

use serde::Serialize;

use crate::engine::{ChangeWarning, RenameEngine};
use crate::error::{Error, Result};
use crate::locator::{Locator, RenameCandidate};
use crate::workspace::{FileHandle, Workspace};

pub const DEFAULT_MAX_PASSES_PER_FILE: usize = 10_000;

/// One applied rename.
#[derive(Debug, Clone, Serialize)]
pub struct RenameRecord {
    pub file: String,
    pub old_name: String,
    pub offset: usize,
    pub new_name: String,
    pub files_changed: usize,
    pub replacements: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RefactorReport {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub renames: Vec<RenameRecord>,
    pub warnings: Vec<ChangeWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DryRunFile {
    pub path: String,
    pub candidates: Vec<RenameCandidate>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DryRunReport {
    pub files_scanned: usize,
    pub total_candidates: usize,
    pub files: Vec<DryRunFile>,
}

pub struct RefactorDriver<'a, 'd> {
    workspace: &'a Workspace,
    locator: &'a Locator<'d>,
    max_passes_per_file: usize,
}

impl<'a, 'd> RefactorDriver<'a, 'd> {
    pub fn new(workspace: &'a Workspace, locator: &'a Locator<'d>) -> Self {
        Self {
            workspace,
            locator,
            max_passes_per_file: DEFAULT_MAX_PASSES_PER_FILE,
        }
    }

    pub fn with_max_passes_per_file(mut self, max_passes: usize) -> Self {
        self.max_passes_per_file = max_passes.max(1);
        self
    }

    /// List every candidate in every file without changing anything.
    pub fn dry_run(&self) -> Result<DryRunReport> {
        let mut report = DryRunReport::default();

        for file in self.workspace.files()? {
            let candidates = self.scan(&file)?;
            report.files_scanned += 1;
            report.total_candidates += candidates.len();
            report.files.push(DryRunFile {
                path: file.path,
                candidates,
            });
        }

        Ok(report)
    }

    /// Rename every candidate in every file through `engine`, one at a time.
    pub fn refactor<E: RenameEngine>(&self, engine: &E) -> Result<RefactorReport> {
        let mut report = RefactorReport::default();

        for file in self.workspace.files()? {
            report.files_scanned += 1;
            let applied = self.refactor_file(engine, &file, &mut report)?;
            if applied > 0 {
                report.files_changed += 1;
            }
        }

        Ok(report)
    }

    fn refactor_file<E: RenameEngine>(
        &self,
        engine: &E,
        file: &FileHandle,
        report: &mut RefactorReport,
    ) -> Result<usize> {
        let mut applied = 0;
        let mut last: Option<RenameCandidate> = None;

        loop {
            let Some(candidate) = self.scan(file)?.into_iter().next() else {
                return Ok(applied);
            };

            let repeated = last.as_ref().is_some_and(|prev| {
                prev.offset == candidate.offset && prev.old_name == candidate.old_name
            });
            if repeated || applied >= self.max_passes_per_file {
                return Err(Error::refactor_no_progress(
                    &file.path,
                    candidate.offset,
                    &candidate.old_name,
                ));
            }

            log_status!(
                "rename",
                "{}:{}->{}",
                candidate.old_name,
                candidate.offset,
                candidate.new_name
            );

            let changes = engine.compute_change_set(
                self.workspace,
                file,
                candidate.offset,
                &candidate.new_name,
            )?;
            engine.apply(self.workspace, &changes)?;

            for warning in &changes.warnings {
                log_status!("warn", "{}", warning.message);
            }

            report.renames.push(RenameRecord {
                file: file.path.clone(),
                old_name: candidate.old_name.clone(),
                offset: candidate.offset,
                new_name: candidate.new_name.clone(),
                files_changed: changes.edits.len(),
                replacements: changes.total_replacements(),
            });
            report.warnings.extend(changes.warnings);

            applied += 1;
            last = Some(candidate);
        }
    }

    /// Validate, read fresh content, locate candidates.
    fn scan(&self, file: &FileHandle) -> Result<Vec<RenameCandidate>> {
        self.workspace.validate()?;
        let content = file.read()?;
        Ok(self.locator.find_definitions(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::Defaults;
    use crate::dictionary::WordDictionary;
    use crate::engine::{ChangeSet, TextualRenameEngine};
    use crate::locator::DefinitionPattern;
    use crate::renamer::Renamer;
    use std::cell::RefCell;
    use tempfile::TempDir;

    const SOURCE: &str = "class a:\n    def testbrownfox(self):\n        pass\n    def brown_fox(self):\n        pass\n    def foxBrown(self):\n        return self.testbrownfox()\n";

    fn fox_words() -> WordDictionary {
        ["fox", "brown"].into_iter().collect()
    }

    fn project(files: &[(&str, &str)]) -> (TempDir, Workspace) {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            std::fs::write(dir.path().join(path), content).unwrap();
        }
        let workspace = Workspace::open(dir.path(), &Defaults::default()).unwrap();
        (dir, workspace)
    }

    /// Records every request and applies nothing.
    struct NoopEngine {
        calls: RefCell<Vec<(String, usize, String)>>,
    }

    impl RenameEngine for NoopEngine {
        fn compute_change_set(
            &self,
            _workspace: &Workspace,
            file: &FileHandle,
            offset: usize,
            new_name: &str,
        ) -> Result<ChangeSet> {
            self.calls
                .borrow_mut()
                .push((file.path.clone(), offset, new_name.to_string()));
            Ok(ChangeSet {
                old_name: String::new(),
                new_name: new_name.to_string(),
                edits: Vec::new(),
                warnings: Vec::new(),
            })
        }

        fn apply(&self, _workspace: &Workspace, _changes: &ChangeSet) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn dry_run_lists_without_touching_files() {
        let (dir, workspace) = project(&[("a.py", SOURCE), ("b.py", "def foobar(): pass\n")]);
        let words = fox_words();
        let locator = Locator::new(Renamer::new(&words), DefinitionPattern::new(&["def"]).unwrap());

        let report = RefactorDriver::new(&workspace, &locator).dry_run().unwrap();

        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.total_candidates, 2);
        assert_eq!(report.files[0].path, "a.py");
        let names: Vec<&str> = report.files[0]
            .candidates
            .iter()
            .map(|c| c.new_name.as_str())
            .collect();
        assert_eq!(names, vec!["test_brown_fox", "fox_brown"]);
        assert!(report.files[1].candidates.is_empty());
        assert_eq!(std::fs::read_to_string(dir.path().join("a.py")).unwrap(), SOURCE);
    }

    #[test]
    fn refactor_converges_after_one_apply_per_candidate() {
        let (dir, workspace) = project(&[("a.py", SOURCE)]);
        let words = fox_words();
        let locator = Locator::new(Renamer::new(&words), DefinitionPattern::new(&["def"]).unwrap());
        let engine = TextualRenameEngine::new(DefinitionPattern::new(&["def"]).unwrap());

        let report = RefactorDriver::new(&workspace, &locator)
            .refactor(&engine)
            .unwrap();

        assert_eq!(report.renames.len(), 2);
        assert_eq!(report.files_changed, 1);
        assert_eq!(report.renames[0].old_name, "testbrownfox");
        assert_eq!(report.renames[0].replacements, 2);
        assert_eq!(report.renames[1].old_name, "foxBrown");
        // Offset comes from the rescan after the first rename grew the file.
        assert_eq!(report.renames[1].offset, SOURCE.find("foxBrown").unwrap() + 2);

        let content = std::fs::read_to_string(dir.path().join("a.py")).unwrap();
        assert!(content.contains("def test_brown_fox(self):"));
        assert!(content.contains("def fox_brown(self):"));
        assert!(content.contains("return self.test_brown_fox()"));
        assert!(locator.find_definitions(&content).is_empty());
    }

    #[test]
    fn engine_that_changes_nothing_is_stopped() {
        let (_dir, workspace) = project(&[("a.py", SOURCE)]);
        let words = fox_words();
        let locator = Locator::new(Renamer::new(&words), DefinitionPattern::new(&["def"]).unwrap());
        let engine = NoopEngine {
            calls: RefCell::new(Vec::new()),
        };

        let err = RefactorDriver::new(&workspace, &locator)
            .refactor(&engine)
            .unwrap_err();

        assert_eq!(err.code.as_str(), "refactor.no_progress");
        let calls = engine.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("a.py".to_string(), SOURCE.find("testbrownfox").unwrap(), "test_brown_fox".to_string()));
    }

    #[test]
    fn pass_cap_stops_a_file_with_more_candidates() {
        let (dir, workspace) = project(&[("a.py", SOURCE)]);
        let words = fox_words();
        let locator = Locator::new(Renamer::new(&words), DefinitionPattern::new(&["def"]).unwrap());
        let engine = TextualRenameEngine::new(DefinitionPattern::new(&["def"]).unwrap());

        let err = RefactorDriver::new(&workspace, &locator)
            .with_max_passes_per_file(1)
            .refactor(&engine)
            .unwrap_err();

        assert_eq!(err.code.as_str(), "refactor.no_progress");
        let content = std::fs::read_to_string(dir.path().join("a.py")).unwrap();
        assert!(content.contains("def test_brown_fox(self):"));
        assert!(content.contains("def foxBrown(self):"));
    }

    #[test]
    fn engine_errors_propagate() {
        let (_dir, workspace) = project(&[("a.py", SOURCE)]);
        let words = fox_words();
        let locator = Locator::new(Renamer::new(&words), DefinitionPattern::new(&["def"]).unwrap());
        // Engine only knows `class` definitions, so the `def` offset is unresolvable.
        let engine = TextualRenameEngine::new(DefinitionPattern::new(&["class"]).unwrap());

        let err = RefactorDriver::new(&workspace, &locator)
            .refactor(&engine)
            .unwrap_err();

        assert_eq!(err.code.as_str(), "rename.unresolvable");
    }

    #[test]
    fn stale_workspace_stops_the_run() {
        let (dir, workspace) = project(&[("a.py", SOURCE)]);
        let words = fox_words();
        let locator = Locator::new(Renamer::new(&words), DefinitionPattern::new(&["def"]).unwrap());
        let driver = RefactorDriver::new(&workspace, &locator);
        let file = workspace.files().unwrap().remove(0);

        std::fs::remove_dir_all(dir.path()).unwrap();

        let err = driver.scan(&file).unwrap_err();
        assert_eq!(err.code.as_str(), "project.stale");
    }
}
