//! Project file enumeration.
//!
//! A `Workspace` is a directory tree of source files. Files are found by a
//! recursive walk that skips VCS and dependency directories and keeps only
//! paths matching the include globs. Symlinked directories are not entered;
//! symlinked files resolve to their target, and each physical file inside
//! the root yields exactly one handle. An optional module filter narrows the
//! set to files whose real path contains the module path.

use std::path::{Path, PathBuf};

use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::utils::io;

/// One source file in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    /// Path relative to the workspace root, `/`-separated.
    pub path: String,
    /// Absolute path on disk.
    pub real_path: PathBuf,
}

impl FileHandle {
    /// Current on-disk content. Never cached.
    pub fn read(&self) -> Result<String> {
        io::read_file(&self.real_path, &format!("read {}", self.path))
    }
}

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    module: Option<PathBuf>,
    include: Vec<String>,
    skip_dirs: Vec<String>,
}

impl Workspace {
    /// Open the project at `project_path`, which must be an existing directory.
    pub fn open(project_path: &Path, defaults: &Defaults) -> Result<Self> {
        let root = canonical_dir(project_path)
            .ok_or_else(|| Error::validation_invalid_project_path(absolute(project_path)))?;

        Ok(Self {
            root,
            module: None,
            include: defaults.include.clone(),
            skip_dirs: defaults.skip_dirs.clone(),
        })
    }

    /// Limit the workspace to files under `module_path`, which must exist
    /// inside the project root.
    pub fn with_module(mut self, module_path: &Path) -> Result<Self> {
        let module = std::fs::canonicalize(module_path)
            .map_err(|_| Error::validation_invalid_module_path(absolute(module_path)))?;

        if !module.starts_with(&self.root) {
            return Err(Error::validation_module_outside_project(
                module.display().to_string(),
                self.root.display().to_string(),
            ));
        }

        self.module = Some(module);
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn module(&self) -> Option<&Path> {
        self.module.as_deref()
    }

    /// Fails when the on-disk project no longer matches what was opened.
    pub fn validate(&self) -> Result<()> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(Error::project_stale(
                self.root.display().to_string(),
                "project root is no longer a directory",
            )),
            Err(e) => Err(Error::project_stale(
                self.root.display().to_string(),
                e.to_string(),
            )),
        }
    }

    /// Every source file in scope, sorted by relative path.
    ///
    /// Honors the module filter; use [`Workspace::all_files`] for the whole project.
    pub fn files(&self) -> Result<Vec<FileHandle>> {
        let Some(module) = &self.module else {
            return self.all_files();
        };
        let module = module.to_string_lossy().to_string();

        Ok(self
            .all_files()?
            .into_iter()
            .filter(|f| f.real_path.to_string_lossy().contains(module.as_str()))
            .collect())
    }

    /// Every source file under the project root, ignoring the module filter.
    pub fn all_files(&self) -> Result<Vec<FileHandle>> {
        let mut found = Vec::new();
        self.walk(&self.root, &mut found)?;

        let mut files: Vec<FileHandle> = found
            .into_iter()
            .filter_map(|path| {
                let real_path = std::fs::canonicalize(path).ok()?;
                let relative = real_path
                    .strip_prefix(&self.root)
                    .ok()?
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");

                self.include
                    .iter()
                    .any(|g| matches_include(g, &relative))
                    .then_some(FileHandle {
                        path: relative,
                        real_path,
                    })
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.real_path == b.real_path);
        Ok(files)
    }

    fn walk(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read dir {}", dir.display())))
        })?;

        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();

            if file_type.is_dir() {
                let name = entry.file_name().to_string_lossy().to_string();
                if self.skip_dirs.iter().any(|skip| *skip == name) {
                    continue;
                }
                self.walk(&path, files)?;
            } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
                files.push(path);
            }
        }

        Ok(())
    }
}

/// `**/` also matches files directly under the root.
fn matches_include(glob: &str, relative: &str) -> bool {
    glob_match::glob_match(glob, relative)
        || glob
            .strip_prefix("**/")
            .is_some_and(|rest| glob_match::glob_match(rest, relative))
}

fn canonical_dir(path: &Path) -> Option<PathBuf> {
    let canonical = std::fs::canonicalize(path).ok()?;
    canonical.is_dir().then_some(canonical)
}

fn absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
