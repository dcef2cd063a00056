use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationInvalidArgument,
    ValidationInvalidProjectPath,
    ValidationInvalidModulePath,
    ValidationModuleOutsideProject,

    DictionaryNotFound,
    DictionaryLoadFailed,
    DictionaryInvalidJson,
    DictionaryInvalidXml,

    ProjectStale,
    RefactorNoProgress,

    RenameUnresolvable,
    RenameInvalidName,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationInvalidProjectPath => "validation.invalid_project_path",
            ErrorCode::ValidationInvalidModulePath => "validation.invalid_module_path",
            ErrorCode::ValidationModuleOutsideProject => "validation.module_outside_project",

            ErrorCode::DictionaryNotFound => "dictionary.not_found",
            ErrorCode::DictionaryLoadFailed => "dictionary.load_failed",
            ErrorCode::DictionaryInvalidJson => "dictionary.invalid_json",
            ErrorCode::DictionaryInvalidXml => "dictionary.invalid_xml",

            ErrorCode::ProjectStale => "project.stale",
            ErrorCode::RefactorNoProgress => "refactor.no_progress",

            ErrorCode::RenameUnresolvable => "rename.unresolvable",
            ErrorCode::RenameInvalidName => "rename.invalid_name",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidPathDetails {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryErrorDetails {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameTargetDetails {
    pub file: String,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn validation_invalid_project_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let details = to_details(InvalidPathDetails {
            path: path.clone(),
            project_path: None,
        });

        Self::new(
            ErrorCode::ValidationInvalidProjectPath,
            format!("Invalid path: {}", path),
            details,
        )
        .with_hint("PROJECT_PATH must be an existing directory")
    }

    pub fn validation_invalid_module_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let details = to_details(InvalidPathDetails {
            path: path.clone(),
            project_path: None,
        });

        Self::new(
            ErrorCode::ValidationInvalidModulePath,
            format!("Invalid path: {}", path),
            details,
        )
    }

    pub fn validation_module_outside_project(
        module_path: impl Into<String>,
        project_path: impl Into<String>,
    ) -> Self {
        let module_path = module_path.into();
        let project_path = project_path.into();
        let details = to_details(InvalidPathDetails {
            path: module_path.clone(),
            project_path: Some(project_path.clone()),
        });

        Self::new(
            ErrorCode::ValidationModuleOutsideProject,
            format!("Module: {} not in project: {}", module_path, project_path),
            details,
        )
        .with_hint("Pass a --module path that lives inside PROJECT_PATH")
    }

    pub fn dictionary_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        let details = to_details(DictionaryErrorDetails {
            path: path.clone(),
            error: None,
        });

        Self::new(
            ErrorCode::DictionaryNotFound,
            format!("Missing dictionary: {}", path),
            details,
        )
        .with_hint("Point --words at a newline-delimited word list")
    }

    pub fn dictionary_load_failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        let details = to_details(DictionaryErrorDetails {
            path: path.into(),
            error: Some(error.into()),
        });

        Self::new(
            ErrorCode::DictionaryLoadFailed,
            "Failed to load dictionary",
            details,
        )
    }

    pub fn dictionary_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(DictionaryErrorDetails {
            path: path.into(),
            error: Some(err.to_string()),
        });

        Self::new(
            ErrorCode::DictionaryInvalidJson,
            "Invalid JSON in dictionary",
            details,
        )
        .with_hint(r#"Expected {"recognized": [...], "unrecognized": [...]}"#)
    }

    pub fn dictionary_invalid_xml(path: impl Into<String>, error: impl Into<String>) -> Self {
        let details = to_details(DictionaryErrorDetails {
            path: path.into(),
            error: Some(error.into()),
        });

        Self::new(
            ErrorCode::DictionaryInvalidXml,
            "Invalid XML in dictionary",
            details,
        )
        .with_hint("Expected <dictionary><recognized><word>..</word></recognized><unrecognized>..</unrecognized></dictionary>")
    }

    pub fn project_stale(root: impl Into<String>, problem: impl Into<String>) -> Self {
        let details = serde_json::json!({
            "root": root.into(),
            "problem": problem.into(),
        });

        Self::new(ErrorCode::ProjectStale, "Project state is stale", details)
    }

    pub fn refactor_no_progress(
        file: impl Into<String>,
        offset: usize,
        name: impl Into<String>,
    ) -> Self {
        let details = to_details(RenameTargetDetails {
            file: file.into(),
            offset,
            name: Some(name.into()),
            problem: None,
        });

        Self::new(
            ErrorCode::RefactorNoProgress,
            "Rename did not change the definition",
            details,
        )
    }

    pub fn rename_unresolvable(
        file: impl Into<String>,
        offset: usize,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(RenameTargetDetails {
            file: file.into(),
            offset,
            name: None,
            problem: Some(problem.into()),
        });

        Self::new(
            ErrorCode::RenameUnresolvable,
            "Offset does not address a renameable definition",
            details,
        )
    }

    pub fn rename_invalid_name(
        file: impl Into<String>,
        offset: usize,
        name: impl Into<String>,
    ) -> Self {
        let details = to_details(RenameTargetDetails {
            file: file.into(),
            offset,
            name: Some(name.into()),
            problem: Some("not a valid identifier".to_string()),
        });

        Self::new(ErrorCode::RenameInvalidName, "Invalid new name", details)
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
