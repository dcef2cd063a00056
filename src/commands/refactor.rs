use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use pyrename::defaults::{self, Defaults};
use pyrename::locator::DefinitionPattern;
use pyrename::log_status;
use pyrename::{
    DryRunReport, Locator, RefactorDriver, RefactorReport, Renamer, TextualRenameEngine,
    WordDictionary, Workspace,
};

use super::{CmdResult, GlobalArgs};

#[derive(Args, Debug)]
pub struct RefactorArgs {
    /// Path to project folder
    #[arg(value_name = "PROJECT_PATH")]
    pub path: String,

    /// Path to module folder (sub path of the project) to limit which files are scanned
    #[arg(short, long, value_name = "MODULE_PATH")]
    pub module: Option<String>,

    /// Do not refactor any files, just list the work order
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// JSON or XML dictionary of extra recognized and unrecognized words
    #[arg(short, long = "dict", value_name = "DICTIONARY")]
    pub dict: Option<String>,

    /// Base word list, one word per line (default: "words" or pyrename.json)
    #[arg(short, long, value_name = "WORDS")]
    pub words: Option<String>,

    /// Keyword that introduces a definition; repeat for several (default: def)
    #[arg(short = 'k', long = "keyword", value_name = "KEYWORD")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "command")]
pub enum RefactorOutput {
    #[serde(rename = "refactor.dry_run")]
    DryRun {
        project: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        module: Option<String>,
        dictionary_words: usize,
        report: DryRunReport,
    },
    #[serde(rename = "refactor.apply")]
    Apply {
        project: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        module: Option<String>,
        dictionary_words: usize,
        report: RefactorReport,
    },
}

pub fn run(args: RefactorArgs, _global: &GlobalArgs) -> CmdResult<RefactorOutput> {
    let defaults = effective_defaults(defaults::load_defaults(), &args);

    // Paths are checked before the dictionary so bad input never costs a load.
    let mut workspace = Workspace::open(Path::new(&args.path), &defaults)?;
    if let Some(module) = &args.module {
        workspace = workspace.with_module(Path::new(module))?;
    }

    let dictionary = load_dictionary(&defaults.words_path, args.dict.as_deref())?;
    let pattern = DefinitionPattern::new(defaults.definition_keywords.as_slice())?;
    let locator = Locator::new(Renamer::new(&dictionary), pattern.clone());
    let driver = RefactorDriver::new(&workspace, &locator)
        .with_max_passes_per_file(defaults.max_passes_per_file);

    let project = workspace.root().display().to_string();
    let module = workspace.module().map(|m| m.display().to_string());

    let output = if args.dry_run {
        RefactorOutput::DryRun {
            project,
            module,
            dictionary_words: dictionary.len(),
            report: driver.dry_run()?,
        }
    } else {
        let engine = TextualRenameEngine::new(pattern);
        let report = driver.refactor(&engine)?;
        log_status!(
            "refactor",
            "{} renames across {} files",
            report.renames.len(),
            report.files_changed
        );
        RefactorOutput::Apply {
            project,
            module,
            dictionary_words: dictionary.len(),
            report,
        }
    };

    Ok((output, 0))
}

/// Apply CLI overrides on top of config defaults.
fn effective_defaults(mut defaults: Defaults, args: &RefactorArgs) -> Defaults {
    if let Some(words) = &args.words {
        defaults.words_path = words.clone();
    }
    if !args.keywords.is_empty() {
        defaults.definition_keywords = args.keywords.clone();
    }
    defaults
}

fn load_dictionary(words_path: &str, overrides: Option<&str>) -> pyrename::Result<WordDictionary> {
    let mut dictionary = WordDictionary::new();

    let words_path = PathBuf::from(shellexpand::tilde(words_path).to_string());
    let count = dictionary.load_base(&words_path)?;
    log_status!("dictionary", "{} words from {}", count, words_path.display());

    if let Some(path) = overrides {
        let path = PathBuf::from(shellexpand::tilde(path).to_string());
        let applied = dictionary.load_overrides(&path)?;
        log_status!(
            "dictionary",
            "+{} -{} from {}",
            applied.recognized.len(),
            applied.unrecognized.len(),
            path.display()
        );
    }

    Ok(dictionary)
}
