use std::path::Path;

use pyrename::defaults::Defaults;
use pyrename::locator::DefinitionPattern;
use pyrename::{
    Locator, RefactorDriver, Renamer, TextualRenameEngine, WordDictionary, Workspace,
};
use tempfile::TempDir;

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(full, content).unwrap();
}

fn dictionary() -> WordDictionary {
    let mut words = WordDictionary::new();
    words.extend_from_lines("the\nquick\nbrown\nfox\njumps\nover\nlazy\ndog\nget\nset\n");
    words
}

#[test]
fn every_definition_is_renamed_once_across_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "zoo/animals.py",
        "class Fox:\n    def getBrownFox(self):\n        return self.setlazyDog()\n\n    def setlazyDog(self):\n        pass\n\n    def __init__(self):\n        pass\n",
    );
    write(
        root,
        "main.py",
        "from zoo.animals import Fox\n\ndef thequickfox():\n    return Fox().getBrownFox()\n",
    );

    let words = dictionary();
    let workspace = Workspace::open(root, &Defaults::default()).unwrap();
    let locator = Locator::new(Renamer::new(&words), DefinitionPattern::new(&["def"]).unwrap());
    let engine = TextualRenameEngine::new(DefinitionPattern::new(&["def"]).unwrap());
    let driver = RefactorDriver::new(&workspace, &locator);

    let planned = driver.dry_run().unwrap();
    assert_eq!(planned.total_candidates, 3);

    let report = driver.refactor(&engine).unwrap();

    let renamed: Vec<(&str, &str)> = report
        .renames
        .iter()
        .map(|r| (r.old_name.as_str(), r.new_name.as_str()))
        .collect();
    assert_eq!(
        renamed,
        vec![
            ("thequickfox", "the_quick_fox"),
            ("getBrownFox", "get_brown_fox"),
            ("setlazyDog", "set_lazy_dog"),
        ]
    );
    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.files_changed, 2);
    // getBrownFox is declared in zoo/animals.py and called from main.py.
    assert_eq!(report.renames[1].files_changed, 2);

    let main = std::fs::read_to_string(root.join("main.py")).unwrap();
    assert_eq!(
        main,
        "from zoo.animals import Fox\n\ndef the_quick_fox():\n    return Fox().get_brown_fox()\n"
    );
    let animals = std::fs::read_to_string(root.join("zoo/animals.py")).unwrap();
    assert!(animals.contains("def get_brown_fox(self):"));
    assert!(animals.contains("return self.set_lazy_dog()"));
    assert!(animals.contains("def __init__(self):"));

    let again = driver.dry_run().unwrap();
    assert_eq!(again.total_candidates, 0);
}

#[test]
fn module_filter_limits_scanned_files_but_not_references() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "pkg/core.py", "def brownfox():\n    pass\n");
    write(root, "other/use.py", "from pkg.core import brownfox\n\ndef lazydog():\n    brownfox()\n");

    let words = dictionary();
    let workspace = Workspace::open(root, &Defaults::default())
        .unwrap()
        .with_module(&root.join("pkg"))
        .unwrap();
    let locator = Locator::new(Renamer::new(&words), DefinitionPattern::new(&["def"]).unwrap());
    let engine = TextualRenameEngine::new(DefinitionPattern::new(&["def"]).unwrap());

    let report = RefactorDriver::new(&workspace, &locator)
        .refactor(&engine)
        .unwrap();

    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.renames.len(), 1);

    let user = std::fs::read_to_string(root.join("other/use.py")).unwrap();
    assert_eq!(
        user,
        "from pkg.core import brown_fox\n\ndef lazydog():\n    brown_fox()\n"
    );
}
