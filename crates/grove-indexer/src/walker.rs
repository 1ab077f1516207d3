use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use grove_core::JavaParser;

/// Collects Java sources under `root`.
///
/// Honors `.gitignore` even outside a git checkout, and prunes any
/// directory whose name is in `ignored`. The result is sorted so repeated
/// runs ingest files in the same order.
pub fn collect_sources(root: &Path, ignored: &[String]) -> Vec<PathBuf> {
    let ignored = ignored.to_vec();
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_exclude(true)
        .require_git(false);
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        !(is_dir && entry.depth() > 0 && is_ignored_dir(entry.file_name(), &ignored))
    });

    let mut files = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                let path = entry.path();
                if is_java_source(path) {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => warn!("Failed to read entry: {}", e),
        }
    }

    files.sort();
    debug!("Found {} Java files under {}", files.len(), root.display());
    files
}

fn is_ignored_dir(name: &std::ffi::OsStr, ignored: &[String]) -> bool {
    name.to_str()
        .is_some_and(|name| ignored.iter().any(|dir| dir == name))
}

fn is_java_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| JavaParser::extensions().contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collects_java_and_prunes_ignored() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/shop")).unwrap();
        fs::create_dir_all(root.join("build/gen")).unwrap();
        fs::write(root.join("src/shop/Order.java"), "class Order {}").unwrap();
        fs::write(root.join("src/shop/notes.txt"), "not java").unwrap();
        fs::write(root.join("build/gen/Gen.java"), "class Gen {}").unwrap();
        fs::write(root.join("Main.java"), "class Main {}").unwrap();

        let files = collect_sources(root, &["build".to_string()]);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(names, vec!["Main.java", "src/shop/Order.java"]);
    }

    #[test]
    fn test_honors_gitignore_without_repo() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("generated")).unwrap();
        fs::write(root.join(".gitignore"), "generated/\n").unwrap();
        fs::write(root.join("generated/Stub.java"), "class Stub {}").unwrap();
        fs::write(root.join("Kept.java"), "class Kept {}").unwrap();

        let files = collect_sources(root, &[]);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Kept.java"));
    }
}
