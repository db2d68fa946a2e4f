use crate::error::Result;
use crate::frontmatter::read_frontmatter;
use ignore::WalkBuilder;
use serde_yaml::Value;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

const IGNORE_FILE: &str = ".rfqignore";

pub fn collect_markdown_files(vault_path: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(vault_path)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .add_custom_ignore_filename(IGNORE_FILE)
        .build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable vault entry");
                None
            }
        })
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    files
}

pub fn read_paths_from_stdin() -> Vec<PathBuf> {
    io::stdin()
        .lock()
        .lines()
        .map_while(|line| line.ok())
        .filter(|line| !line.trim().is_empty())
        .map(PathBuf::from)
        .collect()
}

pub fn load_records(files: Vec<PathBuf>) -> Result<Vec<(PathBuf, Value)>> {
    let mut records = Vec::with_capacity(files.len());
    for path in files {
        if let Some(record) = read_frontmatter(&path)? {
            records.push((path, record));
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collects_markdown_and_honours_ignore_file() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("notes")).unwrap();
        fs::create_dir(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("notes/a.md"), "---\nstatus: active\n---\n").unwrap();
        fs::write(dir.path().join("notes/b.txt"), "ignored").unwrap();
        fs::write(dir.path().join("drafts/c.md"), "---\nstatus: draft\n---\n").unwrap();
        fs::write(dir.path().join(IGNORE_FILE), "drafts/\n").unwrap();

        let files = collect_markdown_files(dir.path());
        assert_eq!(files, vec![dir.path().join("notes/a.md")]);
    }

    #[test]
    fn test_load_records_skips_files_without_frontmatter() {
        let dir = tempdir().unwrap();
        let with = dir.path().join("with.md");
        let without = dir.path().join("without.md");
        fs::write(&with, "---\nstatus: active\n---\nbody").unwrap();
        fs::write(&without, "no frontmatter here").unwrap();

        let records = load_records(vec![with.clone(), without]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, with);
        assert_eq!(records[0].1["status"], "active");
    }

    #[test]
    fn test_load_records_reports_missing_files() {
        let dir = tempdir().unwrap();
        assert!(load_records(vec![dir.path().join("gone.md")]).is_err());
    }
}
