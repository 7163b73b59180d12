//! Lists lesson documents found in a directory.

use crate::script::load_script;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonEntry {
    pub path: PathBuf,
    pub title: String,
    pub paragraphs: usize,
}

impl std::fmt::Display for LessonEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Every readable `*.json` lesson under `dir`, sorted by title.
/// Unreadable or invalid documents are skipped.
pub fn list_lessons(dir: &Path) -> Vec<LessonEntry> {
    let Ok(entries) = fs::read_dir(dir) else {
        debug!(dir = %dir.display(), "Lesson directory not readable");
        return Vec::new();
    };

    let mut lessons: Vec<LessonEntry> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .filter_map(|path| match load_script(&path) {
            Ok(script) => Some(LessonEntry {
                title: script.title,
                paragraphs: script.paragraphs.len(),
                path,
            }),
            Err(err) => {
                warn!(path = %path.display(), "Skipping lesson: {err:#}");
                None
            }
        })
        .collect();

    lessons.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.path.cmp(&b.path)));
    lessons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lesson-catalog-test-{}-{name}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn lists_valid_lessons_sorted_by_title() {
        let dir = scratch_dir("sorted");
        fs::write(
            dir.join("b.json"),
            r#"{ "title": "Zebra", "paragraphs": [ { "text": "z" } ] }"#,
        )
        .unwrap();
        fs::write(
            dir.join("a.json"),
            r#"{ "title": "Apple", "paragraphs": [ { "text": "a" }, { "text": "b" } ] }"#,
        )
        .unwrap();
        fs::write(dir.join("broken.json"), "{ not json").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let lessons = list_lessons(&dir);
        let titles: Vec<&str> = lessons.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "Zebra"]);
        assert_eq!(lessons[0].paragraphs, 2);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = std::env::temp_dir().join("lesson-catalog-test-does-not-exist");
        assert!(list_lessons(&dir).is_empty());
    }
}
