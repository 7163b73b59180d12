//! Per-lesson progress cache.
//!
//! Files are stored under the configured cache directory using a hash of the
//! lesson key (its path, or `builtin`) as the directory name to avoid
//! filesystem issues. The format is a tiny TOML file.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

pub const BUILTIN_LESSON_KEY: &str = "builtin";

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LessonProgress {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed_runs: u32,
    #[serde(default)]
    pub last_completed_unix: Option<u64>,
}

impl LessonProgress {
    pub fn record_completion(&mut self, title: &str) {
        self.title = title.to_string();
        self.completed_runs = self.completed_runs.saturating_add(1);
        self.last_completed_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_secs());
    }
}

pub fn lesson_key(lesson_path: Option<&Path>) -> String {
    lesson_path
        .map(|path| path.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_else(|| BUILTIN_LESSON_KEY.to_string())
}

pub fn hash_dir(cache_root: &Path, key: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    cache_root.join(hash)
}

fn progress_path(cache_root: &Path, key: &str) -> PathBuf {
    hash_dir(cache_root, key).join("progress.toml")
}

/// Load cached progress for a lesson; missing or unreadable entries read as
/// no progress.
pub fn load_progress(cache_root: &Path, key: &str) -> LessonProgress {
    let path = progress_path(cache_root, key);
    let Ok(data) = fs::read_to_string(&path) else {
        return LessonProgress::default();
    };
    toml::from_str(&data).unwrap_or_else(|err| {
        debug!(path = %path.display(), "Ignoring unreadable progress cache: {err}");
        LessonProgress::default()
    })
}

pub fn save_progress(cache_root: &Path, key: &str, progress: &LessonProgress) -> Result<()> {
    let path = progress_path(cache_root, key);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating cache directory {}", parent.display()))?;
    }
    let contents = toml::to_string(progress).context("Serializing lesson progress")?;
    fs::write(&path, contents)
        .with_context(|| format!("Writing progress cache {}", path.display()))?;
    debug!(
        path = %path.display(),
        completed_runs = progress.completed_runs,
        "Saved lesson progress"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "sketchpad-lessons-cache-test-{}-{name}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        root
    }

    #[test]
    fn progress_survives_a_round_trip() {
        let root = scratch_root("round-trip");
        let key = lesson_key(Some(Path::new("lessons/fractions.json")));

        let mut progress = load_progress(&root, &key);
        assert_eq!(progress.completed_runs, 0);
        progress.record_completion("Fractions");
        progress.record_completion("Fractions");
        save_progress(&root, &key, &progress).expect("save progress");

        let loaded = load_progress(&root, &key);
        assert_eq!(loaded, progress);
        assert_eq!(loaded.completed_runs, 2);
        assert!(loaded.last_completed_unix.is_some());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn distinct_lessons_hash_to_distinct_dirs() {
        let root = Path::new(".cache");
        assert_ne!(
            hash_dir(root, &lesson_key(None)),
            hash_dir(root, &lesson_key(Some(Path::new("a.json"))))
        );
        assert_eq!(lesson_key(None), BUILTIN_LESSON_KEY);
    }
}
