//! The question bank file and the single component allowed to touch it.
//!
//! Every read and write goes through [`QuestionStore`], which serializes
//! access with an internal mutex. Writes replace the file wholesale via a
//! temp file in the same directory and a rename.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::model::Question;
use crate::parser::parse_bank;

/// Owner of the bank file.
#[derive(Debug)]
pub struct QuestionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl QuestionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the live bank file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the bank, reporting why it could not be read.
    pub fn try_load(&self) -> Result<Vec<Question>, StoreError> {
        let _guard = self.guard();
        self.load_unlocked()
    }

    fn load_unlocked(&self) -> Result<Vec<Question>, StoreError> {
        let content = self.read_unlocked()?;
        parse_bank(&content).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Load the bank, falling back to an empty bank on any failure.
    pub fn load(&self) -> Vec<Question> {
        match self.try_load() {
            Ok(bank) => bank,
            Err(e) => {
                tracing::warn!("error loading questions: {e}");
                Vec::new()
            }
        }
    }

    /// Bounds-checked lookup. Negative or out-of-range indices yield `None`.
    pub fn get_by_index<I>(index: I, bank: &[Question]) -> Option<&Question>
    where
        I: TryInto<usize>,
    {
        index.try_into().ok().and_then(|i| bank.get(i))
    }

    /// Replace the bank file with `bank` as pretty-printed JSON.
    pub fn save(&self, bank: &[Question]) -> Result<(), StoreError> {
        let _guard = self.guard();
        self.save_unlocked(bank)
    }

    fn save_unlocked(&self, bank: &[Question]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(bank).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        self.write_unlocked(&json)?;
        tracing::info!("saved {} questions to {}", bank.len(), self.path.display());
        Ok(())
    }

    /// Read the bank file's bytes as-is.
    pub fn read_raw(&self) -> Result<Vec<u8>, StoreError> {
        let _guard = self.guard();
        self.read_unlocked()
    }

    /// Replace the bank file with `content`.
    pub fn write_raw(&self, content: &[u8]) -> Result<(), StoreError> {
        let _guard = self.guard();
        self.write_unlocked(content)
    }

    fn read_unlocked(&self) -> Result<Vec<u8>, StoreError> {
        std::fs::read(&self.path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StoreError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                StoreError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })
    }

    fn write_unlocked(&self, content: &[u8]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(io_err)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(content).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    /// Copy `seed` into place when the bank file does not exist yet.
    ///
    /// Returns `true` if the bank was seeded.
    pub fn ensure_seeded(&self, seed: &Path) -> Result<bool, StoreError> {
        let _guard = self.guard();
        if self.path.exists() {
            return Ok(false);
        }
        let content = std::fs::read(seed).map_err(|source| StoreError::Io {
            path: seed.to_path_buf(),
            source,
        })?;
        self.write_unlocked(&content)?;
        tracing::info!(
            "initialized question bank {} from {}",
            self.path.display(),
            seed.display()
        );
        Ok(true)
    }

    /// Replace the question at `index`, keeping every other position intact.
    pub fn edit_question(&self, index: usize, question: Question) -> Result<(), StoreError> {
        question.check().map_err(StoreError::InvalidQuestion)?;
        let _guard = self.guard();
        let mut bank = self.load_unlocked()?;
        let len = bank.len();
        let slot = bank
            .get_mut(index)
            .ok_or(StoreError::QuestionNotFound { index, len })?;
        *slot = question;
        self.save_unlocked(&bank)
    }

    /// Replace the whole bank.
    pub fn save_all(&self, bank: &[Question]) -> Result<(), StoreError> {
        self.save(bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{bank, question};

    fn store_in(dir: &tempfile::TempDir) -> QuestionStore {
        QuestionStore::new(dir.path().join("test_questions.json"))
    }

    #[test]
    fn load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_empty());
        assert!(matches!(store.try_load(), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn load_malformed_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().is_empty());
        assert!(matches!(store.try_load(), Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn save_load_roundtrip_preserves_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let original = r#"[
  {"ksa": "K2", "question": "Q?", "choices": ["A. yes", "B. no"],
   "correct_answers": ["B"], "explanation": "no.", "regulations": []},
  {"question": "R?", "choices": ["A. x", "B. y", "C. z"],
   "correct_answers": ["A", "C"], "explanation": "both."}
]"#;
        std::fs::write(store.path(), original).unwrap();

        let loaded = store.load();
        store.save(&loaded).unwrap();

        let before: serde_json::Value = serde_json::from_str(original).unwrap();
        let after: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn wrapped_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let wrapped = serde_json::json!({ "questions": bank(2) });
        std::fs::write(store.path(), wrapped.to_string()).unwrap();
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn get_by_index_bounds() {
        let b = bank(3);
        assert!(QuestionStore::get_by_index(2usize, &b).is_some());
        assert!(QuestionStore::get_by_index(3usize, &b).is_none());
        assert!(QuestionStore::get_by_index(-1i64, &b).is_none());
    }

    #[test]
    fn edit_question_replaces_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&bank(3)).unwrap();

        store
            .edit_question(1, question("Edited", &["B", "D"]))
            .unwrap();
        let loaded = store.load();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[1].question, "Edited");
        assert_eq!(loaded[0].question, "Q0");

        let err = store.edit_question(9, question("X", &["A"])).unwrap_err();
        assert!(matches!(err, StoreError::QuestionNotFound { index: 9, len: 3 }));

        let err = store.edit_question(0, question("X", &[])).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuestion(_)));
        assert_eq!(store.load()[0].question, "Q0");
    }

    #[test]
    fn ensure_seeded_only_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed.json");
        std::fs::write(&seed, serde_json::to_vec(&bank(4)).unwrap()).unwrap();

        let store = QuestionStore::new(dir.path().join("data").join("bank.json"));
        assert!(store.ensure_seeded(&seed).unwrap());
        assert_eq!(store.load().len(), 4);

        store.save(&bank(1)).unwrap();
        assert!(!store.ensure_seeded(&seed).unwrap());
        assert_eq!(store.load().len(), 1);
    }
}
