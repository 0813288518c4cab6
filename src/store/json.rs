use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::StorageError;
use crate::member::{Expense, Member};
use crate::store::{MemberStore, StorageResult};
use crate::types::{MemberId, Role};

/// on-disk document
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerDocument {
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    expenses: Vec<Expense>,
}

/// whole ledger kept as one pretty-printed json document
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// a missing file reads as an empty ledger
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StorageResult<LedgerDocument> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(LedgerDocument::default()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(LedgerDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, document: &LedgerDocument) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), members = document.members.len(), "ledger document written");
        Ok(())
    }

    /// read-modify-write under the process-local lock
    fn update<F>(&self, apply: F) -> StorageResult<()>
    where
        F: FnOnce(&mut LedgerDocument),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::Unavailable("json store lock poisoned".to_string()))?;
        let mut document = self.read_document()?;
        apply(&mut document);
        self.write_document(&document)
    }
}

impl MemberStore for JsonFileStore {
    fn load_member(&self, id: MemberId) -> StorageResult<Option<Member>> {
        Ok(self.read_document()?.members.into_iter().find(|m| m.id == id))
    }

    fn save_member(&self, member: &Member) -> StorageResult<()> {
        self.update(|document| {
            match document.members.iter_mut().find(|m| m.id == member.id) {
                Some(existing) => *existing = member.clone(),
                None => document.members.push(member.clone()),
            }
        })
    }

    fn list_members(&self, role: Option<Role>) -> StorageResult<Vec<Member>> {
        Ok(self
            .read_document()?
            .members
            .into_iter()
            .filter(|m| role.map_or(true, |r| m.role == r))
            .collect())
    }

    fn list_expenses(&self) -> StorageResult<Vec<Expense>> {
        Ok(self.read_document()?.expenses)
    }

    fn record_expense(&self, expense: &Expense) -> StorageResult<()> {
        self.update(|document| document.expenses.push(expense.clone()))
    }
}
