use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::StorageError;
use crate::member::{Expense, Member};
use crate::store::{MemberStore, StorageResult};
use crate::types::{MemberId, Role};

#[derive(Debug, Default)]
struct Inner {
    members: HashMap<MemberId, Member>,
    // insertion order for stable listings
    order: Vec<MemberId>,
    expenses: Vec<Expense>,
}

/// process-local store, mostly for tests and demos
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member_count(&self) -> usize {
        self.inner.read().map(|inner| inner.members.len()).unwrap_or(0)
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Unavailable("in-memory store lock poisoned".to_string())
}

impl MemberStore for InMemoryStore {
    fn load_member(&self, id: MemberId) -> StorageResult<Option<Member>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.members.get(&id).cloned())
    }

    fn save_member(&self, member: &Member) -> StorageResult<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        if inner.members.insert(member.id, member.clone()).is_none() {
            inner.order.push(member.id);
        }
        tracing::debug!(member_id = %member.id, "member saved in memory");
        Ok(())
    }

    fn list_members(&self, role: Option<Role>) -> StorageResult<Vec<Member>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.members.get(id))
            .filter(|m| role.map_or(true, |r| m.role == r))
            .cloned()
            .collect())
    }

    fn list_expenses(&self) -> StorageResult<Vec<Expense>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.expenses.clone())
    }

    fn record_expense(&self, expense: &Expense) -> StorageResult<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.expenses.push(expense.clone());
        Ok(())
    }
}
