//! Persistence collaborator interface and reference stores.

pub mod json;
pub mod memory;

use crate::errors::StorageError;
use crate::member::{Expense, Member};
use crate::types::{MemberId, Role};

pub use json::JsonFileStore;
pub use memory::InMemoryStore;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// document store holding member aggregates and expenses.
///
/// saves replace the whole member record; the last writer wins.
pub trait MemberStore {
    /// `Ok(None)` when no member has this id
    fn load_member(&self, id: MemberId) -> StorageResult<Option<Member>>;

    fn save_member(&self, member: &Member) -> StorageResult<()>;

    /// all members, or only those with `role`
    fn list_members(&self, role: Option<Role>) -> StorageResult<Vec<Member>>;

    fn list_expenses(&self) -> StorageResult<Vec<Expense>>;

    fn record_expense(&self, expense: &Expense) -> StorageResult<()>;
}

impl<S: MemberStore + ?Sized> MemberStore for &S {
    fn load_member(&self, id: MemberId) -> StorageResult<Option<Member>> {
        (**self).load_member(id)
    }

    fn save_member(&self, member: &Member) -> StorageResult<()> {
        (**self).save_member(member)
    }

    fn list_members(&self, role: Option<Role>) -> StorageResult<Vec<Member>> {
        (**self).list_members(role)
    }

    fn list_expenses(&self) -> StorageResult<Vec<Expense>> {
        (**self).list_expenses()
    }

    fn record_expense(&self, expense: &Expense) -> StorageResult<()> {
        (**self).record_expense(expense)
    }
}
