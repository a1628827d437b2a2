use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{check_owner, Access, IdentityClaim};
use crate::error::ApiError;

/// Element addressable by its own generated id
pub trait Entry {
    fn entry_id(&self) -> Uuid;
}

/// Element written by a particular user
pub trait Authored {
    fn author_id(&self) -> Uuid;
}

/// Element whose presence marks a user's membership (one per user)
pub trait Member {
    fn member_id(&self) -> Uuid;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("entry not found")]
    NotFound,
    #[error("entry belongs to another user")]
    Forbidden,
    #[error("user is already a member")]
    AlreadyMember,
    #[error("user is not a member")]
    NotMember,
}

impl EntryError {
    /// Map to the API error for a given kind of entry, e.g. "Comment"
    pub fn describe(self, noun: &str) -> ApiError {
        match self {
            EntryError::NotFound => ApiError::not_found(format!("{} does not exist", noun)),
            EntryError::Forbidden => ApiError::forbidden("User not authorized"),
            EntryError::AlreadyMember => ApiError::conflict(format!("{} already exists", noun)),
            EntryError::NotMember => ApiError::conflict(format!("{} does not exist", noun)),
        }
    }
}

/// Ordered embedded collection, most recent first.
///
/// Insertions go to the head; removals keep the relative order of everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entries<T>(Vec<T>);

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<Vec<T>> for Entries<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T> Entries<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn first(&self) -> Option<&T> {
        self.0.first()
    }

    /// Prepend without any ownership check
    pub fn insert_front(&mut self, item: T) {
        self.0.insert(0, item);
    }

    fn take_at(&mut self, index: usize) -> T {
        self.0.remove(index)
    }
}

impl<T: Member> Entries<T> {
    pub fn contains_member(&self, user_id: Uuid) -> bool {
        self.0.iter().any(|item| item.member_id() == user_id)
    }

    /// Add a membership marker at the head; rejects a second marker for the same user
    pub fn add_member(&mut self, item: T) -> Result<(), EntryError> {
        if self.contains_member(item.member_id()) {
            return Err(EntryError::AlreadyMember);
        }
        self.insert_front(item);
        Ok(())
    }

    /// Remove the user's membership marker; rejects when there is none
    pub fn remove_member(&mut self, user_id: Uuid) -> Result<T, EntryError> {
        let index = self
            .0
            .iter()
            .position(|item| item.member_id() == user_id)
            .ok_or(EntryError::NotMember)?;
        Ok(self.take_at(index))
    }
}

impl<T: Entry> Entries<T> {
    fn position(&self, id: Uuid) -> Result<usize, EntryError> {
        self.0
            .iter()
            .position(|item| item.entry_id() == id)
            .ok_or(EntryError::NotFound)
    }

    /// Remove by id where the caller's ownership of the parent was already established
    pub fn remove(&mut self, id: Uuid) -> Result<T, EntryError> {
        let index = self.position(id)?;
        Ok(self.take_at(index))
    }
}

impl<T: Entry + Authored> Entries<T> {
    /// Remove by id, only when the acting identity wrote the entry.
    /// A denied removal leaves the collection untouched.
    pub fn remove_authored(&mut self, id: Uuid, claim: &IdentityClaim) -> Result<T, EntryError> {
        let index = self.position(id)?;
        match check_owner(claim, self.0[index].author_id()) {
            Access::Allow => Ok(self.take_at(index)),
            Access::Forbidden => Err(EntryError::Forbidden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Uuid,
        author: Uuid,
    }

    impl Entry for Note {
        fn entry_id(&self) -> Uuid {
            self.id
        }
    }

    impl Authored for Note {
        fn author_id(&self) -> Uuid {
            self.author
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Mark(Uuid);

    impl Member for Mark {
        fn member_id(&self) -> Uuid {
            self.0
        }
    }

    fn note(author: Uuid) -> Note {
        Note { id: Uuid::new_v4(), author }
    }

    #[test]
    fn insert_front_puts_item_at_index_zero() {
        let author = Uuid::new_v4();
        let mut notes = Entries::from(vec![note(author), note(author)]);
        let newest = note(author);

        notes.insert_front(newest.clone());

        assert_eq!(notes.len(), 3);
        assert_eq!(notes.first(), Some(&newest));
    }

    #[test]
    fn second_membership_is_rejected() {
        let user = Uuid::new_v4();
        let mut marks = Entries::new();

        marks.add_member(Mark(user)).unwrap();
        assert_eq!(marks.add_member(Mark(user)), Err(EntryError::AlreadyMember));
        assert_eq!(marks.len(), 1);
    }

    #[test]
    fn removing_absent_membership_is_rejected() {
        let mut marks: Entries<Mark> = Entries::new();
        assert_eq!(marks.remove_member(Uuid::new_v4()), Err(EntryError::NotMember));
    }

    #[test]
    fn remove_member_keeps_order_of_the_rest() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut marks = Entries::new();
        for user in [a, b, c] {
            marks.add_member(Mark(user)).unwrap();
        }

        marks.remove_member(b).unwrap();

        assert_eq!(marks.as_slice(), &[Mark(c), Mark(a)]);
    }

    #[test]
    fn remove_authored_by_someone_else_is_forbidden_and_unchanged() {
        let author = Uuid::new_v4();
        let target = note(author);
        let mut notes = Entries::from(vec![note(author), target.clone()]);
        let before = notes.clone();

        let stranger = IdentityClaim { user_id: Uuid::new_v4() };
        assert_eq!(notes.remove_authored(target.id, &stranger), Err(EntryError::Forbidden));
        assert_eq!(notes, before);
    }

    #[test]
    fn remove_authored_missing_id_is_not_found() {
        let author = Uuid::new_v4();
        let mut notes = Entries::from(vec![note(author)]);
        let claim = IdentityClaim { user_id: author };
        assert_eq!(notes.remove_authored(Uuid::new_v4(), &claim), Err(EntryError::NotFound));
    }

    #[test]
    fn remove_authored_by_author_keeps_order() {
        let author = Uuid::new_v4();
        let (first, middle, last) = (note(author), note(author), note(author));
        let mut notes = Entries::from(vec![first.clone(), middle.clone(), last.clone()]);

        let removed = notes
            .remove_authored(middle.id, &IdentityClaim { user_id: author })
            .unwrap();

        assert_eq!(removed, middle);
        assert_eq!(notes.as_slice(), &[first, last]);
    }

    #[test]
    fn unconditional_remove_skips_author_check() {
        let mut notes = Entries::from(vec![note(Uuid::new_v4())]);
        let id = notes.as_slice()[0].id;
        assert!(notes.remove(id).is_ok());
        assert!(notes.is_empty());
        assert_eq!(notes.remove(id), Err(EntryError::NotFound));
    }
}
