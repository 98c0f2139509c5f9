//! The guest collection store.
//!
//! [`GuestStore`] owns the ordered guest list, applies validated mutations,
//! and writes the whole list back to its [`KeyValueStore`] after each one.
//! Mutations never touch the current list in place: they build a new list and
//! swap it in, so a [`snapshot`](GuestStore::snapshot) taken earlier is never
//! altered.
//!
//! Edit mode and pending confirmations are view state. They are held here,
//! keyed by id, and are never persisted.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::filter::{self, FilterMode};
use crate::guest::{Guest, GuestDraft, GuestId};
use crate::storage::{self, KeyValueStore};
use crate::summary::Summary;
use crate::validation;

/// A destructive action waiting for the user to confirm or cancel it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Remove a single guest.
    Remove(GuestId),
    /// Remove every guest.
    ClearAll,
}

impl std::fmt::Display for PendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remove(id) => write!(f, "removal of guest {id}"),
            Self::ClearAll => write!(f, "clearing all guests"),
        }
    }
}

/// The guest list and its persistence.
#[derive(Debug)]
pub struct GuestStore<S: KeyValueStore> {
    backend: S,
    key: String,
    guests: Arc<[Guest]>,
    editing: HashSet<GuestId>,
    pending: Option<PendingAction>,
}

impl<S: KeyValueStore> GuestStore<S> {
    /// Load the guest list stored under `key` in `backend`.
    ///
    /// A missing or unreadable value gives an empty list.
    pub fn open(backend: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let guests = storage::load_guests(&backend, &key);
        info!(key = %key, count = guests.len(), "Guest list loaded");
        Self {
            backend,
            key,
            guests: guests.into(),
            editing: HashSet::new(),
            pending: None,
        }
    }

    /// The storage key this list is saved under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backend the list is saved to.
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Give up the store, returning its backend.
    #[must_use]
    pub fn into_backend(self) -> S {
        self.backend
    }

    /// All guests, in insertion order.
    #[must_use]
    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    /// A handle to the current list that later mutations will not change.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[Guest]> {
        Arc::clone(&self.guests)
    }

    /// Number of guests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guests.len()
    }

    /// True when the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guests.is_empty()
    }

    /// Look up a guest by exact id.
    #[must_use]
    pub fn get(&self, id: &GuestId) -> Option<&Guest> {
        self.guests.iter().find(|g| &g.id == id)
    }

    /// Find the one guest whose id is `prefix` or starts with it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownGuest`] if nothing matches and
    /// [`Error::AmbiguousGuest`] if several ids share the prefix.
    pub fn resolve(&self, prefix: &str) -> Result<GuestId> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(Error::unknown_guest(prefix));
        }
        if let Some(guest) = self.guests.iter().find(|g| g.id.as_str() == prefix) {
            return Ok(guest.id.clone());
        }

        let matches: Vec<&Guest> = self
            .guests
            .iter()
            .filter(|g| g.id.as_str().starts_with(prefix))
            .collect();
        match matches.as_slice() {
            [] => Err(Error::unknown_guest(prefix)),
            [guest] => Ok(guest.id.clone()),
            many => Err(Error::AmbiguousGuest {
                prefix: prefix.to_string(),
                matches: many.len(),
            }),
        }
    }

    /// Validate `draft` and append it as a new, unconfirmed guest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name or email is invalid. Nothing
    /// is changed in that case.
    pub fn add(&mut self, draft: GuestDraft) -> Result<Guest> {
        validation::validate(&draft).into_result()?;

        let id = self.fresh_id();
        let now = Utc::now();
        let date_added = self
            .guests
            .iter()
            .map(|g| g.date_added)
            .max()
            .map_or(now, |latest| latest.max(now));

        let guest = Guest::from_draft(id, draft, date_added);
        let mut next = self.guests.to_vec();
        next.push(guest.clone());
        self.commit(next);

        info!(id = %guest.id, name = %guest.name, "Added guest");
        Ok(guest)
    }

    /// Flip the confirmed flag. Returns the updated guest, or `None` if absent.
    pub fn toggle_confirmed(&mut self, id: &GuestId) -> Option<Guest> {
        let guest = self.modify(id, |g| g.confirmed = !g.confirmed)?;
        info!(id = %id, confirmed = guest.confirmed, "Toggled confirmation");
        Some(guest)
    }

    /// Flip the RSVP flag. Returns the updated guest, or `None` if absent.
    pub fn toggle_rsvp(&mut self, id: &GuestId) -> Option<Guest> {
        let guest = self.modify(id, |g| g.rsvp = !g.rsvp)?;
        info!(id = %id, rsvp = guest.rsvp, "Toggled RSVP");
        Some(guest)
    }

    /// Enter or leave edit mode for a guest. Returns `false` if the id is absent.
    pub fn set_editing(&mut self, id: &GuestId, editing: bool) -> bool {
        if self.get(id).is_none() {
            debug!(id = %id, "Ignoring edit mode change for unknown guest");
            return false;
        }
        if editing {
            self.editing.insert(id.clone());
        } else {
            self.editing.remove(id);
        }
        true
    }

    /// Whether a guest is in edit mode.
    #[must_use]
    pub fn is_editing(&self, id: &GuestId) -> bool {
        self.editing.contains(id)
    }

    /// Leave edit mode without saving.
    pub fn cancel_edit(&mut self, id: &GuestId) -> bool {
        self.set_editing(id, false)
    }

    /// Validate `patch` and merge it into the guest, leaving edit mode.
    ///
    /// Returns `Ok(None)` if the id is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the patch is invalid; the guest and
    /// its edit mode are left as they were.
    pub fn update(&mut self, id: &GuestId, patch: GuestDraft) -> Result<Option<Guest>> {
        validation::validate(&patch).into_result()?;

        let Some(guest) = self.modify(id, |g| g.apply(patch)) else {
            return Ok(None);
        };
        self.editing.remove(id);
        info!(id = %id, name = %guest.name, "Updated guest");
        Ok(Some(guest))
    }

    /// Delete a guest. Removing an absent id is a no-op returning `false`.
    pub fn remove(&mut self, id: &GuestId) -> bool {
        if self.get(id).is_none() {
            debug!(id = %id, "Remove of unknown guest ignored");
            return false;
        }
        let next: Vec<Guest> = self.guests.iter().filter(|g| &g.id != id).cloned().collect();
        self.commit(next);
        self.editing.remove(id);
        if self.pending == Some(PendingAction::Remove(id.clone())) {
            self.pending = None;
        }
        info!(id = %id, "Removed guest");
        true
    }

    /// Delete every guest. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.guests.len();
        self.commit(Vec::new());
        self.editing.clear();
        self.pending = None;
        info!(removed, "Cleared guest list");
        removed
    }

    /// The destructive action awaiting confirmation, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Ask to remove a guest. Nothing is removed until [`confirm_removal`].
    ///
    /// Returns `false` (and records nothing) if the id is absent.
    ///
    /// [`confirm_removal`]: GuestStore::confirm_removal
    pub fn request_removal(&mut self, id: &GuestId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.pending = Some(PendingAction::Remove(id.clone()));
        debug!(id = %id, "Removal awaiting confirmation");
        true
    }

    /// Carry out a removal requested for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPendingConfirmation`] if the pending action is not
    /// the removal of `id`. Nothing changes in that case.
    pub fn confirm_removal(&mut self, id: &GuestId) -> Result<bool> {
        let expected = PendingAction::Remove(id.clone());
        if self.pending.as_ref() != Some(&expected) {
            return Err(Error::no_pending_confirmation(expected.to_string()));
        }
        self.pending = None;
        Ok(self.remove(id))
    }

    /// Drop a pending removal. Returns `false` if none was pending.
    pub fn cancel_removal(&mut self) -> bool {
        if matches!(self.pending, Some(PendingAction::Remove(_))) {
            self.pending = None;
            debug!("Removal cancelled");
            true
        } else {
            false
        }
    }

    /// Ask to clear the whole list. Nothing is removed until [`confirm_clear`].
    ///
    /// [`confirm_clear`]: GuestStore::confirm_clear
    pub fn request_clear(&mut self) {
        self.pending = Some(PendingAction::ClearAll);
        debug!("Clear all awaiting confirmation");
    }

    /// Carry out a requested clear. Returns how many guests were removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPendingConfirmation`] if no clear was requested.
    pub fn confirm_clear(&mut self) -> Result<usize> {
        if self.pending != Some(PendingAction::ClearAll) {
            return Err(Error::no_pending_confirmation(
                PendingAction::ClearAll.to_string(),
            ));
        }
        Ok(self.clear())
    }

    /// Drop a pending clear. Returns `false` if none was pending.
    pub fn cancel_clear(&mut self) -> bool {
        if self.pending == Some(PendingAction::ClearAll) {
            self.pending = None;
            debug!("Clear all cancelled");
            true
        } else {
            false
        }
    }

    /// Guests matching a search term and filter mode, in list order.
    #[must_use]
    pub fn visible(&self, search: &str, mode: FilterMode) -> Vec<&Guest> {
        filter::visible(&self.guests, search, mode)
    }

    /// Aggregate statistics over the whole list.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::from_guests(&self.guests)
    }

    /// Apply `change` to a copy of the guest with `id` and commit the new list.
    fn modify(&mut self, id: &GuestId, change: impl FnOnce(&mut Guest)) -> Option<Guest> {
        let Some(index) = self.guests.iter().position(|g| &g.id == id) else {
            debug!(id = %id, "No guest with this id, ignoring");
            return None;
        };
        let mut next = self.guests.to_vec();
        change(&mut next[index]);
        let updated = next[index].clone();
        self.commit(next);
        Some(updated)
    }

    /// Swap in a new list and write it through. Write failures are logged only.
    fn commit(&mut self, next: Vec<Guest>) {
        self.guests = next.into();
        if let Err(e) = storage::save_guests(&mut self.backend, &self.key, &self.guests) {
            error!(key = %self.key, error = %e, "Failed to save guest list");
        }
    }

    fn fresh_id(&self) -> GuestId {
        loop {
            let id = GuestId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::validation::FieldError;

    const KEY: &str = "eventGuests";

    fn empty_store() -> GuestStore<MemoryStore> {
        GuestStore::open(MemoryStore::new(), KEY)
    }

    fn ada() -> GuestDraft {
        GuestDraft::new("Ada Lovelace", "ada@example.com")
    }

    /// A backend whose writes always fail.
    #[derive(Debug, Default)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::DatabaseQuery(rusqlite::Error::InvalidQuery))
        }
    }

    #[test]
    fn test_add_toggle_remove_scenario() {
        let mut store = empty_store();
        let guest = store.add(ada()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(!guest.confirmed);
        assert!(!guest.rsvp);
        assert!(!store.is_editing(&guest.id));

        let toggled = store.toggle_confirmed(&guest.id).unwrap();
        assert!(toggled.confirmed);
        assert!(store.get(&guest.id).unwrap().confirmed);

        assert!(store.remove(&guest.id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_rejects_invalid_draft() {
        let mut store = empty_store();
        let err = store.add(GuestDraft::new("", "nope")).unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.name, Some(FieldError::NameRequired));
        assert_eq!(errors.email, Some(FieldError::EmailInvalid));
        assert!(store.is_empty());
        assert!(store.backend().is_empty());
    }

    #[test]
    fn test_add_assigns_unique_ids_and_ordered_dates() {
        let mut store = empty_store();
        for i in 0..20 {
            store
                .add(GuestDraft::new(format!("Guest {i}"), format!("g{i}@example.com")))
                .unwrap();
        }
        let ids: HashSet<&GuestId> = store.guests().iter().map(|g| &g.id).collect();
        assert_eq!(ids.len(), 20);
        for pair in store.guests().windows(2) {
            assert!(pair[0].date_added <= pair[1].date_added);
        }
    }

    #[test]
    fn test_add_never_dates_before_existing_guests() {
        let future = Utc::now() + chrono::Duration::days(1);
        let mut seeded = Guest::from_draft(GuestId::generate(), ada(), future);
        seeded.rsvp = true;
        let raw = serde_json::to_string(&[seeded]).unwrap();
        let mut store = GuestStore::open(MemoryStore::with_entry(KEY, raw), KEY);

        let added = store.add(GuestDraft::new("Grace", "grace@example.com")).unwrap();
        assert!(added.date_added >= future);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let mut store = empty_store();
        store.add(ada()).unwrap();
        let before = store.snapshot();

        let missing = GuestId::from("missing");
        assert!(store.toggle_confirmed(&missing).is_none());
        assert!(store.toggle_rsvp(&missing).is_none());
        assert!(!store.remove(&missing));
        assert_eq!(&*store.snapshot(), &*before);
    }

    #[test]
    fn test_toggle_rsvp_twice_restores() {
        let mut store = empty_store();
        let id = store.add(ada()).unwrap().id;
        assert!(store.toggle_rsvp(&id).unwrap().rsvp);
        assert!(!store.toggle_rsvp(&id).unwrap().rsvp);
    }

    #[test]
    fn test_snapshot_survives_mutation() {
        let mut store = empty_store();
        let id = store.add(ada()).unwrap().id;
        let before = store.snapshot();

        store.toggle_confirmed(&id);
        store.add(GuestDraft::new("Grace", "grace@example.com")).unwrap();

        assert_eq!(before.len(), 1);
        assert!(!before[0].confirmed);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_merges_and_leaves_edit_mode() {
        let mut store = empty_store();
        let original = store.add(ada()).unwrap();
        store.toggle_rsvp(&original.id);
        assert!(store.set_editing(&original.id, true));
        assert!(store.is_editing(&original.id));

        let patch = GuestDraft::new("Ada King", "ada@analytical.org").with_notes("Vegetarian");
        let updated = store.update(&original.id, patch).unwrap().unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.date_added, original.date_added);
        assert_eq!(updated.name, "Ada King");
        assert_eq!(updated.notes.as_deref(), Some("Vegetarian"));
        assert!(updated.rsvp);
        assert!(!store.is_editing(&original.id));
    }

    #[test]
    fn test_update_invalid_leaves_guest_unchanged() {
        let mut store = empty_store();
        let original = store.add(ada().with_phone("555-0100")).unwrap();
        store.set_editing(&original.id, true);

        let patch = GuestDraft::new("  ", "ada.example.com");
        let expected = validation::validate(&patch);
        let err = store.update(&original.id, patch).unwrap_err();

        assert_eq!(err.validation_errors(), Some(&expected));
        assert_eq!(store.get(&original.id), Some(&original));
        assert!(store.is_editing(&original.id));
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = empty_store();
        let result = store.update(&GuestId::from("missing"), ada()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_cancel_edit() {
        let mut store = empty_store();
        let id = store.add(ada()).unwrap().id;
        store.set_editing(&id, true);
        assert!(store.cancel_edit(&id));
        assert!(!store.is_editing(&id));
        assert!(!store.set_editing(&GuestId::from("missing"), true));
    }

    #[test]
    fn test_clear() {
        let mut store = empty_store();
        store.add(ada()).unwrap();
        store.add(GuestDraft::new("Grace", "grace@example.com")).unwrap();
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.clear(), 0);
    }

    #[test]
    fn test_two_step_removal() {
        let mut store = empty_store();
        let id = store.add(ada()).unwrap().id;

        assert!(store.request_removal(&id));
        assert_eq!(store.pending(), Some(&PendingAction::Remove(id.clone())));
        assert_eq!(store.len(), 1);

        assert!(store.confirm_removal(&id).unwrap());
        assert!(store.is_empty());
        assert!(store.pending().is_none());
    }

    #[test]
    fn test_cancelled_removal_keeps_guest() {
        let mut store = empty_store();
        let id = store.add(ada()).unwrap().id;

        store.request_removal(&id);
        assert!(store.cancel_removal());
        assert!(!store.cancel_removal());
        assert_eq!(store.len(), 1);

        let err = store.confirm_removal(&id).unwrap_err();
        assert!(matches!(err, Error::NoPendingConfirmation { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_confirm_removal_of_other_guest_fails() {
        let mut store = empty_store();
        let a = store.add(ada()).unwrap().id;
        let b = store.add(GuestDraft::new("Grace", "grace@example.com")).unwrap().id;

        store.request_removal(&a);
        assert!(store.confirm_removal(&b).is_err());
        assert_eq!(store.len(), 2);
        assert!(!store.request_removal(&GuestId::from("missing")));
    }

    #[test]
    fn test_two_step_clear() {
        let mut store = empty_store();
        store.add(ada()).unwrap();

        assert!(store.confirm_clear().is_err());
        store.request_clear();
        assert!(store.cancel_clear());
        assert_eq!(store.len(), 1);

        store.request_clear();
        assert_eq!(store.confirm_clear().unwrap(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_resolve_prefix() {
        let mut store = empty_store();
        let id = store.add(ada()).unwrap().id;

        assert_eq!(store.resolve(id.as_str()).unwrap(), id);
        assert_eq!(store.resolve(id.short()).unwrap(), id);
        assert!(matches!(
            store.resolve("zzzz"),
            Err(Error::UnknownGuest { .. })
        ));
        assert!(store.resolve("").is_err());
    }

    #[test]
    fn test_resolve_ambiguous_prefix() {
        let guests: Vec<Guest> = ["abc1", "abc2"]
            .iter()
            .map(|id| Guest::from_draft(GuestId::from(*id), ada(), Utc::now()))
            .collect();
        let raw = serde_json::to_string(&guests).unwrap();
        let store = GuestStore::open(MemoryStore::with_entry(KEY, raw), KEY);

        assert!(matches!(
            store.resolve("abc"),
            Err(Error::AmbiguousGuest { matches: 2, .. })
        ));
        assert_eq!(store.resolve("abc2").unwrap(), GuestId::from("abc2"));
    }

    #[test]
    fn test_mutations_are_persisted() {
        let mut store = empty_store();
        let id = store.add(ada()).unwrap().id;
        store.toggle_confirmed(&id);
        store.set_editing(&id, true);

        let reopened = GuestStore::open(store.into_backend(), KEY);
        assert_eq!(reopened.len(), 1);
        assert!(reopened.get(&id).unwrap().confirmed);
        assert!(!reopened.is_editing(&id));
    }

    #[test]
    fn test_edit_mode_is_not_persisted() {
        let mut store = empty_store();
        let id = store.add(ada()).unwrap().id;
        store.set_editing(&id, true);

        let raw = store.backend().get(KEY).unwrap().unwrap();
        assert!(!raw.contains("isEditing"));
    }

    #[test]
    fn test_write_failure_does_not_fail_mutation() {
        let mut store = GuestStore::open(BrokenStore, KEY);
        let guest = store.add(ada()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.toggle_confirmed(&guest.id).is_some());
    }

    #[test]
    fn test_visible_and_summary_use_current_list() {
        let mut store = empty_store();
        let bob = store.add(GuestDraft::new("Bob", "robert@x.com")).unwrap().id;
        store.add(GuestDraft::new("Alice", "bobby@x.com")).unwrap();
        store.add(GuestDraft::new("Carol", "carol@y.org")).unwrap();
        store.toggle_confirmed(&bob);

        assert_eq!(store.visible("BOB", FilterMode::All).len(), 2);
        assert_eq!(store.visible("", FilterMode::Confirmed).len(), 1);

        let summary = store.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.confirmed, 1);
        assert_eq!(summary.confirmed_percent, 33);
        assert_eq!(summary.recent.len(), 3);
    }
}
