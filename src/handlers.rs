//! Mutation handlers: add, edit, delete and bulk delete against an
//! [`EntityStore`], reporting to the user through a [`Notifier`].
//!
//! Failures are local. A validation error or an empty selection leaves the
//! store untouched; a stale id on edit or delete is a silent no-op.

use tracing::{debug, info, warn};

use crate::error::{ConsoleError, Result};
use crate::model::{Entity, EntityId, EntityKind};
use crate::notify::{ConfirmRequest, Notifier, Severity};
use crate::selection::Selection;
use crate::store::EntityStore;

/// Dialog shown before deleting one entity.
pub fn delete_request(kind: EntityKind, id: EntityId) -> ConfirmRequest {
    ConfirmRequest {
        title: "Are you sure?".to_string(),
        message: format!("This will delete the {kind} with ID {id}. This action cannot be undone."),
        severity: Severity::Warning,
        confirm_label: "Yes, delete it!".to_string(),
        cancel_label: "Cancel".to_string(),
    }
}

/// Dialog shown before deleting a selection.
pub fn bulk_delete_request(kind: EntityKind, count: usize) -> ConfirmRequest {
    ConfirmRequest {
        title: "Are you sure?".to_string(),
        message: format!(
            "You are about to delete {count} {kind}(s). This action cannot be undone."
        ),
        severity: Severity::Warning,
        confirm_label: "Yes, delete them!".to_string(),
        cancel_label: "Cancel".to_string(),
    }
}

fn warn_invalid<T: Entity>(err: &ConsoleError, notifier: &mut dyn Notifier) {
    warn!(kind = %T::KIND, %err, "rejected");
    notifier.notify(&err.to_string(), Severity::Warning);
}

/// Validate `draft`, store it under a new id and return that id.
pub fn add<T: Entity>(
    store: &mut EntityStore<T>,
    draft: T::Draft,
    notifier: &mut dyn Notifier,
) -> Result<EntityId> {
    if let Err(err) = T::REQUIRED.check(&draft) {
        warn_invalid::<T>(&err, notifier);
        return Err(err);
    }
    let id = match store.insert(draft) {
        Ok(id) => id,
        Err(err) => {
            notifier.notify(&err.to_string(), Severity::Error);
            return Err(err);
        }
    };
    info!(kind = %T::KIND, id, "added");
    notifier.notify(&format!("{} added successfully!", T::KIND.title()), Severity::Success);
    Ok(id)
}

/// Replace the stored entity with the same id. `Ok(false)` when the id is unknown.
pub fn edit<T: Entity>(
    store: &mut EntityStore<T>,
    entity: T,
    notifier: &mut dyn Notifier,
) -> Result<bool> {
    if let Err(err) = T::REQUIRED.check(&entity.draft()) {
        warn_invalid::<T>(&err, notifier);
        return Err(err);
    }
    let id = entity.id();
    if !store.replace(entity) {
        debug!(kind = %T::KIND, id, "edit of unknown id ignored");
        return Ok(false);
    }
    info!(kind = %T::KIND, id, "updated");
    notifier.notify(&format!("{} updated successfully!", T::KIND.title()), Severity::Success);
    Ok(true)
}

/// Ask for confirmation, then remove `id`. Returns true if something was removed.
pub fn delete<T: Entity>(
    store: &mut EntityStore<T>,
    selection: &mut Selection,
    id: EntityId,
    notifier: &mut dyn Notifier,
) -> bool {
    if !notifier.confirm(&delete_request(T::KIND, id)) {
        debug!(kind = %T::KIND, id, "delete cancelled");
        return false;
    }
    if store.remove(id).is_none() {
        debug!(kind = %T::KIND, id, "delete of unknown id ignored");
        return false;
    }
    selection.remove(id);
    info!(kind = %T::KIND, id, "deleted");
    notifier.notify(
        &format!("{} with ID {id} deleted successfully", T::KIND.title()),
        Severity::Success,
    );
    true
}

/// Remove every selected entity after one confirmation.
///
/// An empty selection is reported as an error without asking. A cancelled
/// prompt returns `Ok(0)` and keeps the selection.
pub fn bulk_delete<T: Entity>(
    store: &mut EntityStore<T>,
    selection: &mut Selection,
    notifier: &mut dyn Notifier,
) -> Result<usize> {
    if selection.is_empty() {
        let err = ConsoleError::EmptySelection { kind: T::KIND };
        notifier.notify(&err.to_string(), Severity::Error);
        return Err(err);
    }
    if !notifier.confirm(&bulk_delete_request(T::KIND, selection.len())) {
        debug!(kind = %T::KIND, selected = selection.len(), "bulk delete cancelled");
        return Ok(0);
    }
    let removed = store.remove_many(selection.ids());
    selection.clear();
    info!(kind = %T::KIND, removed, "bulk deleted");
    notifier.notify(
        &format!("{removed} {}(s) deleted successfully", T::KIND),
        Severity::Success,
    );
    Ok(removed)
}
