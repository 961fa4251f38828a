//! Modal forms.
//!
//! A form owns a draft of one entity's editable fields and knows how to lay
//! them out, but never touches a store: on submit it validates locally and
//! hands the draft to the owning [`EntityScreen`].

use tracing::debug;

use crate::error::ConsoleError;
use crate::model::{Entity, EntityId};
use crate::notify::{Notifier, Severity};
use crate::screen::EntityScreen;
use crate::validate::Fields;

/// How a form field is edited.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Cycles through a fixed list of values.
    Choice(&'static [&'static str]),
    /// On/off.
    Flag,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind }
    }
}

/// Payload edited by a modal form.
pub trait FormDraft: Fields + Default + Clone + std::fmt::Debug {
    /// Fields in the order the form shows them.
    const LAYOUT: &'static [FieldSpec];

    fn text_mut(&mut self, key: &str) -> Option<&mut String>;

    fn flag(&self, _key: &str) -> Option<bool> {
        None
    }

    fn toggle_flag(&mut self, _key: &str) {}

    fn set_choice(&mut self, _key: &str, _value: &'static str) {}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntityId),
}

/// Result of pressing submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Payload accepted; the form should close.
    Closed,
    /// Stays open showing the message.
    Invalid(String),
}

#[derive(Clone, Debug)]
pub struct ModalForm<T: Entity> {
    pub mode: FormMode,
    pub draft: T::Draft,
    /// Index into [`FormDraft::LAYOUT`].
    pub focus: usize,
    pub error: Option<String>,
}

impl<T: Entity> ModalForm<T> {
    pub fn create() -> Self {
        Self { mode: FormMode::Create, draft: T::Draft::default(), focus: 0, error: None }
    }

    pub fn edit(entity: &T) -> Self {
        Self { mode: FormMode::Edit(entity.id()), draft: entity.draft(), focus: 0, error: None }
    }

    pub fn title(&self) -> String {
        match self.mode {
            FormMode::Create => format!("Add {}", T::KIND.title()),
            FormMode::Edit(id) => format!("Edit {} #{id}", T::KIND.title()),
        }
    }

    pub fn layout(&self) -> &'static [FieldSpec] {
        <T::Draft as FormDraft>::LAYOUT
    }

    pub fn focused(&self) -> Option<FieldSpec> {
        self.layout().get(self.focus).copied()
    }

    pub fn focus_next(&mut self) {
        let n = self.layout().len();
        if n > 0 {
            self.focus = (self.focus + 1) % n;
        }
    }

    pub fn focus_prev(&mut self) {
        let n = self.layout().len();
        if n > 0 {
            self.focus = (self.focus + n - 1) % n;
        }
    }

    /// Display value of a field: its text, current choice, or `[x]`/`[ ]`.
    pub fn value(&self, spec: &FieldSpec) -> String {
        match spec.kind {
            FieldKind::Flag => {
                let on = self.draft.flag(spec.key).unwrap_or(false);
                let mark = if on { "[x]" } else { "[ ]" };
                mark.to_string()
            }
            _ => self.draft.field(spec.key).unwrap_or("").to_string(),
        }
    }

    pub fn type_char(&mut self, c: char) {
        let Some(spec) = self.focused() else {
            return;
        };
        if let Some(text) = self.draft.text_mut(spec.key) {
            text.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        let Some(spec) = self.focused() else {
            return;
        };
        if let Some(text) = self.draft.text_mut(spec.key) {
            text.pop();
        }
    }

    /// Toggle a flag or advance a choice under the focus. Text fields ignore it.
    pub fn activate(&mut self) {
        let Some(spec) = self.focused() else {
            return;
        };
        match spec.kind {
            FieldKind::Flag => self.draft.toggle_flag(spec.key),
            FieldKind::Choice(options) if !options.is_empty() => {
                let current = self.draft.field(spec.key).unwrap_or("");
                let at = options.iter().position(|o| *o == current);
                let next = at.map_or(0, |i| (i + 1) % options.len());
                self.draft.set_choice(spec.key, options[next]);
            }
            _ => {}
        }
    }

    /// Validate and hand the draft to `screen`.
    ///
    /// On success the draft is cleared and the form reports [`SubmitOutcome::Closed`].
    /// An edit whose target vanished meanwhile also closes.
    pub fn submit(
        &mut self,
        screen: &mut EntityScreen<T>,
        notifier: &mut dyn Notifier,
    ) -> SubmitOutcome {
        if let Err(err) = T::REQUIRED.check(&self.draft) {
            let msg = err.to_string();
            notifier.notify(&msg, Severity::Warning);
            self.error = Some(msg.clone());
            return SubmitOutcome::Invalid(msg);
        }
        let draft = std::mem::take(&mut self.draft);
        let result = match self.mode {
            FormMode::Create => screen.add(draft, notifier).map(|_| ()),
            FormMode::Edit(id) => match screen.store().get(id) {
                Some(current) => {
                    let updated = current.replaced(draft);
                    screen.edit(updated, notifier).map(|_| ())
                }
                None => {
                    debug!(kind = %T::KIND, id, "edit target gone, closing form");
                    Ok(())
                }
            },
        };
        match result {
            Ok(()) => {
                self.error = None;
                SubmitOutcome::Closed
            }
            Err(err) => self.reject(err),
        }
    }

    fn reject(&mut self, err: ConsoleError) -> SubmitOutcome {
        let msg = err.to_string();
        self.error = Some(msg.clone());
        SubmitOutcome::Invalid(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, User, UserStatus};
    use crate::notify::PreparedNotifier;

    #[test]
    fn user_form_defaults_and_choice_cycling() {
        let mut form = ModalForm::<User>::create();
        assert_eq!(form.draft.role, "Admin");
        assert_eq!(form.draft.status, UserStatus::Active);
        form.focus = 2;
        form.activate();
        assert_eq!(form.draft.role, "Manager");
        form.activate();
        form.activate();
        assert_eq!(form.draft.role, "Admin");
        form.focus_next();
        form.activate();
        assert_eq!(form.draft.status, UserStatus::Inactive);
    }

    #[test]
    fn invalid_submit_stays_open_with_message() {
        let mut screen = EntityScreen::<Role>::new(Vec::new());
        let mut form = ModalForm::<Role>::create();
        for c in "Auditor".chars() {
            form.type_char(c);
        }
        let mut n = PreparedNotifier::default();
        let outcome = form.submit(&mut screen, &mut n);
        assert_eq!(
            outcome,
            SubmitOutcome::Invalid("required field(s) missing: Description".into())
        );
        assert_eq!(form.draft.name, "Auditor");
        assert!(form.error.is_some());
        assert!(screen.store().is_empty());
    }

    #[test]
    fn valid_submit_adds_and_clears_draft() {
        let mut screen = EntityScreen::<Role>::new(Vec::new());
        let mut form = ModalForm::<Role>::create();
        form.draft.name = "Auditor".into();
        form.draft.description = "Reads logs".into();
        form.focus = 2;
        form.activate();
        let mut n = PreparedNotifier::default();
        assert_eq!(form.submit(&mut screen, &mut n), SubmitOutcome::Closed);
        assert!(form.draft.name.is_empty());
        let role = screen.store().get(1).unwrap();
        assert!(role.permissions.read);
    }
}
