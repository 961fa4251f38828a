//! Declarative required-field validation shared by every form and handler.

use crate::error::{ConsoleError, Result};

/// Read access to the named text fields of a form payload.
pub trait Fields {
    fn field(&self, key: &str) -> Option<&str>;
}

/// One required field: the key used by [`Fields::field`] and the label shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
}

impl Field {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// A list of fields that must be non-empty.
#[derive(Clone, Copy, Debug)]
pub struct RequiredFields(&'static [Field]);

impl RequiredFields {
    pub const fn new(fields: &'static [Field]) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &'static [Field] {
        self.0
    }

    /// Labels of required fields that are absent, empty or whitespace-only.
    pub fn missing<F: Fields + ?Sized>(&self, source: &F) -> Vec<&'static str> {
        self.0
            .iter()
            .filter(|f| source.field(f.key).map(str::trim).unwrap_or("").is_empty())
            .map(|f| f.label)
            .collect()
    }

    pub fn check<F: Fields + ?Sized>(&self, source: &F) -> Result<()> {
        let missing = self.missing(source);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConsoleError::Validation { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Map(HashMap<&'static str, &'static str>);

    impl Fields for Map {
        fn field(&self, key: &str) -> Option<&str> {
            self.0.get(key).copied()
        }
    }

    const REQUIRED: RequiredFields =
        RequiredFields::new(&[Field::new("name", "Name"), Field::new("email", "Email")]);

    #[test]
    fn reports_every_missing_label_in_declaration_order() {
        let src = Map(HashMap::from([("name", "  ")]));
        assert_eq!(REQUIRED.missing(&src), vec!["Name", "Email"]);
        let err = REQUIRED.check(&src).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "required field(s) missing: Name, Email");
    }

    #[test]
    fn passes_when_all_fields_present() {
        let src = Map(HashMap::from([("name", "Ann"), ("email", "ann@example.com")]));
        assert!(REQUIRED.check(&src).is_ok());
    }
}
