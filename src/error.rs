//! Error and result types shared by the console core.
//!
//! Everything here is local and recoverable: validation failures and empty
//! selections are surfaced to the user and leave the stores untouched. Seed
//! and I/O errors only occur at start-up or when reading config files.

use thiserror::Error;

use crate::model::{EntityId, EntityKind};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("required field(s) missing: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("no {} selected for deletion", .kind.plural())]
    EmptySelection { kind: EntityKind },

    #[error("duplicate {kind} id {id} in seed data")]
    DuplicateId { kind: EntityKind, id: EntityId },

    #[error("{kind} id {id} in seed data leaves no room for new ids")]
    SeedIdTooLarge { kind: EntityKind, id: EntityId },

    #[error("no {kind} ids left to assign")]
    IdsExhausted { kind: EntityKind },

    #[error("seed data: {0}")]
    Seed(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// True for failures the user can fix by editing the form.
    pub fn is_validation(&self) -> bool {
        matches!(self, ConsoleError::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
