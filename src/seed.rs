//! Seed dataset: the built-in JSON shipped with the binary, or a file given
//! with `--seed`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{ConsoleError, Result};
use crate::model::{Entity, EntityId, Permission, Role, User};

const BUILTIN: &str = include_str!("../data/seed.json");

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

impl SeedData {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let seed = Self::from_json(&text)?;
        info!(
            path = %path.display(),
            users = seed.users.len(),
            roles = seed.roles.len(),
            permissions = seed.permissions.len(),
            "seed loaded"
        );
        Ok(seed)
    }

    /// Parse and reject duplicate ids within a collection.
    pub fn from_json(text: &str) -> Result<Self> {
        let seed: SeedData = serde_json::from_str(text)?;
        unique_ids(&seed.users)?;
        unique_ids(&seed.roles)?;
        unique_ids(&seed.permissions)?;
        Ok(seed)
    }

    /// `--seed` when given, the built-in dataset otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }
}

fn unique_ids<T: Entity>(items: &[T]) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            return Err(ConsoleError::DuplicateId { kind: T::KIND, id: item.id() });
        }
        if item.id() == EntityId::MAX {
            return Err(ConsoleError::SeedIdTooLarge { kind: T::KIND, id: item.id() });
        }
    }
    Ok(())
}
