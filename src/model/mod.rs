//! Entity types managed by the console and the trait that lets one list
//! pipeline serve all three screens.
//!
//! Each entity declares:
//! - which text fields the search box looks at, and which field the filter
//!   menu matches on
//! - its table columns and how each column sorts
//! - its draft (form payload) and the fields a draft must fill in
//!
mod permission;
mod role;
mod user;

use std::fmt;

pub use permission::{Permission, PermissionColumn, PermissionDraft};
pub use role::{PermissionKey, PermissionSet, Role, RoleColumn, RoleDraft};
pub use user::{USER_ROLES, User, UserColumn, UserDraft, UserStatus};

use crate::form::FormDraft;
use crate::validate::RequiredFields;

/// Identifier shared by every entity type. Assigned by the owning store.
pub type EntityId = u64;

/// Which collection an entity belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Role,
    Permission,
}

impl EntityKind {
    /// Lowercase singular, used inside sentences.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Role => "role",
            EntityKind::Permission => "permission",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Role => "roles",
            EntityKind::Permission => "permissions",
        }
    }

    /// Capitalized singular, used at the start of notifications and titles.
    pub fn title(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Role => "Role",
            EntityKind::Permission => "Permission",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparable value of one column. Every row of a column yields the same variant.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Number(u64),
    Text(&'a str),
    Time(chrono::DateTime<chrono::Utc>),
}

/// A table column of some entity.
pub trait Column: Copy + Eq + fmt::Debug + 'static {
    /// Header text.
    fn label(self) -> &'static str;

    fn sortable(self) -> bool {
        true
    }
}

/// A record managed by one of the console screens.
pub trait Entity: Clone + fmt::Debug {
    /// Plain data collected by the modal form for this entity.
    type Draft: FormDraft;
    type Column: Column;

    const KIND: EntityKind;
    /// Fields a draft must fill in before it may be added or saved.
    const REQUIRED: RequiredFields;
    /// Columns in display order.
    const COLUMNS: &'static [Self::Column];
    /// Column used for the initial ascending sort.
    const ID_COLUMN: Self::Column;

    fn id(&self) -> EntityId;

    /// Create a new entity from a validated draft.
    fn build(id: EntityId, draft: Self::Draft) -> Self;

    /// Same entity with all mutable fields replaced by `draft`.
    fn replaced(&self, draft: Self::Draft) -> Self;

    /// Current mutable fields, used to prefill the edit form.
    fn draft(&self) -> Self::Draft;

    /// Fields the search box matches against.
    fn search_fields(&self) -> Vec<&str>;

    /// Categorical field the filter menu matches against.
    fn category(&self) -> &str;

    /// `None` for columns that cannot be sorted.
    fn sort_value(&self, column: Self::Column) -> Option<SortValue<'_>>;

    fn cell(&self, column: Self::Column) -> String;
}
