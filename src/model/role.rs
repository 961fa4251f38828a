use serde::{Deserialize, Serialize};

use super::{Column, Entity, EntityId, EntityKind, SortValue};
use crate::form::{FieldKind, FieldSpec, FormDraft};
use crate::validate::{Field, Fields, RequiredFields};

/// The fixed set of capabilities a role can grant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PermissionKey {
    Read,
    Write,
    Delete,
    ManageRoles,
    ViewAnalytics,
}

impl PermissionKey {
    pub const ALL: [PermissionKey; 5] = [
        PermissionKey::Read,
        PermissionKey::Write,
        PermissionKey::Delete,
        PermissionKey::ManageRoles,
        PermissionKey::ViewAnalytics,
    ];

    /// Key as it appears in seed data.
    pub fn key(self) -> &'static str {
        match self {
            PermissionKey::Read => "read",
            PermissionKey::Write => "write",
            PermissionKey::Delete => "delete",
            PermissionKey::ManageRoles => "manageRoles",
            PermissionKey::ViewAnalytics => "viewAnalytics",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PermissionKey::Read => "Read",
            PermissionKey::Write => "Write",
            PermissionKey::Delete => "Delete",
            PermissionKey::ManageRoles => "Manage Roles",
            PermissionKey::ViewAnalytics => "View Analytics",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionSet {
    pub read: bool,
    pub write: bool,
    pub delete: bool,
    pub manage_roles: bool,
    pub view_analytics: bool,
}

impl PermissionSet {
    pub fn get(&self, key: PermissionKey) -> bool {
        match key {
            PermissionKey::Read => self.read,
            PermissionKey::Write => self.write,
            PermissionKey::Delete => self.delete,
            PermissionKey::ManageRoles => self.manage_roles,
            PermissionKey::ViewAnalytics => self.view_analytics,
        }
    }

    pub fn toggle(&mut self, key: PermissionKey) {
        let slot = match key {
            PermissionKey::Read => &mut self.read,
            PermissionKey::Write => &mut self.write,
            PermissionKey::Delete => &mut self.delete,
            PermissionKey::ManageRoles => &mut self.manage_roles,
            PermissionKey::ViewAnalytics => &mut self.view_analytics,
        };
        *slot = !*slot;
    }

    pub fn granted(&self) -> Vec<PermissionKey> {
        PermissionKey::ALL.into_iter().filter(|k| self.get(*k)).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: EntityId,
    #[serde(rename = "rolename", alias = "name")]
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub permissions: PermissionSet,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleDraft {
    pub name: String,
    pub description: String,
    pub permissions: PermissionSet,
}

impl Fields for RoleDraft {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "rolename" => Some(&self.name),
            "description" => Some(&self.description),
            _ => None,
        }
    }
}

impl FormDraft for RoleDraft {
    const LAYOUT: &'static [FieldSpec] = &[
        FieldSpec::new("rolename", "Role Name", FieldKind::Text),
        FieldSpec::new("description", "Description", FieldKind::Text),
        FieldSpec::new("read", "Read", FieldKind::Flag),
        FieldSpec::new("write", "Write", FieldKind::Flag),
        FieldSpec::new("delete", "Delete", FieldKind::Flag),
        FieldSpec::new("manageRoles", "Manage Roles", FieldKind::Flag),
        FieldSpec::new("viewAnalytics", "View Analytics", FieldKind::Flag),
    ];

    fn text_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "rolename" => Some(&mut self.name),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }

    fn flag(&self, key: &str) -> Option<bool> {
        PermissionKey::from_key(key).map(|k| self.permissions.get(k))
    }

    fn toggle_flag(&mut self, key: &str) {
        if let Some(k) = PermissionKey::from_key(key) {
            self.permissions.toggle(k);
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoleColumn {
    Id,
    Name,
    Description,
    Permissions,
}

impl Column for RoleColumn {
    fn label(self) -> &'static str {
        match self {
            RoleColumn::Id => "ID",
            RoleColumn::Name => "Role",
            RoleColumn::Description => "Description",
            RoleColumn::Permissions => "Permissions",
        }
    }

    fn sortable(self) -> bool {
        !matches!(self, RoleColumn::Permissions)
    }
}

impl Entity for Role {
    type Draft = RoleDraft;
    type Column = RoleColumn;

    const KIND: EntityKind = EntityKind::Role;
    const REQUIRED: RequiredFields = RequiredFields::new(&[
        Field::new("rolename", "Role Name"),
        Field::new("description", "Description"),
    ]);
    const COLUMNS: &'static [RoleColumn] = &[
        RoleColumn::Id,
        RoleColumn::Name,
        RoleColumn::Description,
        RoleColumn::Permissions,
    ];
    const ID_COLUMN: RoleColumn = RoleColumn::Id;

    fn id(&self) -> EntityId {
        self.id
    }

    fn build(id: EntityId, draft: RoleDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            permissions: draft.permissions,
        }
    }

    fn replaced(&self, draft: RoleDraft) -> Self {
        Self::build(self.id, draft)
    }

    fn draft(&self) -> RoleDraft {
        RoleDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            permissions: self.permissions,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn category(&self) -> &str {
        &self.name
    }

    fn sort_value(&self, column: RoleColumn) -> Option<SortValue<'_>> {
        match column {
            RoleColumn::Id => Some(SortValue::Number(self.id)),
            RoleColumn::Name => Some(SortValue::Text(&self.name)),
            RoleColumn::Description => Some(SortValue::Text(&self.description)),
            RoleColumn::Permissions => None,
        }
    }

    fn cell(&self, column: RoleColumn) -> String {
        match column {
            RoleColumn::Id => self.id.to_string(),
            RoleColumn::Name => self.name.clone(),
            RoleColumn::Description => self.description.clone(),
            RoleColumn::Permissions => self
                .permissions
                .granted()
                .iter()
                .map(|k| k.label())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
