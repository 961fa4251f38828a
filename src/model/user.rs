use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Column, Entity, EntityId, EntityKind, SortValue};
use crate::form::{FieldKind, FieldSpec, FormDraft};
use crate::validate::{Field, Fields, RequiredFields};

/// Role labels offered by the user form.
pub const USER_ROLES: &[&str] = &["Admin", "Manager", "HR"];

const STATUSES: &[&str] = &["Active", "Inactive"];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(UserStatus::Active),
            "Inactive" => Some(UserStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: UserStatus,
    #[serde(default = "Utc::now", alias = "createdAt")]
    pub created: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: UserStatus,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: USER_ROLES[0].to_string(),
            status: UserStatus::Active,
        }
    }
}

impl Fields for UserDraft {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "role" => Some(&self.role),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl FormDraft for UserDraft {
    const LAYOUT: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name", FieldKind::Text),
        FieldSpec::new("email", "Email", FieldKind::Text),
        FieldSpec::new("role", "Role", FieldKind::Choice(USER_ROLES)),
        FieldSpec::new("status", "Status", FieldKind::Choice(STATUSES)),
    ];

    fn text_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "name" => Some(&mut self.name),
            "email" => Some(&mut self.email),
            _ => None,
        }
    }

    fn set_choice(&mut self, key: &str, value: &'static str) {
        match key {
            "role" => self.role = value.to_string(),
            "status" => {
                if let Some(status) = UserStatus::parse(value) {
                    self.status = status;
                }
            }
            _ => {}
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UserColumn {
    Id,
    Name,
    Email,
    Role,
    Status,
    Created,
}

impl Column for UserColumn {
    fn label(self) -> &'static str {
        match self {
            UserColumn::Id => "ID",
            UserColumn::Name => "Name",
            UserColumn::Email => "Email",
            UserColumn::Role => "Role",
            UserColumn::Status => "Status",
            UserColumn::Created => "Created",
        }
    }
}

impl Entity for User {
    type Draft = UserDraft;
    type Column = UserColumn;

    const KIND: EntityKind = EntityKind::User;
    const REQUIRED: RequiredFields =
        RequiredFields::new(&[Field::new("name", "Name"), Field::new("email", "Email")]);
    const COLUMNS: &'static [UserColumn] = &[
        UserColumn::Id,
        UserColumn::Name,
        UserColumn::Email,
        UserColumn::Role,
        UserColumn::Status,
        UserColumn::Created,
    ];
    const ID_COLUMN: UserColumn = UserColumn::Id;

    fn id(&self) -> EntityId {
        self.id
    }

    fn build(id: EntityId, draft: UserDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            role: draft.role,
            status: draft.status,
            created: Utc::now(),
        }
    }

    fn replaced(&self, draft: UserDraft) -> Self {
        Self {
            id: self.id,
            name: draft.name,
            email: draft.email,
            role: draft.role,
            status: draft.status,
            created: self.created,
        }
    }

    fn draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            status: self.status,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn category(&self) -> &str {
        &self.role
    }

    fn sort_value(&self, column: UserColumn) -> Option<SortValue<'_>> {
        Some(match column {
            UserColumn::Id => SortValue::Number(self.id),
            UserColumn::Name => SortValue::Text(&self.name),
            UserColumn::Email => SortValue::Text(&self.email),
            UserColumn::Role => SortValue::Text(&self.role),
            UserColumn::Status => SortValue::Text(self.status.as_str()),
            UserColumn::Created => SortValue::Time(self.created),
        })
    }

    fn cell(&self, column: UserColumn) -> String {
        match column {
            UserColumn::Id => self.id.to_string(),
            UserColumn::Name => self.name.clone(),
            UserColumn::Email => self.email.clone(),
            UserColumn::Role => self.role.clone(),
            UserColumn::Status => self.status.as_str().to_string(),
            UserColumn::Created => self.created.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}
