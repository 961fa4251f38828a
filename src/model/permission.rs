use serde::{Deserialize, Serialize};

use super::{Column, Entity, EntityId, EntityKind, SortValue};
use crate::form::{FieldKind, FieldSpec, FormDraft};
use crate::validate::{Field, Fields, RequiredFields};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: EntityId,
    #[serde(alias = "permission")]
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionDraft {
    pub name: String,
    pub description: String,
}

impl PermissionDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into() }
    }
}

impl Fields for PermissionDraft {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            _ => None,
        }
    }
}

impl FormDraft for PermissionDraft {
    const LAYOUT: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Permission Name", FieldKind::Text),
        FieldSpec::new("description", "Description", FieldKind::Text),
    ];

    fn text_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "name" => Some(&mut self.name),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PermissionColumn {
    Id,
    Name,
    Description,
}

impl Column for PermissionColumn {
    fn label(self) -> &'static str {
        match self {
            PermissionColumn::Id => "ID",
            PermissionColumn::Name => "Permission",
            PermissionColumn::Description => "Description",
        }
    }
}

impl Entity for Permission {
    type Draft = PermissionDraft;
    type Column = PermissionColumn;

    const KIND: EntityKind = EntityKind::Permission;
    const REQUIRED: RequiredFields = RequiredFields::new(&[
        Field::new("name", "Permission Name"),
        Field::new("description", "Description"),
    ]);
    const COLUMNS: &'static [PermissionColumn] = &[
        PermissionColumn::Id,
        PermissionColumn::Name,
        PermissionColumn::Description,
    ];
    const ID_COLUMN: PermissionColumn = PermissionColumn::Id;

    fn id(&self) -> EntityId {
        self.id
    }

    fn build(id: EntityId, draft: PermissionDraft) -> Self {
        Self { id, name: draft.name, description: draft.description }
    }

    fn replaced(&self, draft: PermissionDraft) -> Self {
        Self::build(self.id, draft)
    }

    fn draft(&self) -> PermissionDraft {
        PermissionDraft::new(self.name.clone(), self.description.clone())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn category(&self) -> &str {
        &self.name
    }

    fn sort_value(&self, column: PermissionColumn) -> Option<SortValue<'_>> {
        Some(match column {
            PermissionColumn::Id => SortValue::Number(self.id),
            PermissionColumn::Name => SortValue::Text(&self.name),
            PermissionColumn::Description => SortValue::Text(&self.description),
        })
    }

    fn cell(&self, column: PermissionColumn) -> String {
        match column {
            PermissionColumn::Id => self.id.to_string(),
            PermissionColumn::Name => self.name.clone(),
            PermissionColumn::Description => self.description.clone(),
        }
    }
}
