//! In-memory diagram: tables, relationships and the rules that keep them
//! consistent.

use std::collections::HashSet;

use crate::codegen;
use crate::config::EditorConfig;
use crate::model::{
    Constraint, Field, FieldType, Position, Relationship, RelationshipDraft, RelationshipId, Table,
    TableId,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Table name is required")]
    EmptyTableName,
    #[error("All fields must have names")]
    EmptyFieldName,
    #[error("Field names must be unique: {0}")]
    DuplicateField(String),
    #[error("At least one field must be a primary key")]
    NoPrimaryKey,
    #[error("Unknown table: {0}")]
    UnknownTable(TableId),
    #[error("Unknown relationship: {0}")]
    UnknownRelationship(RelationshipId),
    #[error("Source and target tables cannot be the same")]
    SelfReference,
    #[error("This relationship already exists ({from} -> {to})")]
    DuplicateRelationship { from: TableId, to: TableId },
}

#[derive(Debug, Clone, Default)]
pub struct Diagram {
    config: EditorConfig,
    tables: Vec<Table>,
    relationships: Vec<Relationship>,
    next_id: u32,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Field list a new table starts from.
    pub fn default_fields() -> Vec<Field> {
        vec![
            Field::new("id", FieldType::Long)
                .primary()
                .with_constraint(Constraint::NotNull),
        ]
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    /// Relationships that have `id` as source or target.
    pub fn relationships_of(&self, id: TableId) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(move |r| r.source == id || r.target == id)
    }

    pub fn add_table(
        &mut self,
        name: impl Into<String>,
        fields: Vec<Field>,
    ) -> Result<&Table, ValidationError> {
        let name = name.into();
        validate_table(&name, &fields)?;

        let id = TableId(self.allocate_id());
        tracing::debug!(%id, name = %name, fields = fields.len(), "table added");
        self.tables.push(Table {
            id,
            name,
            fields,
            position: self.config.default_position,
        });
        Ok(&self.tables[self.tables.len() - 1])
    }

    /// Replace name and fields of an existing table. Id and position are kept.
    pub fn update_table(
        &mut self,
        id: TableId,
        name: impl Into<String>,
        fields: Vec<Field>,
    ) -> Result<&Table, ValidationError> {
        let name = name.into();
        let index = self
            .tables
            .iter()
            .position(|t| t.id == id)
            .ok_or(ValidationError::UnknownTable(id))?;
        validate_table(&name, &fields)?;

        tracing::debug!(%id, name = %name, fields = fields.len(), "table updated");
        let table = &mut self.tables[index];
        table.name = name;
        table.fields = fields;
        Ok(&self.tables[index])
    }

    /// Remove a table and every relationship touching it.
    ///
    /// Unknown ids are a no-op and yield `None`.
    pub fn delete_table(&mut self, id: TableId) -> Option<Table> {
        let index = self.tables.iter().position(|t| t.id == id)?;
        let table = self.tables.remove(index);

        let before = self.relationships.len();
        self.relationships.retain(|r| r.source != id && r.target != id);
        tracing::debug!(
            %id,
            cascaded = before - self.relationships.len(),
            "table deleted"
        );
        Some(table)
    }

    /// Move a table on the canvas. Returns `false` for an unknown id.
    pub fn move_table(&mut self, id: TableId, position: Position) -> bool {
        match self.tables.iter_mut().find(|t| t.id == id) {
            Some(table) => {
                table.position = position;
                true
            }
            None => false,
        }
    }

    pub fn add_relationship(
        &mut self,
        draft: RelationshipDraft,
    ) -> Result<&Relationship, ValidationError> {
        self.validate_relationship(&draft, None)?;

        let id = RelationshipId(self.allocate_id());
        tracing::debug!(
            %id,
            source = %draft.source,
            target = %draft.target,
            kind = %draft.kind,
            "relationship added"
        );
        self.relationships.push(Relationship {
            id,
            source: draft.source,
            source_field: draft.source_field,
            target: draft.target,
            target_field: draft.target_field,
            kind: draft.kind,
        });
        Ok(&self.relationships[self.relationships.len() - 1])
    }

    pub fn update_relationship(
        &mut self,
        id: RelationshipId,
        draft: RelationshipDraft,
    ) -> Result<&Relationship, ValidationError> {
        let index = self
            .relationships
            .iter()
            .position(|r| r.id == id)
            .ok_or(ValidationError::UnknownRelationship(id))?;
        self.validate_relationship(&draft, Some(id))?;

        tracing::debug!(%id, kind = %draft.kind, "relationship updated");
        self.relationships[index] = Relationship {
            id,
            source: draft.source,
            source_field: draft.source_field,
            target: draft.target,
            target_field: draft.target_field,
            kind: draft.kind,
        };
        Ok(&self.relationships[index])
    }

    /// Unknown ids are a no-op and yield `None`.
    pub fn delete_relationship(&mut self, id: RelationshipId) -> Option<Relationship> {
        let index = self.relationships.iter().position(|r| r.id == id)?;
        tracing::debug!(%id, "relationship deleted");
        Some(self.relationships.remove(index))
    }

    pub fn generate_entities(&self) -> String {
        codegen::generate_entities(&self.tables, &self.relationships)
    }

    pub fn generate_repositories(&self) -> String {
        codegen::generate_repositories(&self.tables)
    }

    fn allocate_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn validate_relationship(
        &self,
        draft: &RelationshipDraft,
        editing: Option<RelationshipId>,
    ) -> Result<(), ValidationError> {
        if self.table(draft.source).is_none() {
            return Err(ValidationError::UnknownTable(draft.source));
        }
        if self.table(draft.target).is_none() {
            return Err(ValidationError::UnknownTable(draft.target));
        }
        if draft.source == draft.target {
            return Err(ValidationError::SelfReference);
        }

        let duplicate = self.relationships.iter().any(|r| {
            r.source == draft.source && r.target == draft.target && Some(r.id) != editing
        });
        if duplicate {
            return Err(ValidationError::DuplicateRelationship {
                from: draft.source,
                to: draft.target,
            });
        }
        Ok(())
    }
}

fn validate_table(name: &str, fields: &[Field]) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyTableName);
    }

    let mut seen = HashSet::new();
    for field in fields {
        if field.name.trim().is_empty() {
            return Err(ValidationError::EmptyFieldName);
        }
        if !seen.insert(field.name.as_str()) {
            return Err(ValidationError::DuplicateField(field.name.clone()));
        }
    }

    if !fields.iter().any(|f| f.is_primary) {
        return Err(ValidationError::NoPrimaryKey);
    }
    Ok(())
}
