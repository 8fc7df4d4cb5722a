//! Diagram records shared by the editor and the code generator.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Java type of a field, emitted verbatim in declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldType {
    #[default]
    String,
    Long,
    Integer,
    Double,
    Float,
    Boolean,
    Date,
    LocalDate,
    LocalDateTime,
}

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        Self::String,
        Self::Long,
        Self::Integer,
        Self::Double,
        Self::Float,
        Self::Boolean,
        Self::Date,
        Self::LocalDate,
        Self::LocalDateTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Long => "Long",
            Self::Integer => "Integer",
            Self::Double => "Double",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::LocalDate => "LocalDate",
            Self::LocalDateTime => "LocalDateTime",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    NotNull,
    Unique,
}

/// `Field::default()` is the blank row added by the table editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: FieldType,
    pub is_primary: bool,
    /// Kept in insertion order; duplicates are collapsed by `with_constraint`.
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl Field {
    pub fn new(name: impl Into<String>, typ: FieldType) -> Self {
        Self {
            name: name.into(),
            typ,
            is_primary: false,
            constraints: Vec::new(),
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        if !self.constraints.contains(&constraint) {
            self.constraints.push(constraint);
        }
        self
    }

    pub fn has_constraint(&self, constraint: Constraint) -> bool {
        self.constraints.contains(&constraint)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub fields: Vec<Field>,
    pub position: Position,
}

/// Editable part of a table: everything but id and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDraft {
    pub name: String,
    pub fields: Vec<Field>,
}

impl From<&Table> for TableDraft {
    fn from(table: &Table) -> Self {
        Self {
            name: table.name.clone(),
            fields: table.fields.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cardinality {
    #[default]
    OneToMany,
    ManyToOne,
    OneToOne,
    ManyToMany,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToMany => "OneToMany",
            Self::ManyToOne => "ManyToOne",
            Self::OneToOne => "OneToOne",
            Self::ManyToMany => "ManyToMany",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: RelationshipId,
    pub source: TableId,
    pub source_field: String,
    pub target: TableId,
    pub target_field: String,
    #[serde(rename = "type")]
    pub kind: Cardinality,
}

/// Editable part of a relationship: everything but the id.
///
/// Field names are free text and are not checked against the referenced tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDraft {
    pub source: TableId,
    pub source_field: String,
    pub target: TableId,
    pub target_field: String,
    #[serde(rename = "type")]
    pub kind: Cardinality,
}

impl RelationshipDraft {
    pub fn new(
        source: TableId,
        source_field: impl Into<String>,
        target: TableId,
        target_field: impl Into<String>,
        kind: Cardinality,
    ) -> Self {
        Self {
            source,
            source_field: source_field.into(),
            target,
            target_field: target_field.into(),
            kind,
        }
    }
}

impl From<&Relationship> for RelationshipDraft {
    fn from(rel: &Relationship) -> Self {
        Self {
            source: rel.source,
            source_field: rel.source_field.clone(),
            target: rel.target,
            target_field: rel.target_field.clone(),
            kind: rel.kind,
        }
    }
}
