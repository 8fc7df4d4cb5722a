//! Diagram shared between threads.
//!
//! Mutations hold the write lock for their whole validate-then-apply step, so
//! generation always sees a consistent snapshot.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::diagram::{Diagram, ValidationError};
use crate::model::{
    Field, Position, Relationship, RelationshipDraft, RelationshipId, Table, TableId,
};

#[derive(Debug, Clone, Default)]
pub struct SharedDiagram {
    inner: Arc<RwLock<Diagram>>,
}

impl SharedDiagram {
    pub fn new(diagram: Diagram) -> Self {
        Self {
            inner: Arc::new(RwLock::new(diagram)),
        }
    }

    // Validation happens before any collection is touched, so a poisoned lock
    // still guards a consistent diagram.
    fn read(&self) -> RwLockReadGuard<'_, Diagram> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Diagram> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_table(
        &self,
        name: impl Into<String>,
        fields: Vec<Field>,
    ) -> Result<Table, ValidationError> {
        self.write().add_table(name, fields).cloned()
    }

    pub fn update_table(
        &self,
        id: TableId,
        name: impl Into<String>,
        fields: Vec<Field>,
    ) -> Result<Table, ValidationError> {
        self.write().update_table(id, name, fields).cloned()
    }

    pub fn delete_table(&self, id: TableId) -> Option<Table> {
        self.write().delete_table(id)
    }

    pub fn move_table(&self, id: TableId, position: Position) -> bool {
        self.write().move_table(id, position)
    }

    pub fn add_relationship(
        &self,
        draft: RelationshipDraft,
    ) -> Result<Relationship, ValidationError> {
        self.write().add_relationship(draft).cloned()
    }

    pub fn update_relationship(
        &self,
        id: RelationshipId,
        draft: RelationshipDraft,
    ) -> Result<Relationship, ValidationError> {
        self.write().update_relationship(id, draft).cloned()
    }

    pub fn delete_relationship(&self, id: RelationshipId) -> Option<Relationship> {
        self.write().delete_relationship(id)
    }

    pub fn snapshot(&self) -> Diagram {
        self.read().clone()
    }

    pub fn generate_entities(&self) -> String {
        self.read().generate_entities()
    }

    pub fn generate_repositories(&self) -> String {
        self.read().generate_repositories()
    }
}
