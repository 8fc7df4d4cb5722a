//! Interactive editing session.
//!
//! Wraps a [`Diagram`] with the editor's transient state: the selected table,
//! an in-progress drag and at most one open dialog. Every dialog and drag
//! starts from [`EditorState::Idle`].

use crate::config::EditorConfig;
use crate::diagram::{Diagram, ValidationError};
use crate::model::{
    Position, Relationship, RelationshipDraft, RelationshipId, Table, TableDraft, TableId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeKind {
    #[default]
    Entities,
    Repositories,
}

impl CodeKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "entities" => Some(Self::Entities),
            "repositories" => Some(Self::Repositories),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Dragging {
        table: TableId,
        /// Pointer position relative to the table's origin when the drag began.
        offset: Position,
    },
    /// `target` is `None` while creating a new table.
    EditingTable { target: Option<TableId> },
    EditingRelationship { target: Option<RelationshipId> },
    ViewingCode { kind: CodeKind, text: String },
}

impl EditorState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "dragging",
            Self::EditingTable { .. } => "editing-table",
            Self::EditingRelationship { .. } => "editing-relationship",
            Self::ViewingCode { .. } => "viewing-code",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    diagram: Diagram,
    state: EditorState,
    selected: Option<TableId>,
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            diagram: Diagram::with_config(config),
            ..Self::default()
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn selected(&self) -> Option<&Table> {
        self.selected.and_then(|id| self.diagram.table(id))
    }

    pub fn select_table(&mut self, id: Option<TableId>) {
        self.selected = id.filter(|id| self.diagram.table(*id).is_some());
    }

    /// Open the table dialog, prefilled from `target` or the new-table template.
    pub fn open_table_editor(
        &mut self,
        target: Option<TableId>,
    ) -> Result<TableDraft, SessionError> {
        self.require_idle("edit a table")?;
        let draft = match target {
            Some(id) => self
                .diagram
                .table(id)
                .map(TableDraft::from)
                .ok_or(ValidationError::UnknownTable(id))?,
            None => TableDraft {
                name: String::new(),
                fields: Diagram::default_fields(),
            },
        };
        self.transition(EditorState::EditingTable { target });
        Ok(draft)
    }

    /// Add or update the table being edited. The dialog stays open when the
    /// draft is rejected.
    pub fn save_table(&mut self, draft: TableDraft) -> Result<TableId, SessionError> {
        let EditorState::EditingTable { target } = self.state else {
            return Err(self.invalid("save a table"));
        };
        let id = match target {
            Some(id) => self.diagram.update_table(id, draft.name, draft.fields)?.id,
            None => self.diagram.add_table(draft.name, draft.fields)?.id,
        };
        self.transition(EditorState::Idle);
        Ok(id)
    }

    /// Open the relationship dialog. Returns the current record when editing.
    pub fn open_relationship_editor(
        &mut self,
        target: Option<RelationshipId>,
    ) -> Result<Option<RelationshipDraft>, SessionError> {
        self.require_idle("edit a relationship")?;
        let draft = match target {
            Some(id) => Some(
                self.diagram
                    .relationship(id)
                    .map(RelationshipDraft::from)
                    .ok_or(ValidationError::UnknownRelationship(id))?,
            ),
            None => None,
        };
        self.transition(EditorState::EditingRelationship { target });
        Ok(draft)
    }

    pub fn save_relationship(
        &mut self,
        draft: RelationshipDraft,
    ) -> Result<RelationshipId, SessionError> {
        let EditorState::EditingRelationship { target } = self.state else {
            return Err(self.invalid("save a relationship"));
        };
        let id = match target {
            Some(id) => self.diagram.update_relationship(id, draft)?.id,
            None => self.diagram.add_relationship(draft)?.id,
        };
        self.transition(EditorState::Idle);
        Ok(id)
    }

    /// Close the open dialog or abandon a drag. Idle stays idle.
    pub fn cancel(&mut self) {
        self.transition(EditorState::Idle);
    }

    pub fn begin_drag(&mut self, table: TableId, offset: Position) -> Result<(), SessionError> {
        self.require_idle("drag a table")?;
        if self.diagram.table(table).is_none() {
            return Err(ValidationError::UnknownTable(table).into());
        }
        self.transition(EditorState::Dragging { table, offset });
        Ok(())
    }

    /// Move the dragged table so that the grab point follows `pointer`.
    pub fn drag_to(&mut self, pointer: Position) -> Result<(), SessionError> {
        let EditorState::Dragging { table, offset } = self.state else {
            return Err(self.invalid("move a table"));
        };
        let position = Position::new(pointer.x - offset.x, pointer.y - offset.y);
        if !self.diagram.move_table(table, position) {
            self.transition(EditorState::Idle);
            return Err(ValidationError::UnknownTable(table).into());
        }
        Ok(())
    }

    pub fn end_drag(&mut self) {
        if matches!(self.state, EditorState::Dragging { .. }) {
            self.transition(EditorState::Idle);
        }
    }

    /// Delete a table with its relationships. Clears the selection if it
    /// pointed at the table.
    pub fn delete_table(&mut self, id: TableId) -> Result<Option<Table>, SessionError> {
        self.require_idle("delete a table")?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(self.diagram.delete_table(id))
    }

    pub fn delete_relationship(
        &mut self,
        id: RelationshipId,
    ) -> Result<Option<Relationship>, SessionError> {
        self.require_idle("delete a relationship")?;
        Ok(self.diagram.delete_relationship(id))
    }

    /// Generate code for the current diagram and show it.
    pub fn generate_code(&mut self, kind: CodeKind) -> Result<&str, SessionError> {
        self.require_idle("generate code")?;
        self.show_code(kind);
        Ok(self.code_text())
    }

    /// Switch the code view to another kind, regenerating the text.
    pub fn switch_code_kind(&mut self, kind: CodeKind) -> Result<&str, SessionError> {
        if !matches!(self.state, EditorState::ViewingCode { .. }) {
            return Err(self.invalid("switch code view"));
        }
        self.show_code(kind);
        Ok(self.code_text())
    }

    fn show_code(&mut self, kind: CodeKind) {
        let text = match kind {
            CodeKind::Entities => self.diagram.generate_entities(),
            CodeKind::Repositories => self.diagram.generate_repositories(),
        };
        self.transition(EditorState::ViewingCode { kind, text });
    }

    fn code_text(&self) -> &str {
        match &self.state {
            EditorState::ViewingCode { text, .. } => text,
            _ => "",
        }
    }

    fn require_idle(&self, action: &'static str) -> Result<(), SessionError> {
        match self.state {
            EditorState::Idle => Ok(()),
            _ => Err(self.invalid(action)),
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    fn transition(&mut self, next: EditorState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "editor state");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cardinality, Field, FieldType};

    fn create_table(session: &mut Session, name: &str) -> TableId {
        let mut draft = session.open_table_editor(None).unwrap();
        draft.name = name.to_string();
        session.save_table(draft).unwrap()
    }

    #[test]
    fn test_new_table_uses_template() {
        let mut session = Session::default();
        let draft = session.open_table_editor(None).unwrap();

        assert_eq!(draft.name, "");
        assert_eq!(draft.fields, Diagram::default_fields());
        assert_eq!(session.state(), &EditorState::EditingTable { target: None });
    }

    #[test]
    fn test_save_table_returns_to_idle() {
        let mut session = Session::default();
        let id = create_table(&mut session, "User");

        assert_eq!(session.state(), &EditorState::Idle);
        assert_eq!(session.diagram().table(id).unwrap().name, "User");
    }

    #[test]
    fn test_rejected_draft_keeps_dialog_open() {
        let mut session = Session::default();
        session.open_table_editor(None).unwrap();
        let draft = TableDraft {
            name: "User".to_string(),
            fields: vec![Field::new("name", FieldType::String)],
        };

        let err = session.save_table(draft).unwrap_err();
        assert_eq!(err, SessionError::Validation(ValidationError::NoPrimaryKey));
        assert_eq!(session.state(), &EditorState::EditingTable { target: None });
        assert!(session.diagram().tables().is_empty());
    }

    #[test]
    fn test_edit_existing_table() {
        let mut session = Session::default();
        let id = create_table(&mut session, "User");

        let mut draft = session.open_table_editor(Some(id)).unwrap();
        assert_eq!(draft.name, "User");
        draft.fields.push(Field::new("email", FieldType::String));
        assert_eq!(session.save_table(draft).unwrap(), id);
        assert_eq!(session.diagram().table(id).unwrap().fields.len(), 2);
        assert_eq!(session.diagram().tables().len(), 1);
    }

    #[test]
    fn test_single_active_dialog() {
        let mut session = Session::default();
        let id = create_table(&mut session, "User");
        session.open_relationship_editor(None).unwrap();

        assert!(matches!(
            session.open_table_editor(None),
            Err(SessionError::InvalidTransition { state: "editing-relationship", .. })
        ));
        assert!(session.begin_drag(id, Position::default()).is_err());
        assert!(session.generate_code(CodeKind::Entities).is_err());

        session.cancel();
        assert_eq!(session.state(), &EditorState::Idle);
        assert!(session.generate_code(CodeKind::Entities).is_ok());
    }

    #[test]
    fn test_save_without_dialog_rejected() {
        let mut session = Session::default();
        let draft = TableDraft {
            name: "User".to_string(),
            fields: Diagram::default_fields(),
        };
        assert!(matches!(
            session.save_table(draft),
            Err(SessionError::InvalidTransition { state: "idle", .. })
        ));
    }

    #[test]
    fn test_relationship_dialog() {
        let mut session = Session::default();
        let user = create_table(&mut session, "User");
        let post = create_table(&mut session, "Post");

        assert_eq!(session.open_relationship_editor(None).unwrap(), None);
        let draft = RelationshipDraft::new(user, "id", post, "user_id", Cardinality::OneToMany);
        let rel = session.save_relationship(draft.clone()).unwrap();

        assert_eq!(session.open_relationship_editor(Some(rel)).unwrap(), Some(draft.clone()));
        session.cancel();

        session.open_relationship_editor(None).unwrap();
        assert_eq!(
            session.save_relationship(draft).unwrap_err(),
            SessionError::Validation(ValidationError::DuplicateRelationship { from: user, to: post })
        );
    }

    #[test]
    fn test_drag_moves_table() {
        let mut session = Session::default();
        let id = create_table(&mut session, "User");

        session.begin_drag(id, Position::new(10.0, 5.0)).unwrap();
        session.drag_to(Position::new(250.0, 305.0)).unwrap();
        session.drag_to(Position::new(260.0, 315.0)).unwrap();
        session.end_drag();

        assert_eq!(session.state(), &EditorState::Idle);
        assert_eq!(
            session.diagram().table(id).unwrap().position,
            Position::new(250.0, 310.0)
        );
        assert!(session.drag_to(Position::default()).is_err());
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut session = Session::default();
        let user = create_table(&mut session, "User");
        let post = create_table(&mut session, "Post");
        session.select_table(Some(user));

        session.delete_table(post).unwrap();
        assert_eq!(session.selected().map(|t| t.id), Some(user));

        session.delete_table(user).unwrap();
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_select_unknown_table() {
        let mut session = Session::default();
        session.select_table(Some(TableId(5)));
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_code_view() {
        let mut session = Session::default();
        create_table(&mut session, "User");

        let entities = session.generate_code(CodeKind::Entities).unwrap().to_string();
        assert!(entities.contains("public class User {"));

        let repos = session.switch_code_kind(CodeKind::Repositories).unwrap();
        assert!(repos.contains("public interface UserRepository"));
        assert!(matches!(
            session.state(),
            EditorState::ViewingCode { kind: CodeKind::Repositories, .. }
        ));

        session.cancel();
        assert!(session.switch_code_kind(CodeKind::Entities).is_err());
    }
}
