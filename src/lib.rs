pub mod codegen;
pub mod config;
pub mod diagram;
pub mod model;
pub mod naming;
pub mod session;
pub mod shared;

use std::fmt::Display;

use wasm_bindgen::prelude::*;

use config::EditorConfig;
use model::{
    Position, Relationship, RelationshipDraft, RelationshipId, Table, TableDraft, TableId,
};
use session::{CodeKind, Session};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn to_js_err(err: impl Display) -> String {
    err.to_string()
}

fn parse_code_kind(kind: &str) -> Result<CodeKind, String> {
    CodeKind::from_str(kind).ok_or_else(|| format!("Invalid code kind: {}", kind))
}

/// Generate JPA entity classes from JSON-encoded tables and relationships
#[wasm_bindgen(js_name = "generateEntities")]
pub fn generate_entities(tables: &str, relationships: &str) -> Result<String, String> {
    let tables: Vec<Table> = serde_json::from_str(tables).map_err(to_js_err)?;
    let relationships: Vec<Relationship> =
        serde_json::from_str(relationships).map_err(to_js_err)?;
    Ok(codegen::generate_entities(&tables, &relationships))
}

/// Generate Spring Data repositories from JSON-encoded tables
#[wasm_bindgen(js_name = "generateRepositories")]
pub fn generate_repositories(tables: &str) -> Result<String, String> {
    let tables: Vec<Table> = serde_json::from_str(tables).map_err(to_js_err)?;
    Ok(codegen::generate_repositories(&tables))
}

/// Editing session exposed to the browser front end.
///
/// Records cross the boundary as JSON strings, ids as plain numbers.
#[wasm_bindgen]
pub struct Editor {
    session: Session,
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<Editor, String> {
        let config = match config.as_deref() {
            Some(json) => EditorConfig::from_json(json).map_err(to_js_err)?,
            None => EditorConfig::default(),
        };
        Ok(Editor {
            session: Session::new(config),
        })
    }

    pub fn tables(&self) -> Result<String, String> {
        serde_json::to_string(self.session.diagram().tables()).map_err(to_js_err)
    }

    pub fn relationships(&self) -> Result<String, String> {
        serde_json::to_string(self.session.diagram().relationships()).map_err(to_js_err)
    }

    pub fn state(&self) -> String {
        self.session.state().name().to_string()
    }

    #[wasm_bindgen(js_name = "selectedTable")]
    pub fn selected_table(&self) -> Option<u32> {
        self.session.selected().map(|t| t.id.0)
    }

    #[wasm_bindgen(js_name = "selectTable")]
    pub fn select_table(&mut self, id: Option<u32>) {
        self.session.select_table(id.map(TableId));
    }

    #[wasm_bindgen(js_name = "openTableEditor")]
    pub fn open_table_editor(&mut self, id: Option<u32>) -> Result<String, String> {
        let draft = self
            .session
            .open_table_editor(id.map(TableId))
            .map_err(to_js_err)?;
        serde_json::to_string(&draft).map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = "saveTable")]
    pub fn save_table(&mut self, draft: &str) -> Result<u32, String> {
        let draft: TableDraft = serde_json::from_str(draft).map_err(to_js_err)?;
        let id = self.session.save_table(draft).map_err(to_js_err)?;
        Ok(id.0)
    }

    #[wasm_bindgen(js_name = "openRelationshipEditor")]
    pub fn open_relationship_editor(
        &mut self,
        id: Option<u32>,
    ) -> Result<Option<String>, String> {
        let draft = self
            .session
            .open_relationship_editor(id.map(RelationshipId))
            .map_err(to_js_err)?;
        draft
            .map(|d| serde_json::to_string(&d).map_err(to_js_err))
            .transpose()
    }

    #[wasm_bindgen(js_name = "saveRelationship")]
    pub fn save_relationship(&mut self, draft: &str) -> Result<u32, String> {
        let draft: RelationshipDraft = serde_json::from_str(draft).map_err(to_js_err)?;
        let id = self.session.save_relationship(draft).map_err(to_js_err)?;
        Ok(id.0)
    }

    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    #[wasm_bindgen(js_name = "beginDrag")]
    pub fn begin_drag(&mut self, id: u32, offset_x: f64, offset_y: f64) -> Result<(), String> {
        self.session
            .begin_drag(TableId(id), Position::new(offset_x, offset_y))
            .map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = "dragTo")]
    pub fn drag_to(&mut self, x: f64, y: f64) -> Result<(), String> {
        self.session.drag_to(Position::new(x, y)).map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = "endDrag")]
    pub fn end_drag(&mut self) {
        self.session.end_drag();
    }

    /// Returns whether a table was removed.
    #[wasm_bindgen(js_name = "deleteTable")]
    pub fn delete_table(&mut self, id: u32) -> Result<bool, String> {
        let removed = self.session.delete_table(TableId(id)).map_err(to_js_err)?;
        Ok(removed.is_some())
    }

    #[wasm_bindgen(js_name = "deleteRelationship")]
    pub fn delete_relationship(&mut self, id: u32) -> Result<bool, String> {
        let removed = self
            .session
            .delete_relationship(RelationshipId(id))
            .map_err(to_js_err)?;
        Ok(removed.is_some())
    }

    /// `kind` is "entities" or "repositories".
    #[wasm_bindgen(js_name = "generateCode")]
    pub fn generate_code(&mut self, kind: &str) -> Result<String, String> {
        let kind = parse_code_kind(kind)?;
        self.session
            .generate_code(kind)
            .map(str::to_string)
            .map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = "switchCodeKind")]
    pub fn switch_code_kind(&mut self, kind: &str) -> Result<String, String> {
        let kind = parse_code_kind(kind)?;
        self.session
            .switch_code_kind(kind)
            .map(str::to_string)
            .map_err(to_js_err)
    }
}
