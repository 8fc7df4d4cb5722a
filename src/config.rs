use serde::{Deserialize, Serialize};

use crate::model::Position;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Where newly created tables are placed on the canvas.
    pub default_position: Position,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_position: Position::new(100.0, 100.0),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
