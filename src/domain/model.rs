use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{ConvertError, Result};

/// Grid document as served by the grid API. Sparse documents are fine:
/// every section defaults to empty rather than failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridDocument {
    #[serde(default)]
    pub data: Vec<Sheet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    #[serde(default)]
    pub columns: Vec<GridColumn>,
    #[serde(default)]
    pub rows: Vec<GridRow>,
    #[serde(default)]
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridColumn {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRow {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCell {
    pub row_id: String,
    pub column_id: String,
    #[serde(default)]
    pub content: String,
}

/// One grid row rendered flat: column name -> normalized cell text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatEntry {
    pub values: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlattenedGrid {
    pub columns: Vec<String>,
    pub entries: Vec<FlatEntry>,
}

/// Validated grid identifier. Accepted either as a bare id or extracted from
/// a grid URL (`.../grid/<id>`); ids are limited to `[a-zA-Z0-9-]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridReference {
    id: String,
}

impl GridReference {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        let bare = Regex::new(r"^[a-zA-Z0-9-]+$").unwrap();
        if bare.is_match(trimmed) {
            return Ok(Self {
                id: trimmed.to_string(),
            });
        }

        let in_url = Regex::new(r"/grid/([a-zA-Z0-9-]+)").unwrap();
        if let Some(caps) = in_url.captures(trimmed) {
            return Ok(Self {
                id: caps[1].to_string(),
            });
        }

        Err(ConvertError::InvalidGridReference {
            input: input.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for GridReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Slide layout requested from the presentation service. The backend
/// currently renders a single layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateType {
    #[default]
    TwoColumn,
}

impl FromStr for TemplateType {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "TWO_COLUMN" | "two_column" | "two-column" => Ok(TemplateType::TwoColumn),
            other => Err(ConvertError::InvalidConfigValueError {
                field: "template_type".to_string(),
                value: other.to_string(),
                reason: "Supported templates: TWO_COLUMN".to_string(),
            }),
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateType::TwoColumn => f.write_str("TWO_COLUMN"),
        }
    }
}

pub const DEFAULT_TAB: &str = "Tab 1";

/// Per-call knobs for the presentation request.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub tab: String,
    pub template_type: TemplateType,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            tab: DEFAULT_TAB.to_string(),
            template_type: TemplateType::default(),
        }
    }
}
