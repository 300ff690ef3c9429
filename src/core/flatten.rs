use std::collections::HashMap;

use regex::Regex;

use crate::domain::model::{FlatEntry, FlattenedGrid, GridDocument};

/// Placeholder substituted for any cell that embeds an image attachment.
/// Attachment resolution is out of scope; every image collapses to this URL.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/6/69/Airbnb_Logo_B%C3%A9lo.svg/1024px-Airbnb_Logo_B%C3%A9lo.svg.png?20230603231949";

/// Reshapes a nested grid document into the flat column/entry form the
/// presentation service accepts.
///
/// Only the first sheet of the document is read; additional sheets are
/// ignored. Cells referencing row or column ids that do not exist in the
/// sheet are skipped silently.
pub struct GridFlattener {
    url_source: Regex,
}

impl GridFlattener {
    pub fn new() -> Self {
        Self {
            url_source: Regex::new(r"<<url_source>\{.*?\}<url_source>>").unwrap(),
        }
    }

    /// Never fails: a document with no sheets, columns or rows degrades to an
    /// empty `FlattenedGrid`.
    pub fn flatten(&self, grid: &GridDocument) -> FlattenedGrid {
        let Some(sheet) = grid.data.first() else {
            return FlattenedGrid::default();
        };

        let columns: Vec<String> = sheet.columns.iter().map(|col| col.name.clone()).collect();

        // row_id -> column_id -> raw content; the last cell wins when the
        // same (row, column) pair appears twice.
        let mut cells_by_row: HashMap<&str, HashMap<&str, &str>> = HashMap::new();
        for cell in &sheet.cells {
            cells_by_row
                .entry(cell.row_id.as_str())
                .or_default()
                .insert(cell.column_id.as_str(), cell.content.as_str());
        }

        let mut entries = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let row_cells = cells_by_row.get(row.id.as_str());
            let mut values = HashMap::with_capacity(sheet.columns.len());
            for column in &sheet.columns {
                let content = row_cells
                    .and_then(|cells| cells.get(column.id.as_str()))
                    .map(|raw| self.normalize(raw))
                    .unwrap_or_default();
                values.insert(column.name.clone(), content);
            }
            entries.push(FlatEntry { values });
        }

        FlattenedGrid { columns, entries }
    }

    /// Strips inline source-citation annotations, then collapses any cell
    /// that still carries an image attachment reference to the fixed
    /// placeholder URL.
    fn normalize(&self, raw: &str) -> String {
        let stripped = self.url_source.replace_all(raw, "");
        if let Some(pos) = stripped.find("![") {
            if stripped[pos..].contains("](attachment:") {
                return PLACEHOLDER_IMAGE_URL.to_string();
            }
        }
        stripped.into_owned()
    }
}

impl Default for GridFlattener {
    fn default() -> Self {
        Self::new()
    }
}
