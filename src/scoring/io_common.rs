use std::path::Path;

use crate::scoring::config_reader::ScoreColumns;
use crate::scoring::ParsedScore;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Identifiers for the rows of a file, for the error messages.
pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// A row where every cell is empty, usually at the end of a spreadsheet.
pub fn is_blank_row(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}

/// Picks the fields of a score in a row.
/// Returns None if the row does not reach one of the columns.
pub fn assemble_score(id: String, cells: &[String], columns: &ScoreColumns) -> Option<ParsedScore> {
    let cell = |idx: usize| cells.get(idx).map(|s| s.trim().to_string());
    Some(ParsedScore {
        id,
        team: cell(columns.team)?,
        expert: cell(columns.expert)?,
        category: cell(columns.category)?,
        score: cell(columns.score)?,
    })
}
