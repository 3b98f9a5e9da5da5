// Rows as they are submitted to a scoring service:
// [{"team_id": 1, "expert_id": 2, "category_id": 3, "score": 7.5}, ...]

use serde::Deserialize;

use crate::scoring::{io_common::make_default_id, *};

#[derive(Debug, Clone, Deserialize)]
struct ScoreRow {
    team_id: Option<JSValue>,
    expert_id: Option<JSValue>,
    category_id: Option<JSValue>,
    score: Option<JSValue>,
}

fn field_to_string(
    path: &str,
    lineno: usize,
    field: &str,
    value: &Option<JSValue>,
) -> ContestResult<String> {
    match value {
        Some(JSValue::String(s)) => Ok(s.trim().to_string()),
        Some(JSValue::Number(n)) => Ok(n.to_string()),
        Some(js) if !js.is_null() => ParsingJsonNumberSnafu {
            content: js.to_string(),
        }
        .fail(),
        _ => JsonMissingFieldSnafu {
            path,
            lineno,
            field,
        }
        .fail(),
    }
}

pub fn read_json_scores(path: &str) -> ContestResult<Vec<ParsedScore>> {
    let default_id = make_default_id(path);
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let rows: Vec<ScoreRow> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;

    let mut res: Vec<ParsedScore> = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let lineno = idx + 1;
        let ps = ParsedScore {
            id: default_id(lineno),
            team: field_to_string(path, lineno, "team_id", &row.team_id)?,
            expert: field_to_string(path, lineno, "expert_id", &row.expert_id)?,
            category: field_to_string(path, lineno, "category_id", &row.category_id)?,
            score: field_to_string(path, lineno, "score", &row.score)?,
        };
        debug!("read_json_scores: {:?}", ps);
        res.push(ps);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_json(content: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("scores.json");
        fs::write(&p, content).unwrap();
        let path = p.display().to_string();
        (dir, path)
    }

    #[test]
    fn rows() {
        let (_dir, path) = write_json(
            r#"[
                {"team_id": 1, "expert_id": 2, "category_id": 3, "score": 7.5},
                {"team_id": "Red", "expert_id": "2", "category_id": 3, "score": "8"}
            ]"#,
        );
        let res = read_json_scores(&path).unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].team, "1");
        assert_eq!(res[0].score, "7.5");
        assert_eq!(res[0].id, "scores.json-00000001");
        assert_eq!(res[1].team, "Red");
        assert_eq!(res[1].score, "8");
    }

    #[test]
    fn missing_fields() {
        let (_dir, path) = write_json(r#"[{"team_id": 1, "expert_id": 2, "score": 7.5}]"#);
        assert!(matches!(
            read_json_scores(&path),
            Err(ContestError::JsonMissingField { lineno: 1, .. })
        ));
        let (_dir, path) =
            write_json(r#"[{"team_id": 1, "expert_id": 2, "category_id": 1, "score": [7]}]"#);
        assert!(matches!(
            read_json_scores(&path),
            Err(ContestError::ParsingJsonNumber { .. })
        ));
    }

    #[test]
    fn not_a_list() {
        let (_dir, path) = write_json(r#"{"team_id": 1}"#);
        assert!(matches!(
            read_json_scores(&path),
            Err(ContestError::ParsingJson { .. })
        ));
    }
}
