use crate::scoring::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
}

/// The description of the contest written at the top of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub teams: usize,
    pub experts: usize,
    pub categories: usize,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstScoreRowIndex")]
    pub first_score_row_index: Option<JSValue>,
    #[serde(rename = "teamColumnIndex")]
    pub team_column_index: Option<JSValue>,
    #[serde(rename = "expertColumnIndex")]
    pub expert_column_index: Option<JSValue>,
    #[serde(rename = "categoryColumnIndex")]
    pub category_column_index: Option<JSValue>,
    #[serde(rename = "scoreColumnIndex")]
    pub score_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

/// The position of the fields in a row, starting at 0.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ScoreColumns {
    pub team: usize,
    pub expert: usize,
    pub category: usize,
    pub score: usize,
}

impl FileSource {
    /// A source with the default layout: a header row, then one score per row
    /// in the columns team, expert, category, score.
    pub fn with_defaults(provider: &str, file_path: &str) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            first_score_row_index: None,
            team_column_index: None,
            expert_column_index: None,
            category_column_index: None,
            score_column_index: None,
            excel_worksheet_name: None,
        }
    }

    /// The first row (starting at 1) that contains a score.
    pub fn first_score_row_index(&self) -> ContestResult<usize> {
        Ok(read_js_int(&self.first_score_row_index)?.unwrap_or(2))
    }

    pub fn columns(&self) -> ContestResult<ScoreColumns> {
        let col = |x: &Option<JSValue>, default: usize| -> ContestResult<usize> {
            match read_js_int(x)? {
                Some(0) => ParsingJsonNumberSnafu {
                    content: format!("{:?}", x),
                }
                .fail(),
                Some(idx) => Ok(idx - 1),
                None => Ok(default),
            }
        };
        Ok(ScoreColumns {
            team: col(&self.team_column_index, 0)?,
            expert: col(&self.expert_column_index, 1)?,
            category: col(&self.category_column_index, 2)?,
            score: col(&self.score_column_index, 3)?,
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ContestTeam {
    pub id: Option<u32>,
    pub name: String,
    #[serde(rename = "orderNumber")]
    pub order_number: Option<i64>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ContestExpert {
    pub id: Option<u32>,
    pub name: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ContestCategory {
    pub id: Option<u32>,
    pub name: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ContestRules {
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<String>,
    #[serde(rename = "trustScores")]
    pub trust_scores: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ContestConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "scoreFileSources", default)]
    pub score_file_sources: Vec<FileSource>,
    #[serde(default)]
    pub teams: Vec<ContestTeam>,
    #[serde(default)]
    pub experts: Vec<ContestExpert>,
    #[serde(default)]
    pub categories: Vec<ContestCategory>,
    pub rules: Option<ContestRules>,
}

pub fn read_config(path: &str) -> ContestResult<ContestConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ContestConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Reads a reference summary.
pub fn read_summary(path: &str) -> ContestResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {:?}", js);
    Ok(js)
}

// Indexes start at 1. Excel-style columns are accepted: A is 1, Z is 26, AA is 27.
fn read_js_int(x: &Option<JSValue>) -> ContestResult<Option<usize>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => n.as_u64().map(|x| Some(x as usize)).context(
            ParsingJsonNumberSnafu {
                content: n.to_string(),
            },
        ),
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            let idx = s.to_ascii_uppercase().chars().try_fold(0usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add(c as usize - 'A' as usize + 1)
            });
            idx.map(Some)
                .context(ParsingJsonNumberSnafu { content: s.clone() })
        }
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .map(Some)
            .context(ParsingJsonNumberSnafu { content: s.clone() }),
        Some(js) => ParsingJsonNumberSnafu {
            content: js.to_string(),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn indexes() {
        assert_eq!(read_js_int(&None).unwrap(), None);
        assert_eq!(read_js_int(&Some(json!(3))).unwrap(), Some(3));
        assert_eq!(read_js_int(&Some(json!("4"))).unwrap(), Some(4));
        assert_eq!(read_js_int(&Some(json!("A"))).unwrap(), Some(1));
        assert_eq!(read_js_int(&Some(json!("c"))).unwrap(), Some(3));
        assert_eq!(read_js_int(&Some(json!("AA"))).unwrap(), Some(27));
        assert!(read_js_int(&Some(json!("3x"))).is_err());
        assert!(read_js_int(&Some(json!(-1))).is_err());
        assert_eq!(read_js_int(&Some(json!("XFD"))).unwrap(), Some(16384));
        assert!(matches!(
            read_js_int(&Some(json!("ZZZZZZZZZZZZZZ"))),
            Err(ContestError::ParsingJsonNumber { .. })
        ));
    }

    #[test]
    fn default_columns() {
        let cfs = FileSource::with_defaults("csv", "scores.csv");
        assert_eq!(
            cfs.columns().unwrap(),
            ScoreColumns {
                team: 0,
                expert: 1,
                category: 2,
                score: 3
            }
        );
        assert_eq!(cfs.first_score_row_index().unwrap(), 2);
    }

    #[test]
    fn parse_config() {
        let js = r#"{
            "outputSettings": {"contestName": "Finals", "contestDate": "2024-05-01"},
            "scoreFileSources": [
                {"provider": "xlsx", "filePath": "scores.xlsx", "scoreColumnIndex": "E", "firstScoreRowIndex": 1}
            ],
            "teams": [{"name": "Red", "orderNumber": 2}, {"id": 7, "name": "Blue"}],
            "categories": [{"id": 1, "name": "Innovation"}],
            "rules": {"tiebreakMode": "random", "randomSeed": "12"}
        }"#;
        let config: ContestConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.contest_name, "Finals");
        assert!(config.experts.is_empty());
        assert_eq!(config.teams[1].id, Some(7));
        let cfs = &config.score_file_sources[0];
        assert_eq!(cfs.columns().unwrap().score, 4);
        assert_eq!(cfs.first_score_row_index().unwrap(), 1);
        assert_eq!(
            config.rules.and_then(|r| r.random_seed),
            Some("12".to_string())
        );
    }

    #[test]
    fn zero_column_is_rejected() {
        let mut cfs = FileSource::with_defaults("csv", "scores.csv");
        cfs.team_column_index = Some(json!(0));
        assert!(cfs.columns().is_err());
    }
}
