use log::{debug, info, warn};

use panel_scoring::store::ScoreStore;
use panel_scoring::*;
use snafu::{prelude::*, Snafu};

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::scoring::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_json;

#[derive(Debug, Snafu)]
pub enum ContestError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} has no worksheet named {name}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display(
        "The workbook {path} has several worksheets, the worksheet name must be provided"
    ))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("{path}: line {lineno}: could not read cell {content}"))]
    ExcelWrongCellType {
        path: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not understand the number {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("{path}: row {lineno}: missing field {field}"))]
    JsonMissingField {
        path: String,
        lineno: usize,
        field: String,
    },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a line of {path}"))]
    CsvLineParse { source: csv::Error, path: String },
    #[snafu(display("Line {lineno} is too short"))]
    LineTooShort { lineno: usize },
    #[snafu(display("{id}: could not understand the score {content}"))]
    ParsingScore { id: String, content: String },
    #[snafu(display("{id}: unknown {kind} {label}"))]
    UnknownLabel {
        id: String,
        kind: String,
        label: String,
    },
    #[snafu(display("{id}: the score was rejected"))]
    RejectedScore { id: String, source: ScoringErrors },
    #[snafu(display("The contest could not be scored"))]
    Scoring { source: ScoringErrors },
    #[snafu(display("Cannot find the directory of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the summary and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ContestResult<T> = Result<T, ContestError>;

/// A score, as parsed by the readers.
/// This is before resolving the names and checking the values.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedScore {
    pub id: String,
    pub team: String,
    pub expert: String,
    pub category: String,
    pub score: String,
}

/// What to run, as requested on the command line.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunSettings {
    pub config: Option<String>,
    pub input: Option<String>,
    pub input_type: Option<String>,
    pub out: Option<String>,
    pub reference: Option<String>,
    pub excel_worksheet_name: Option<String>,
}

fn results_to_json(results: &[TeamResult]) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for (rank, tr) in rank_positions(results).iter().zip(results.iter()) {
        let mut categories: JSMap<String, JSValue> = JSMap::new();
        for (cid, cr) in tr.categories.iter() {
            let scores_with_experts: Vec<JSValue> = cr
                .scores_with_experts
                .iter()
                .map(|es| json!({"score": es.score, "expert_id": es.expert_id}))
                .collect();
            categories.insert(
                cid.to_string(),
                json!({
                    "id": cr.id,
                    "name": cr.name,
                    "scores": cr.scores,
                    "scoresWithExperts": scores_with_experts,
                    "average": cr.average,
                }),
            );
        }
        l.push(json!({
            "rank": rank,
            "id": tr.id,
            "name": tr.name,
            "categories": categories,
            "overall_score": tr.overall_score,
        }));
    }
    l
}

fn build_summary_js(c: &OutputConfig, results: &[TeamResult]) -> JSValue {
    json!({
        "config": c,
        "results": results_to_json(results) })
}

fn validate_rules(rules: &Option<ContestRules>) -> ContestResult<ScoringRules> {
    let rules = match rules {
        Some(r) => r.clone(),
        None => return Ok(ScoringRules::DEFAULT_RULES),
    };
    let res = ScoringRules {
        tiebreak_mode: match rules.tiebreak_mode.as_deref() {
            None | Some("useTeamOrder") => TieBreakMode::UseTeamOrder,
            Some("random") => {
                let seed = match rules.random_seed.clone().map(|s| s.parse::<u32>()) {
                    Some(Ok(x)) => x,
                    x => {
                        whatever!("Tiebreak mode random requires a numeric randomSeed, got {:?}", x)
                    }
                };
                TieBreakMode::Random(seed)
            }
            Some(x) => {
                whatever!("Unknown tiebreak mode {:?}", x)
            }
        },
        validation: match rules.trust_scores {
            Some(true) => ValidationMode::Trusted,
            _ => ValidationMode::Strict,
        },
    };
    Ok(res)
}

fn read_score_data(root_path: &Path, cfs: &FileSource) -> ContestResult<Vec<ParsedScore>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read score file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_scores(&p2, cfs),
        "xlsx" | "excel" => io_excel::read_excel_scores(&p2, cfs),
        "json" => io_json::read_json_scores(&p2),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

// Labels are matched by name first, then by numeric id.
struct Lookup {
    by_name: HashMap<String, u32>,
    ids: HashSet<u32>,
}

impl Lookup {
    fn new<'a>(entries: impl Iterator<Item = (u32, &'a String)>) -> Lookup {
        let mut by_name: HashMap<String, u32> = HashMap::new();
        let mut ids: HashSet<u32> = HashSet::new();
        for (id, name) in entries {
            by_name.entry(name.clone()).or_insert(id);
            ids.insert(id);
        }
        Lookup { by_name, ids }
    }

    fn resolve(&self, label: &str) -> Option<u32> {
        self.by_name.get(label).cloned().or_else(|| {
            label
                .parse::<u32>()
                .ok()
                .filter(|id| self.ids.contains(id))
        })
    }
}

// Distinct labels, in the order they are first seen.
fn infer_names<'a>(labels: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: HashSet<&String> = HashSet::new();
    let mut res: Vec<String> = Vec::new();
    for l in labels {
        if !l.is_empty() && seen.insert(l) {
            res.push(l.clone());
        }
    }
    res
}

// Entries inferred from the labels of a sheet. A numeric label keeps its value
// as id, the other labels get the ids after the highest numeric one.
fn infer_entries<'a>(
    labels: impl Iterator<Item = &'a String>,
) -> ContestResult<Vec<(u32, String)>> {
    let names = infer_names(labels);
    let mut used: HashSet<u32> = HashSet::new();
    let numeric_ids: Vec<Option<u32>> = names
        .iter()
        .map(|name| name.parse::<u32>().ok().filter(|id| used.insert(*id)))
        .collect();
    let mut last_id: u32 = used.iter().max().cloned().unwrap_or(0);
    let mut res: Vec<(u32, String)> = Vec::with_capacity(names.len());
    for (name, numeric_id) in names.into_iter().zip(numeric_ids) {
        let id = match numeric_id {
            Some(id) => id,
            None => {
                last_id = match last_id.checked_add(1) {
                    Some(x) => x,
                    None => whatever!("No id left for {:?}", name),
                };
                last_id
            }
        };
        res.push((id, name));
    }
    Ok(res)
}

fn build_store(
    config: Option<&ContestConfig>,
    parsed: &[ParsedScore],
    rules: &ScoringRules,
) -> ContestResult<ScoreStore> {
    let configured_teams = config.map(|c| c.teams.clone()).unwrap_or_default();
    let teams: Vec<Team> = if configured_teams.is_empty() {
        infer_entries(parsed.iter().map(|ps| &ps.team))?
            .into_iter()
            .enumerate()
            .map(|(idx, (id, name))| Team {
                id,
                name,
                order_number: (idx + 1) as i64,
            })
            .collect()
    } else {
        configured_teams
            .iter()
            .enumerate()
            .map(|(idx, t)| Team {
                id: t.id.unwrap_or((idx + 1) as u32),
                name: t.name.clone(),
                order_number: t.order_number.unwrap_or((idx + 1) as i64),
            })
            .collect()
    };

    let configured_experts = config.map(|c| c.experts.clone()).unwrap_or_default();
    let experts: Vec<Expert> = if configured_experts.is_empty() {
        infer_entries(parsed.iter().map(|ps| &ps.expert))?
            .into_iter()
            .map(|(id, name)| Expert { id, name })
            .collect()
    } else {
        configured_experts
            .iter()
            .enumerate()
            .map(|(idx, e)| Expert {
                id: e.id.unwrap_or((idx + 1) as u32),
                name: e.name.clone(),
            })
            .collect()
    };

    let configured_categories = config.map(|c| c.categories.clone()).unwrap_or_default();
    let categories: Vec<Category> = if configured_categories.is_empty() {
        infer_entries(parsed.iter().map(|ps| &ps.category))?
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect()
    } else {
        configured_categories
            .iter()
            .enumerate()
            .map(|(idx, c)| Category {
                id: c.id.unwrap_or((idx + 1) as u32),
                name: c.name.clone(),
            })
            .collect()
    };

    if categories.is_empty() {
        whatever!("At least one scoring category is required");
    }

    for t in teams.iter() {
        info!("Team: {}: {} (order {})", t.id, t.name, t.order_number);
    }
    for c in categories.iter() {
        info!("Category: {}: {}", c.id, c.name);
    }

    ScoreStore::new(rules)
        .teams(&teams)
        .and_then(|s| s.experts(&experts))
        .and_then(|s| s.categories(&categories))
        .context(ScoringSnafu {})
}

/// Resolves the parsed scores and submits them to the store.
/// Blank scores are skipped. Returns the number of accepted scores.
fn submit_scores(store: &mut ScoreStore, parsed: &[ParsedScore]) -> ContestResult<usize> {
    let teams = store.list_teams();
    let experts = store.list_experts();
    let categories = store.list_categories();
    let team_lookup = Lookup::new(teams.iter().map(|t| (t.id, &t.name)));
    let expert_lookup = Lookup::new(experts.iter().map(|e| (e.id, &e.name)));
    let category_lookup = Lookup::new(categories.iter().map(|c| (c.id, &c.name)));

    let mut accepted: usize = 0;
    for ps in parsed.iter() {
        if ps.score.is_empty() {
            warn!("submit_scores: {}: no score given, skipping", ps.id);
            continue;
        }
        let value: f64 = ps.score.parse::<f64>().ok().context(ParsingScoreSnafu {
            id: ps.id.clone(),
            content: ps.score.clone(),
        })?;
        let resolve = |lookup: &Lookup, kind: &str, label: &String| {
            lookup.resolve(label).context(UnknownLabelSnafu {
                id: ps.id.clone(),
                kind,
                label: label.clone(),
            })
        };
        let score = Score {
            team_id: resolve(&team_lookup, "team", &ps.team)?,
            expert_id: resolve(&expert_lookup, "expert", &ps.expert)?,
            category_id: resolve(&category_lookup, "category", &ps.category)?,
            score: value,
        };
        debug!("submit_scores: {}: {:?}", ps.id, score);
        store
            .submit_score(&score)
            .context(RejectedScoreSnafu { id: ps.id.clone() })?;
        accepted += 1;
    }
    Ok(accepted)
}

fn write_summary(out: &Option<String>, pretty_js: &str) -> ContestResult<()> {
    match out.as_deref() {
        None | Some("") | Some("stdout") => {
            println!("{}", pretty_js);
            Ok(())
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })
        }
    }
}

/// Reads the scores, ranks the teams and writes the summary.
///
/// If a reference summary is given, the run fails when the summary differs from it.
pub fn run_contest(settings: &RunSettings) -> ContestResult<JSValue> {
    let config: Option<ContestConfig> = match settings.config.as_deref() {
        Some(path) => Some(read_config(path)?),
        None => None,
    };
    info!("config: {:?}", config);

    let rules = validate_rules(&config.as_ref().and_then(|c| c.rules.clone()))?;

    // The input file given on the command line replaces the sources of the configuration.
    let (root_p, sources): (PathBuf, Vec<FileSource>) = match &settings.input {
        Some(input) => {
            let provider = settings.input_type.clone().unwrap_or_else(|| "csv".to_string());
            let mut cfs = FileSource::with_defaults(&provider, input);
            cfs.excel_worksheet_name = settings.excel_worksheet_name.clone();
            (PathBuf::new(), vec![cfs])
        }
        None => match (&settings.config, &config) {
            (Some(config_path), Some(c)) => {
                let root_p = Path::new(config_path)
                    .parent()
                    .context(MissingParentDirSnafu { path: config_path })?;
                (root_p.to_path_buf(), c.score_file_sources.clone())
            }
            _ => whatever!("No score file provided: use --input or --config"),
        },
    };

    if sources.is_empty() {
        whatever!("No score file sources detected");
    }

    let mut parsed: Vec<ParsedScore> = Vec::new();
    for cfs in sources.iter() {
        let mut file_data = read_score_data(&root_p, cfs)?;
        parsed.append(&mut file_data);
    }
    info!("Read {} score records", parsed.len());

    let mut store = build_store(config.as_ref(), &parsed, &rules)?;
    let accepted = submit_scores(&mut store, &parsed)?;
    info!("Accepted {} scores", accepted);

    let snapshot = store.snapshot();
    let results = snapshot.results().context(ScoringSnafu {})?;

    let output_config = OutputConfig {
        contest: config
            .as_ref()
            .map(|c| c.output_settings.contest_name.clone())
            .unwrap_or_else(|| "Contest".to_string()),
        date: config
            .as_ref()
            .and_then(|c| c.output_settings.contest_date.clone()),
        teams: snapshot.teams.len(),
        experts: store.list_experts().len(),
        categories: snapshot.categories.len(),
    };
    let result_js = build_summary_js(&output_config, &results);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    let out = settings.out.clone().or_else(|| {
        config
            .as_ref()
            .and_then(|c| c.output_settings.output_directory.clone())
            .map(|dir| {
                Path::new(&root_p)
                    .join(dir)
                    .join("summary.json")
                    .display()
                    .to_string()
            })
    });
    write_summary(&out, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = settings.reference.as_deref() {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_str(),
                "\n",
            );
            return ReferenceMismatchSnafu { path: summary_p }.fail();
        }
    }

    Ok(result_js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
        let p = dir.path().join(name);
        fs::write(&p, content).unwrap();
        p.display().to_string()
    }

    fn parsed(team: &str, expert: &str, category: &str, score: &str) -> ParsedScore {
        ParsedScore {
            id: format!("{}-{}-{}", team, expert, category),
            team: team.to_string(),
            expert: expert.to_string(),
            category: category.to_string(),
            score: score.to_string(),
        }
    }

    const SCORES_CSV: &str = "team,expert,category,score
Red,J1,Design,4
Red,J2,Design,6
Red,J3,Design,8
Red,J1,Demo,5
Blue,J1,Design,9
Blue,J2,Design,0
Blue,J1,Demo,7
Blue,J2,Demo,7
";

    #[test]
    fn rules() {
        assert_eq!(validate_rules(&None).unwrap(), ScoringRules::DEFAULT_RULES);
        let random = ContestRules {
            tiebreak_mode: Some("random".to_string()),
            random_seed: Some("42".to_string()),
            trust_scores: Some(true),
        };
        assert_eq!(
            validate_rules(&Some(random)).unwrap(),
            ScoringRules {
                tiebreak_mode: TieBreakMode::Random(42),
                validation: ValidationMode::Trusted,
            }
        );
        let no_seed = ContestRules {
            tiebreak_mode: Some("random".to_string()),
            random_seed: None,
            trust_scores: None,
        };
        assert!(validate_rules(&Some(no_seed)).is_err());
        let unknown = ContestRules {
            tiebreak_mode: Some("coinToss".to_string()),
            random_seed: None,
            trust_scores: None,
        };
        assert!(validate_rules(&Some(unknown)).is_err());
    }

    #[test]
    fn lookup_by_name_then_id() {
        let names = vec!["Red".to_string(), "7".to_string()];
        let lookup = Lookup::new(vec![(3, &names[0]), (4, &names[1])].into_iter());
        assert_eq!(lookup.resolve("Red"), Some(3));
        assert_eq!(lookup.resolve("3"), Some(3));
        // A name that looks like an id is matched as a name first.
        assert_eq!(lookup.resolve("7"), Some(4));
        assert_eq!(lookup.resolve("4"), Some(4));
        assert_eq!(lookup.resolve("5"), None);
    }

    #[test]
    fn later_rows_replace_earlier_ones() {
        let rows = vec![
            parsed("Red", "J1", "Design", "3"),
            parsed("Red", "J2", "Design", ""),
            parsed("Red", "J1", "Design", "9.5"),
        ];
        let mut store = build_store(None, &rows, &ScoringRules::DEFAULT_RULES).unwrap();
        assert_eq!(submit_scores(&mut store, &rows).unwrap(), 2);
        let scores = store.scores_for_team(1).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 9.5);
    }

    #[test]
    fn invalid_rows_are_rejected() {
        let rows = vec![parsed("Red", "J1", "Design", "11")];
        let mut store = build_store(None, &rows, &ScoringRules::DEFAULT_RULES).unwrap();
        assert!(matches!(
            submit_scores(&mut store, &rows),
            Err(ContestError::RejectedScore { .. })
        ));

        let rows = vec![parsed("Red", "J1", "Design", "high")];
        let mut store = build_store(None, &rows, &ScoringRules::DEFAULT_RULES).unwrap();
        assert!(matches!(
            submit_scores(&mut store, &rows),
            Err(ContestError::ParsingScore { .. })
        ));
    }

    #[test]
    fn run_from_csv_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(&dir, "scores.csv", SCORES_CSV);
        let out = dir.path().join("summary.json").display().to_string();
        let settings = RunSettings {
            input: Some(input),
            out: Some(out.clone()),
            ..RunSettings::default()
        };
        let js = run_contest(&settings).unwrap();

        let results = js["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        // Blue: design 9 (the zero is dropped), demo 7 -> 16
        // Red: design 6 (4 and 8 trimmed), demo 5 -> 11
        assert_eq!(results[0]["name"], json!("Blue"));
        assert_eq!(results[0]["overall_score"], json!(16.0));
        assert_eq!(results[0]["rank"], json!(1));
        assert_eq!(results[1]["name"], json!("Red"));
        assert_eq!(results[1]["overall_score"], json!(11.0));
        assert_eq!(results[1]["categories"]["1"]["average"], json!(6.0));
        assert_eq!(
            results[1]["categories"]["1"]["scores"],
            json!([4.0, 6.0, 8.0])
        );
        assert_eq!(
            results[0]["categories"]["1"]["scoresWithExperts"],
            json!([{"score": 9.0, "expert_id": 1}, {"score": 0.0, "expert_id": 2}])
        );
        assert_eq!(js["config"]["experts"], json!(3));

        let written: JSValue =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, js);
    }

    #[test]
    fn run_from_config_with_reference() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "scores.csv", SCORES_CSV);
        let config = write_file(
            &dir,
            "contest.json",
            r#"{
                "outputSettings": {"contestName": "Finals"},
                "scoreFileSources": [{"provider": "csv", "filePath": "scores.csv"}],
                "teams": [
                    {"id": 10, "name": "Red", "orderNumber": 1},
                    {"id": 20, "name": "Blue", "orderNumber": 2},
                    {"id": 30, "name": "Green", "orderNumber": 3}
                ],
                "categories": [{"id": 1, "name": "Design"}, {"id": 2, "name": "Demo"}],
                "rules": {"tiebreakMode": "useTeamOrder"}
            }"#,
        );
        let out = dir.path().join("first.json").display().to_string();
        let settings = RunSettings {
            config: Some(config.clone()),
            out: Some(out.clone()),
            ..RunSettings::default()
        };
        let js = run_contest(&settings).unwrap();
        let ids: Vec<u64> = js["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_u64().unwrap())
            .collect();
        // Green has no score but is still ranked.
        assert_eq!(ids, vec![20, 10, 30]);
        assert_eq!(js["config"]["contest"], json!("Finals"));

        // Running again against the first summary succeeds.
        let again = RunSettings {
            config: Some(config.clone()),
            out: Some(dir.path().join("second.json").display().to_string()),
            reference: Some(out),
            ..RunSettings::default()
        };
        assert!(run_contest(&again).is_ok());

        let wrong_ref = write_file(&dir, "wrong.json", r#"{"results": []}"#);
        let mismatch = RunSettings {
            config: Some(config),
            out: Some(dir.path().join("third.json").display().to_string()),
            reference: Some(wrong_ref),
            ..RunSettings::default()
        };
        assert!(matches!(
            run_contest(&mismatch),
            Err(ContestError::ReferenceMismatch { .. })
        ));
    }

    #[test]
    fn unknown_team_in_configured_contest() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "scores.csv", "team,expert,category,score\nPurple,J1,Design,5\n");
        let config = write_file(
            &dir,
            "contest.json",
            r#"{
                "outputSettings": {"contestName": "Finals"},
                "scoreFileSources": [{"provider": "csv", "filePath": "scores.csv"}],
                "teams": [{"name": "Red"}],
                "categories": [{"name": "Design"}]
            }"#,
        );
        let settings = RunSettings {
            config: Some(config),
            out: Some(dir.path().join("summary.json").display().to_string()),
            ..RunSettings::default()
        };
        assert!(matches!(
            run_contest(&settings),
            Err(ContestError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn inferred_ids_keep_numeric_labels() {
        let labels: Vec<String> = ["Red", "5", "2", "05", "Blue", "5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let entries = infer_entries(labels.iter()).unwrap();
        let expected: Vec<(u32, String)> = vec![
            (6, "Red".to_string()),
            (5, "5".to_string()),
            (2, "2".to_string()),
            // Same value as an earlier label: it gets a new id.
            (7, "05".to_string()),
            (8, "Blue".to_string()),
        ];
        assert_eq!(entries, expected);
    }

    #[test]
    fn run_from_json_rows_keeps_submitted_ids() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(
            &dir,
            "scores.json",
            r#"[
                {"team_id": 5, "expert_id": 7, "category_id": 3, "score": 6},
                {"team_id": 2, "expert_id": 9, "category_id": 3, "score": 8}
            ]"#,
        );
        let settings = RunSettings {
            input: Some(input),
            input_type: Some("json".to_string()),
            out: Some(dir.path().join("summary.json").display().to_string()),
            ..RunSettings::default()
        };
        let js = run_contest(&settings).unwrap();
        let results = js["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["id"], json!(2));
        assert_eq!(results[0]["overall_score"], json!(8.0));
        assert_eq!(results[1]["id"], json!(5));
        assert_eq!(results[1]["categories"]["3"]["id"], json!(3));
        assert_eq!(
            results[1]["categories"]["3"]["scoresWithExperts"],
            json!([{"score": 6.0, "expert_id": 7}])
        );
        assert_eq!(
            results[0]["categories"]["3"]["scoresWithExperts"],
            json!([{"score": 8.0, "expert_id": 9}])
        );
    }

    #[test]
    fn empty_output_goes_to_stdout() {
        assert!(write_summary(&Some(String::new()), "{}").is_ok());
        assert!(write_summary(&Some("stdout".to_string()), "{}").is_ok());
    }

    #[test]
    fn missing_input() {
        assert!(run_contest(&RunSettings::default()).is_err());
    }
}
