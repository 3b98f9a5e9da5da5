// Primitives for reading CSV files.

use crate::scoring::{
    io_common::{assemble_score, is_blank_row, make_default_id},
    *,
};

pub fn read_csv_scores(path: &str, cfs: &FileSource) -> ContestResult<Vec<ParsedScore>> {
    let default_id = make_default_id(path);
    let first_row = cfs.first_score_row_index()?;
    let columns = cfs.columns()?;

    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut res: Vec<ParsedScore> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The index starts at 1 to respect most conventions in the excel world
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { path })?;
        if lineno < first_row {
            continue;
        }
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        if is_blank_row(&cells) {
            debug!("read_csv_scores: lineno: {:?} blank row", lineno);
            continue;
        }
        let ps = assemble_score(default_id(lineno), &cells, &columns)
            .context(LineTooShortSnafu { lineno })?;
        debug!("read_csv_scores: lineno: {:?} score: {:?}", lineno, &ps);
        res.push(ps);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_csv(content: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("scores.csv");
        fs::write(&p, content).unwrap();
        let path = p.display().to_string();
        (dir, path)
    }

    #[test]
    fn skips_header_and_blank_rows() {
        let (_dir, path) = write_csv("team,expert,category,score\nRed, J1 ,Design,7\n,,,\nBlue,J2,Design,\n");
        let cfs = FileSource::with_defaults("csv", &path);
        let res = read_csv_scores(&path, &cfs).unwrap();
        assert_eq!(
            res,
            vec![
                ParsedScore {
                    id: "scores.csv-00000002".to_string(),
                    team: "Red".to_string(),
                    expert: "J1".to_string(),
                    category: "Design".to_string(),
                    score: "7".to_string(),
                },
                ParsedScore {
                    id: "scores.csv-00000004".to_string(),
                    team: "Blue".to_string(),
                    expert: "J2".to_string(),
                    category: "Design".to_string(),
                    score: "".to_string(),
                },
            ]
        );
    }

    #[test]
    fn custom_columns() {
        let (_dir, path) = write_csv("# exported\nscore;x\n8.5,Design,Red,J3\n");
        let mut cfs = FileSource::with_defaults("csv", &path);
        cfs.first_score_row_index = Some(json!(3));
        cfs.score_column_index = Some(json!("A"));
        cfs.category_column_index = Some(json!(2));
        cfs.team_column_index = Some(json!(3));
        cfs.expert_column_index = Some(json!("D"));
        let res = read_csv_scores(&path, &cfs).unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].team, "Red");
        assert_eq!(res[0].expert, "J3");
        assert_eq!(res[0].category, "Design");
        assert_eq!(res[0].score, "8.5");
    }

    #[test]
    fn short_rows_are_errors() {
        let (_dir, path) = write_csv("team,expert,category,score\nRed,J1,Design\n");
        let cfs = FileSource::with_defaults("csv", &path);
        assert!(matches!(
            read_csv_scores(&path, &cfs),
            Err(ContestError::LineTooShort { lineno: 2 })
        ));
    }

    #[test]
    fn missing_file() {
        let cfs = FileSource::with_defaults("csv", "/nonexistent/scores.csv");
        assert!(matches!(
            read_csv_scores("/nonexistent/scores.csv", &cfs),
            Err(ContestError::CsvOpen { .. })
        ));
    }
}
