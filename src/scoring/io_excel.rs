use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::scoring::{
    io_common::{assemble_score, is_blank_row, make_default_id},
    *,
};

pub fn read_excel_scores(path: &str, cfs: &FileSource) -> ContestResult<Vec<ParsedScore>> {
    let default_id = make_default_id(path);
    let first_row = cfs.first_score_row_index()?;
    let columns = cfs.columns()?;

    let wrange = get_range(path, cfs)?;
    // The range starts at the first non-empty cell, not at A1.
    let (row_offset, col_offset) = wrange
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut res: Vec<ParsedScore> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let lineno = row_offset + idx + 1;
        if lineno < first_row {
            continue;
        }
        let mut cells: Vec<String> = vec![String::new(); col_offset];
        for cell in row.iter() {
            let s = cell_to_string(cell).with_context(|| ExcelWrongCellTypeSnafu {
                path,
                lineno,
                content: format!("{:?}", cell),
            })?;
            cells.push(s);
        }
        if is_blank_row(&cells) {
            continue;
        }
        let ps = assemble_score(default_id(lineno), &cells, &columns)
            .context(LineTooShortSnafu { lineno })?;
        debug!("read_excel_scores: lineno: {:?} score: {:?}", lineno, &ps);
        res.push(ps);
    }
    Ok(res)
}

// Numbers are written without a trailing ".0" when they are integral, so that
// ids typed in a spreadsheet match the ids of the configuration.
fn cell_to_string(cell: &DataType) -> Option<String> {
    match cell {
        DataType::Empty => Some(String::new()),
        DataType::String(s) => Some(s.clone()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
            Some(format!("{}", *f as i64))
        }
        DataType::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

fn get_range(path: &str, cfs: &FileSource) -> ContestResult<Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "read_excel_scores: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_excel_scores: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => AmbiguousWorksheetSnafu { path }.fail(),
        }
    }
}
