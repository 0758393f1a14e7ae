// Reading the survey export from a workbook.

use calamine::{open_workbook_auto, DataType, Range, Reader};
use course_ranking::SurveyTable;
use log::debug;
use snafu::prelude::*;

use std::path::Path;

use crate::report::io_common::{cell_to_text, header_name};
use crate::report::*;

/// Reads the first sheet of the workbook at `path`.
///
/// The first row is the header. The format (xlsx, xls, ods, ...) is guessed from the extension.
pub fn read_survey(path: &Path) -> ReportResult<SurveyTable> {
    let path_s = display_path(path);
    if !path.exists() {
        return DatasetNotFoundSnafu { path: path_s }.fail();
    }
    let mut workbook =
        open_workbook_auto(path).context(OpeningWorkbookSnafu { path: path_s.clone() })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyWorkbookSnafu {
            path: path_s.clone(),
        })?
        .context(OpeningWorkbookSnafu {
            path: path_s.clone(),
        })?;
    debug!(
        "read_survey: path: {:?} sheet size: {:?}",
        path_s,
        wrange.get_size()
    );
    table_from_range(&wrange).context(EmptyWorkbookSnafu { path: path_s })
}

/// Builds the table out of a sheet. Returns None if the sheet has no header row.
pub fn table_from_range(wrange: &Range<DataType>) -> Option<SurveyTable> {
    let mut iter = wrange.rows();
    let header = iter.next()?;
    debug!("table_from_range: header: {:?}", header);
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, c)| header_name(idx, c))
        .collect();

    let mut table = SurveyTable::new(columns);
    for (idx, row) in iter.enumerate() {
        debug!("table_from_range: row {}: {:?}", idx, row);
        table.push_row(row.iter().map(cell_to_text).collect());
    }
    Some(table)
}
