use log::{debug, info};

use course_ranking::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

pub mod chart;
pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;

use crate::report::config_reader::*;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Dataset not found: {path}"))]
    DatasetNotFound { path: String },
    #[snafu(display("Error opening workbook {path}"))]
    OpeningWorkbook {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("The workbook {path} has no sheet or no header row"))]
    EmptyWorkbook { path: String },
    #[snafu(display("{source}"))]
    Ranking { source: RankingErrors },
    #[snafu(display("Error opening config file {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing config file {path}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid setting {name}: {value}"))]
    InvalidSetting { name: String, value: String },
    #[snafu(display("Error creating output directory {path}"))]
    CreatingOutputDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading file {path}"))]
    ReadingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the ranking and the reference {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display("Error drawing chart {path}: {message}"))]
    Drawing { path: String, message: String },
}

pub type ReportResult<T> = Result<T, ReportError>;

pub(crate) fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// Runs the whole report: reads the survey, ranks the courses, writes the ranking table and
/// the chart, then prints a summary.
///
/// Nothing is written unless the ranking succeeded.
pub fn run_report(settings: &ReportSettings) -> ReportResult<RankingResult> {
    info!("Settings: {:?}", settings);
    let table = io_excel::read_survey(&settings.input_path)?;
    info!(
        "Read {} rows and {} columns from {:?}",
        table.len(),
        table.columns.len(),
        settings.input_path
    );

    let result = run_ranking(&table, &settings.rules).context(RankingSnafu {})?;
    info!(
        "Included responses: {} out of {} rows, {} courses",
        result.num_responses,
        result.num_rows_read,
        result.entries.len()
    );
    if let Some(cols) = &result.columns {
        info!("Bucket columns: {:?}", cols);
    }

    fs::create_dir_all(&settings.output_dir).context(CreatingOutputDirSnafu {
        path: display_path(&settings.output_dir),
    })?;

    let csv_path = settings.csv_path();
    io_csv::write_ranking_csv(&csv_path, &result.entries)?;
    info!("Wrote ranking table to {:?}", csv_path);

    let chart_entries = top_entries(&result.entries, settings.chart_top_count);
    let png_path = settings.png_path();
    chart::render_chart(
        &png_path,
        chart_entries,
        &settings.chart_title,
        &chart::x_axis_label(&settings.rules.weights),
    )?;
    info!("Wrote chart of {} courses to {:?}", chart_entries.len(), png_path);

    println!("Included responses (N): {}", result.num_responses);
    println!("Top {} courses:", settings.console_top_count);
    print!(
        "{}",
        format_ranking_table(top_entries(&result.entries, settings.console_top_count))
    );

    if let Some(reference_path) = &settings.reference_path {
        debug!("Comparing with reference {:?}", reference_path);
        io_csv::check_reference(&csv_path, reference_path)?;
    }

    Ok(result)
}

fn top_entries(entries: &[RankingEntry], count: usize) -> &[RankingEntry] {
    &entries[..count.min(entries.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::io_common::test_dir;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("data")
            .join(name)
    }

    #[test]
    fn writes_table_and_chart() {
        let dir = test_dir("report-ok");
        let settings = ReportSettings {
            input_path: fixture("exit_survey.xlsx"),
            output_dir: dir.join("outputs"),
            reference_path: Some(fixture("exit_survey_ranking.csv")),
            ..ReportSettings::default()
        };
        let res = run_report(&settings).unwrap();
        assert_eq!(res.num_rows_read, 4);
        assert_eq!(res.num_responses, 3);
        let names: Vec<&str> = res.entries.iter().map(|e| e.course.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        let csv = fs::read_to_string(settings.csv_path()).unwrap();
        assert_eq!(
            csv,
            fs::read_to_string(fixture("exit_survey_ranking.csv")).unwrap()
        );
        let png = fs::read(settings.png_path()).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn empty_buckets_write_nothing() {
        let dir = test_dir("report-empty");
        let out = dir.join("outputs");
        let settings = ReportSettings {
            input_path: fixture("empty_buckets.xlsx"),
            output_dir: out.clone(),
            ..ReportSettings::default()
        };
        let err = run_report(&settings).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Ranking {
                source: RankingErrors::NoCoursesFound
            }
        ));
        assert!(!out.exists());
    }

    #[test]
    fn missing_dataset_writes_nothing() {
        let dir = test_dir("missing");
        let out = dir.join("outputs");
        let settings = ReportSettings {
            input_path: dir.join("nope.xlsx"),
            output_dir: out.clone(),
            ..ReportSettings::default()
        };
        let err = run_report(&settings).unwrap_err();
        assert!(matches!(err, ReportError::DatasetNotFound { .. }));
        assert!(err.to_string().contains("nope.xlsx"));
        assert!(!out.exists());
    }

    #[test]
    fn top_entries_clamps() {
        let mut builder = builder::Builder::new(&ScoreWeights::DEFAULT_WEIGHTS);
        builder.add_response_text(Some("A, B, C"), None, None);
        let res = builder.rank().unwrap();
        assert_eq!(top_entries(&res.entries, 2).len(), 2);
        assert_eq!(top_entries(&res.entries, 15).len(), 3);
        assert_eq!(top_entries(&res.entries, 0).len(), 0);
    }

    #[test]
    fn ranking_errors_are_wrapped() {
        let err: ReportError = Err::<(), _>(RankingErrors::NoCoursesFound)
            .context(RankingSnafu {})
            .unwrap_err();
        assert_eq!(err.to_string(), "No course names found in ranking columns.");
    }
}
