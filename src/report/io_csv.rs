// Writing the ranking table, and comparing it with a reference.

use course_ranking::RankingEntry;
use log::{debug, warn};
use serde::Serialize;
use snafu::prelude::*;
use text_diff::print_diff;

use std::fs;
use std::path::Path;

use crate::report::*;

#[derive(Debug, Serialize)]
struct RankingRecord<'a> {
    rank: u32,
    course: &'a str,
    score: f64,
    most: u64,
    neutral: u64,
    least: u64,
    #[serde(rename = "N")]
    total: u64,
}

impl<'a> From<&'a RankingEntry> for RankingRecord<'a> {
    fn from(e: &'a RankingEntry) -> Self {
        RankingRecord {
            rank: e.rank,
            course: e.course.as_str(),
            score: e.score.value(),
            most: e.most,
            neutral: e.neutral,
            least: e.least,
            total: e.total,
        }
    }
}

/// Writes the full ranking, one line per course, with a header line.
/// The file is replaced if it exists.
pub fn write_ranking_csv(path: &Path, entries: &[RankingEntry]) -> ReportResult<()> {
    let path_s = display_path(path);
    let mut wtr = csv::Writer::from_path(path).context(WritingCsvSnafu {
        path: path_s.clone(),
    })?;
    for e in entries {
        wtr.serialize(RankingRecord::from(e))
            .context(WritingCsvSnafu {
                path: path_s.clone(),
            })?;
    }
    wtr.flush().context(WritingFileSnafu { path: path_s })?;
    Ok(())
}

/// Checks that the ranking written at `produced` has the same content as the reference file.
///
/// Line endings and trailing newlines are not significant. Differences are printed
/// to the standard output.
pub fn check_reference(produced: &Path, reference: &Path) -> ReportResult<()> {
    let produced_s = fs::read_to_string(produced).context(ReadingFileSnafu {
        path: display_path(produced),
    })?;
    let reference_s = fs::read_to_string(reference).context(ReadingFileSnafu {
        path: display_path(reference),
    })?;
    let produced_n = normalize_lines(&produced_s);
    let reference_n = normalize_lines(&reference_s);
    debug!(
        "check_reference: {} lines produced, {} lines in reference",
        produced_n.lines().count(),
        reference_n.lines().count()
    );
    if produced_n != reference_n {
        warn!("Found differences with the reference {:?}", reference);
        print_diff(reference_n.as_str(), produced_n.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: display_path(reference),
        }
        .fail();
    }
    Ok(())
}

fn normalize_lines(s: &str) -> String {
    s.replace("\r\n", "\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::io_common::test_dir;
    use course_ranking::builder::Builder;
    use course_ranking::ScoreWeights;

    fn sample() -> Vec<RankingEntry> {
        let mut builder = Builder::new(&ScoreWeights::DEFAULT_WEIGHTS);
        builder.add_response_text(Some("A, B"), None, Some("C"));
        builder.add_response_text(Some("A"), Some("B"), None);
        builder.add_response_text(None, Some("A, C"), Some("B"));
        builder.rank().unwrap().entries
    }

    const EXPECTED: &str = "rank,course,score,most,neutral,least,N
1,A,1.6666666666666667,2,1,0,3
2,B,1.0,1,1,1,3
3,C,0.3333333333333333,0,1,1,3
";

    #[test]
    fn ranking_table() {
        let dir = test_dir("csv-write");
        let p = dir.join("course_ranking.csv");
        write_ranking_csv(&p, &sample()).unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), EXPECTED);
    }

    #[test]
    fn course_with_quotes_is_escaped() {
        let dir = test_dir("csv-quote");
        let p = dir.join("course_ranking.csv");
        let mut builder = Builder::new(&ScoreWeights::DEFAULT_WEIGHTS);
        builder.add_response(&["Tax \"Research\"".to_string()], &[], &[]);
        write_ranking_csv(&p, &builder.rank().unwrap().entries).unwrap();
        let content = fs::read_to_string(&p).unwrap();
        assert_eq!(content.lines().nth(1), Some("1,\"Tax \"\"Research\"\"\",2.0,1,0,0,1"));
    }

    #[test]
    fn reference_matches() {
        let dir = test_dir("csv-reference-ok");
        let p = dir.join("course_ranking.csv");
        let r = dir.join("reference.csv");
        write_ranking_csv(&p, &sample()).unwrap();
        fs::write(&r, EXPECTED.replace('\n', "\r\n")).unwrap();
        check_reference(&p, &r).unwrap();
    }

    #[test]
    fn reference_differs() {
        let dir = test_dir("csv-reference-diff");
        let p = dir.join("course_ranking.csv");
        let r = dir.join("reference.csv");
        write_ranking_csv(&p, &sample()).unwrap();
        fs::write(&r, EXPECTED.replace("2,B,1.0", "2,B,1.5")).unwrap();
        let err = check_reference(&p, &r).unwrap_err();
        assert!(matches!(err, ReportError::ReferenceMismatch { .. }));
    }

    #[test]
    fn missing_reference() {
        let dir = test_dir("csv-reference-missing");
        let p = dir.join("course_ranking.csv");
        write_ranking_csv(&p, &sample()).unwrap();
        let err = check_reference(&p, &dir.join("nope.csv")).unwrap_err();
        assert!(matches!(err, ReportError::ReadingFile { .. }));
    }
}
