mod config;
use log::{debug, info, warn};

use std::collections::HashMap;

pub use crate::config::*;

pub mod builder;

/// The values of the completion column that mark a response as finished,
/// after trimming and lowercasing.
pub const TRUTHY_VALUES: [&str; 5] = ["true", "1", "yes", "y", "t"];

/// Every bucket column contains this marker in its name.
pub const GROUP_MARKER: &str = "Groups";

/// Runs the ranking over a survey table.
///
/// The steps are, in order:
/// * keep the completed responses only (see [`filter_completed`])
/// * find the column of each bucket (see [`resolve_columns`])
/// * count the mentions of each course in each bucket
/// * score and rank the courses (see [`rank_courses`])
///
/// Any failure stops the processing; there is no partial result.
pub fn run_ranking(
    table: &SurveyTable,
    rules: &RankingRules,
) -> Result<RankingResult, RankingErrors> {
    info!(
        "Processing {:?} rows, {:?} columns, rules: {:?}",
        table.len(),
        table.columns.len(),
        rules
    );

    let completed = filter_completed(table, &rules.completion_column)?;
    let num_responses = completed.len() as u64;
    info!(
        "Included responses: {} (out of {} rows)",
        num_responses,
        table.len()
    );

    let columns = resolve_columns(&completed.columns)?;
    info!("Resolved bucket columns: {:?}", columns);

    let tallies = tally_table(&completed, &columns)?;
    let entries = rank_courses(&tallies, num_responses, &rules.weights)?;
    info!("Ranked {} courses", entries.len());

    Ok(RankingResult {
        entries,
        num_responses,
        num_rows_read: table.len() as u64,
        columns: Some(columns),
    })
}

/// Interprets the content of a completion cell.
///
/// A missing cell is read as the text "nan", which is not truthy.
pub fn is_finished(cell: Option<&str>) -> bool {
    let normalized = cell.unwrap_or("nan").trim().to_lowercase();
    TRUTHY_VALUES.contains(&normalized.as_str())
}

/// Keeps the rows whose completion column is truthy, in their original order.
///
/// If the table has no completion column, all the rows are kept.
/// Returns an error if no row is left.
pub fn filter_completed(
    table: &SurveyTable,
    completion_column: &str,
) -> Result<SurveyTable, RankingErrors> {
    let mut res = SurveyTable::new(table.columns.clone());
    match table.column_index(completion_column) {
        Some(col_idx) => {
            for (idx, row) in table.rows().iter().enumerate() {
                let cell = row[col_idx].as_deref();
                if is_finished(cell) {
                    res.push_row(row.clone());
                } else {
                    debug!("filter_completed: dropping row {}: {:?}", idx, cell);
                }
            }
        }
        None => {
            warn!(
                "No column named {:?}: all {} rows are considered complete",
                completion_column,
                table.len()
            );
            for row in table.rows() {
                res.push_row(row.clone());
            }
        }
    }
    if res.is_empty() {
        return Err(RankingErrors::EmptyDataset);
    }
    Ok(res)
}

/// Finds the only column whose name contains both the group marker and the keyword.
pub fn find_group_column(columns: &[String], keyword: &str) -> Result<String, RankingErrors> {
    let matches: Vec<String> = columns
        .iter()
        .filter(|c| c.contains(GROUP_MARKER) && c.contains(keyword))
        .cloned()
        .collect();
    debug!("find_group_column: {:?} -> {:?}", keyword, matches);
    match matches.as_slice() {
        [col] => Ok(col.clone()),
        _ => Err(RankingErrors::AmbiguousColumn {
            keyword: keyword.to_string(),
            matches,
        }),
    }
}

pub fn resolve_columns(columns: &[String]) -> Result<ResolvedColumns, RankingErrors> {
    Ok(ResolvedColumns {
        most: find_group_column(columns, Bucket::Most.keyword())?,
        neutral: find_group_column(columns, Bucket::Neutral.keyword())?,
        least: find_group_column(columns, Bucket::Least.keyword())?,
    })
}

/// Splits the content of a bucket cell into course names.
///
/// Names are separated by commas and trimmed. Empty names are dropped, duplicates are kept.
pub fn split_courses(cell: Option<&str>) -> Vec<String> {
    match cell {
        None => Vec::new(),
        Some(s) => s
            .split(',')
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .collect(),
    }
}

/// Adds one mention of each course to the given bucket.
pub(crate) fn add_mentions(
    tallies: &mut HashMap<String, CourseTally>,
    bucket: Bucket,
    courses: &[String],
) {
    for course in courses {
        tallies
            .entry(course.clone())
            .or_insert_with(CourseTally::default)
            .increment(bucket);
    }
}

fn tally_table(
    table: &SurveyTable,
    columns: &ResolvedColumns,
) -> Result<HashMap<String, CourseTally>, RankingErrors> {
    let mut col_indexes: Vec<(Bucket, usize)> = Vec::new();
    for bucket in Bucket::ALL {
        let name = columns.get(bucket);
        // Resolved from the same header.
        let idx = table
            .column_index(name)
            .ok_or_else(|| RankingErrors::AmbiguousColumn {
                keyword: bucket.keyword().to_string(),
                matches: Vec::new(),
            })?;
        col_indexes.push((bucket, idx));
    }

    let mut tallies: HashMap<String, CourseTally> = HashMap::new();
    for (idx, row) in table.rows().iter().enumerate() {
        for (bucket, col_idx) in col_indexes.iter() {
            let courses = split_courses(row[*col_idx].as_deref());
            debug!("tally_table: row {} {:?}: {:?}", idx, bucket, courses);
            add_mentions(&mut tallies, *bucket, &courses);
        }
    }
    debug!("tally_table: {} courses", tallies.len());
    Ok(tallies)
}

/// The order of the ranking: by decreasing score, then decreasing number of mentions
/// in the "most" bucket, then in the "neutral" bucket, then by course name.
pub fn compare_entries(a: &RankingEntry, b: &RankingEntry) -> std::cmp::Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.most.cmp(&a.most))
        .then_with(|| b.neutral.cmp(&a.neutral))
        .then_with(|| a.course.cmp(&b.course))
}

/// Scores all the courses and sorts them into a ranking.
///
/// Arguments:
/// * `tallies` the mentions of each course
/// * `num_responses` the number of included responses. It is the denominator of every score.
/// * `weights` the weight of each bucket
pub fn rank_courses(
    tallies: &HashMap<String, CourseTally>,
    num_responses: u64,
    weights: &ScoreWeights,
) -> Result<Vec<RankingEntry>, RankingErrors> {
    if num_responses == 0 {
        return Err(RankingErrors::EmptyDataset);
    }
    if tallies.is_empty() {
        return Err(RankingErrors::NoCoursesFound);
    }

    let mut entries: Vec<RankingEntry> = Vec::with_capacity(tallies.len());
    for (course, tally) in tallies.iter() {
        let weighted = weights
            .weighted_sum(tally)
            .ok_or_else(|| RankingErrors::ScoreOverflow {
                course: course.clone(),
            })?;
        let score = Score::new(weighted, num_responses).ok_or(RankingErrors::EmptyDataset)?;
        entries.push(RankingEntry {
            rank: 0,
            course: course.clone(),
            score,
            most: tally.most,
            neutral: tally.neutral,
            least: tally.least,
            total: num_responses,
        });
    }
    entries.sort_by(compare_entries);
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.rank = (idx + 1) as u32;
        debug!(
            "rank_courses: {} {:?} score: {:.4} ({}/{}/{})",
            entry.rank,
            entry.course,
            entry.score.value(),
            entry.most,
            entry.neutral,
            entry.least
        );
    }
    Ok(entries)
}

const TABLE_HEADER: [&str; 7] = ["rank", "course", "score", "most", "neutral", "least", "N"];

/// Renders ranking entries as a plain text table, one line per entry, with a header line.
///
/// All the columns are right-aligned. The score is rounded to 2 decimals.
pub fn format_ranking_table(entries: &[RankingEntry]) -> String {
    let mut lines: Vec<Vec<String>> = vec![TABLE_HEADER.iter().map(|s| s.to_string()).collect()];
    for e in entries {
        lines.push(vec![
            e.rank.to_string(),
            e.course.clone(),
            format!("{:.2}", e.score.value()),
            e.most.to_string(),
            e.neutral.to_string(),
            e.least.to_string(),
            e.total.to_string(),
        ]);
    }

    let mut widths = [0usize; 7];
    for line in lines.iter() {
        for (w, cell) in widths.iter_mut().zip(line.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut res = String::new();
    for line in lines.iter() {
        let cells: Vec<String> = line
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| format!("{:>width$}", cell, width = *w))
            .collect();
        res.push_str(cells.join("  ").as_str());
        res.push('\n');
    }
    res
}
