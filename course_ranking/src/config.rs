// ********* Input data structures ***********

use std::cmp::Ordering;
use std::error::Error;
use std::fmt::Display;

/// The sentiment categories a respondent sorts the courses into.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Bucket {
    /// "Most Beneficial"
    Most,
    Neutral,
    /// "Least Beneficial"
    Least,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Most, Bucket::Neutral, Bucket::Least];

    /// The keyword that identifies the column of this bucket in the header of the survey.
    pub fn keyword(&self) -> &'static str {
        match self {
            Bucket::Most => "Most Beneficial",
            Bucket::Neutral => "Neutral",
            Bucket::Least => "Least Beneficial",
        }
    }
}

/// A survey export: the header of the first sheet and one row per respondent.
///
/// Cells are kept as text. A missing value (empty cell) is `None`.
/// All the rows have exactly as many cells as there are columns.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SurveyTable {
    pub columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl SurveyTable {
    pub fn new(columns: Vec<String>) -> SurveyTable {
        SurveyTable {
            columns,
            rows: Vec::new(),
        }
    }

    /// Adds a row. Short rows are padded with missing values and long rows are truncated
    /// to the width of the header.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The position of the column with exactly this name, if any.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }
}

// ******** Output data structures *********

/// Mentions of a course in each of the buckets.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct CourseTally {
    pub most: u64,
    pub neutral: u64,
    pub least: u64,
}

impl CourseTally {
    pub fn increment(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::Most => self.most += 1,
            Bucket::Neutral => self.neutral += 1,
            Bucket::Least => self.least += 1,
        }
    }

    pub fn get(&self, bucket: Bucket) -> u64 {
        match bucket {
            Bucket::Most => self.most,
            Bucket::Neutral => self.neutral,
            Bucket::Least => self.least,
        }
    }

    /// Total number of mentions across the buckets.
    pub fn mentions(&self) -> u64 {
        self.most + self.neutral + self.least
    }
}

/// The preference score of a course, kept as the exact fraction `weighted / total`.
///
/// Two scores are compared exactly, without going through floating point.
#[derive(Debug, Clone, Copy)]
pub struct Score {
    weighted: u64,
    // Never zero.
    total: u64,
}

impl Score {
    /// Returns None if `total` is zero.
    pub fn new(weighted: u64, total: u64) -> Option<Score> {
        if total == 0 {
            None
        } else {
            Some(Score { weighted, total })
        }
    }

    pub fn weighted(&self) -> u64 {
        self.weighted
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn value(&self) -> f64 {
        self.weighted as f64 / self.total as f64
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.weighted as u128 * other.total as u128;
        let rhs = other.weighted as u128 * self.total as u128;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

/// One line of the final ranking.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankingEntry {
    /// Starts at 1. No two entries share a rank.
    pub rank: u32,
    pub course: String,
    pub score: Score,
    pub most: u64,
    pub neutral: u64,
    pub least: u64,
    /// The number of included responses.
    pub total: u64,
}

/// The names of the columns that hold each bucket.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResolvedColumns {
    pub most: String,
    pub neutral: String,
    pub least: String,
}

impl ResolvedColumns {
    pub fn get(&self, bucket: Bucket) -> &str {
        match bucket {
            Bucket::Most => &self.most,
            Bucket::Neutral => &self.neutral,
            Bucket::Least => &self.least,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankingResult {
    /// Sorted by rank.
    pub entries: Vec<RankingEntry>,
    /// Rows kept after the completion filter (N).
    pub num_responses: u64,
    /// Rows present in the input before filtering.
    pub num_rows_read: u64,
    /// None when the result was not computed from a table.
    pub columns: Option<ResolvedColumns>,
}

/// Errors that prevent the ranking from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RankingErrors {
    /// Zero or more than one column matched the keyword of a bucket.
    AmbiguousColumn {
        keyword: String,
        matches: Vec<String>,
    },
    /// No response left after filtering.
    EmptyDataset,
    /// All the bucket cells were empty.
    NoCoursesFound,
    /// The weighted sum of the mentions of a course does not fit in 64 bits.
    ScoreOverflow { course: String },
}

impl Error for RankingErrors {}

impl Display for RankingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingErrors::AmbiguousColumn { keyword, matches } => write!(
                f,
                "Expected exactly one column containing '{}' and '{}', found {}: {:?}",
                crate::GROUP_MARKER,
                keyword,
                matches.len(),
                matches
            ),
            RankingErrors::EmptyDataset => write!(
                f,
                "No responses available after filtering. Cannot compute ranking."
            ),
            RankingErrors::NoCoursesFound => write!(f, "No course names found in ranking columns."),
            RankingErrors::ScoreOverflow { course } => write!(
                f,
                "The weighted score of course '{}' is too large. Use smaller weights.",
                course
            ),
        }
    }
}

// ********* Configuration **********

/// The weight of a mention in each bucket. The score of a course is the weighted sum of its
/// mentions divided by the number of included responses.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub most: u64,
    pub neutral: u64,
    pub least: u64,
}

impl ScoreWeights {
    pub const DEFAULT_WEIGHTS: ScoreWeights = ScoreWeights {
        most: 2,
        neutral: 1,
        least: 0,
    };

    /// The weighted sum of the mentions, or None if it overflows.
    pub fn weighted_sum(&self, tally: &CourseTally) -> Option<u64> {
        self.most
            .checked_mul(tally.most)?
            .checked_add(self.neutral.checked_mul(tally.neutral)?)?
            .checked_add(self.least.checked_mul(tally.least)?)
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights::DEFAULT_WEIGHTS
    }
}

pub const DEFAULT_COMPLETION_COLUMN: &str = "Finished";

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankingRules {
    pub weights: ScoreWeights,
    /// Rows are only kept if this column is truthy. If the table has no such column,
    /// all the rows are kept.
    pub completion_column: String,
}

impl Default for RankingRules {
    fn default() -> Self {
        RankingRules {
            weights: ScoreWeights::DEFAULT_WEIGHTS,
            completion_column: DEFAULT_COMPLETION_COLUMN.to_string(),
        }
    }
}
