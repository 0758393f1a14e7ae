pub use crate::config::*;

use std::collections::HashMap;

use log::info;

/// A builder for adding responses without going through a survey table.
///
/// All the responses added to the builder are considered complete.
///
/// ```
/// pub use course_ranking::builder::Builder;
/// pub use course_ranking::ScoreWeights;
/// # use course_ranking::RankingErrors;
///
/// let mut builder = Builder::new(&ScoreWeights::DEFAULT_WEIGHTS);
///
/// builder.add_response(&["ACC 502".to_string()], &[], &["ACC 501".to_string()]);
/// builder.add_response_text(Some("ACC 502, ACC 503"), None, Some("ACC 501"));
///
/// let res = builder.rank()?;
/// assert_eq!(res.entries[0].course, "ACC 502");
/// # Ok::<(), RankingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _weights: ScoreWeights,
    pub(crate) _tallies: HashMap<String, CourseTally>,
    pub(crate) _num_responses: u64,
}

impl Builder {
    pub fn new(weights: &ScoreWeights) -> Builder {
        Builder {
            _weights: *weights,
            _tallies: HashMap::new(),
            _num_responses: 0,
        }
    }

    /// Adds a response with the courses already separated.
    ///
    /// Course names are trimmed and empty names are dropped, as when splitting a cell.
    /// A course may appear several times.
    pub fn add_response(&mut self, most: &[String], neutral: &[String], least: &[String]) {
        crate::add_mentions(&mut self._tallies, Bucket::Most, &clean_names(most));
        crate::add_mentions(&mut self._tallies, Bucket::Neutral, &clean_names(neutral));
        crate::add_mentions(&mut self._tallies, Bucket::Least, &clean_names(least));
        self._num_responses += 1;
    }

    /// Adds a response with the content of each bucket cell, as found in a survey export.
    pub fn add_response_text(
        &mut self,
        most: Option<&str>,
        neutral: Option<&str>,
        least: Option<&str>,
    ) {
        self.add_response(
            &crate::split_courses(most),
            &crate::split_courses(neutral),
            &crate::split_courses(least),
        )
    }

    pub fn num_responses(&self) -> u64 {
        self._num_responses
    }

    pub fn rank(&self) -> Result<RankingResult, RankingErrors> {
        info!(
            "Builder: ranking {} courses from {} responses",
            self._tallies.len(),
            self._num_responses
        );
        let entries = crate::rank_courses(&self._tallies, self._num_responses, &self._weights)?;
        Ok(RankingResult {
            entries,
            num_responses: self._num_responses,
            num_rows_read: self._num_responses,
            columns: None,
        })
    }
}

fn clean_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(|n| n.to_string())
        .collect()
}
