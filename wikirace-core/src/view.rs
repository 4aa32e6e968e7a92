use wikirace_client::SearchResponse;

/// The four response fields, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub solution: String,
    pub articles_checked: String,
    pub path_length: String,
    pub time_taken: String,
}

impl Summary {
    /// Label/value pairs in display order.
    pub fn lines(&self) -> [(&'static str, &str); 4] {
        [
            ("Solution", self.solution.as_str()),
            ("Articles Checked", self.articles_checked.as_str()),
            ("Path Length", self.path_length.as_str()),
            ("Time Taken", self.time_taken.as_str()),
        ]
    }
}

impl From<&SearchResponse> for Summary {
    fn from(response: &SearchResponse) -> Self {
        Self {
            solution: response.solution_display(),
            articles_checked: response.articles_checked.to_string(),
            path_length: response.path_length.to_string(),
            time_taken: response.time_taken.to_string(),
        }
    }
}

/// Region that receives the textual summary of a solved search.
pub trait ResultsRegion {
    /// Replace whatever the region currently shows.
    fn show_summary(&mut self, summary: &Summary);
}
