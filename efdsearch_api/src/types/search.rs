use serde::{Deserialize, Serialize};

/// Raw cells of one listing row:
/// `[first_name, last_name, office_text, link_html, date_received]`.
pub type SearchRowColumns = Vec<String>;

/// JSON body returned by `POST /search/report/data/`.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// `"ok"` on success.
    pub result: String,

    /// Number of rows matching the filters across all pages.
    pub records_total: i64,

    #[serde(default)]
    pub records_filtered: i64,

    /// Rows of the requested page.
    #[serde(default)]
    pub data: Vec<SearchRowColumns>,
}

impl SearchResponse {
    pub fn is_ok(&self) -> bool {
        self.result == "ok"
    }
}
