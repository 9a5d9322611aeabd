use chrono::NaiveDate;

use crate::types::{FilerType, ReportType};

use super::{common::QueryCommon, Query};

/// Filters for `POST /search/report/data/`.
#[derive(Clone, Debug)]
pub struct SearchQuery {
    pub common: QueryCommon,
    pub report_types: Vec<ReportType>,
    pub filer_types: Vec<FilerType>,
    pub submitted_start: Option<NaiveDate>,
    pub submitted_end: Option<NaiveDate>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            common: QueryCommon::default(),
            report_types: vec![ReportType::Annual, ReportType::PeriodicTransaction],
            filer_types: vec![
                FilerType::Senator,
                FilerType::Candidate,
                FilerType::FormerSenator,
            ],
            submitted_start: NaiveDate::from_ymd_opt(2012, 1, 1),
            submitted_end: None,
            first_name: None,
            last_name: None,
        }
    }
}

impl Query for SearchQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_form(&self) -> Vec<(String, String)> {
        let mut form = Vec::new();
        self.common.append_to_form(&mut form);
        form.push(("report_types".into(), id_list(&self.report_types)));
        form.push(("filer_types".into(), id_list(&self.filer_types)));
        form.push((
            "submitted_start_date".into(),
            self.submitted_start
                .map(format_submitted)
                .unwrap_or_default(),
        ));
        form.push((
            "submitted_end_date".into(),
            self.submitted_end.map(format_submitted).unwrap_or_default(),
        ));
        form.push(("candidate_state".into(), String::new()));
        form.push(("senator_state".into(), String::new()));
        form.push(("office_id".into(), String::new()));
        form.push((
            "first_name".into(),
            self.first_name.clone().unwrap_or_default(),
        ));
        form.push((
            "last_name".into(),
            self.last_name.clone().unwrap_or_default(),
        ));
        form
    }
}

impl SearchQuery {
    /// Replaces the default report types with the given ones.
    pub fn with_report_types(mut self, report_types: &[ReportType]) -> Self {
        self.report_types = report_types.to_vec();
        self
    }

    /// Replaces the default filer types with the given ones.
    pub fn with_filer_types(mut self, filer_types: &[FilerType]) -> Self {
        self.filer_types = filer_types.to_vec();
        self
    }

    pub fn with_submitted_start(mut self, date: NaiveDate) -> Self {
        self.submitted_start = Some(date);
        self
    }

    pub fn with_submitted_end(mut self, date: NaiveDate) -> Self {
        self.submitted_end = Some(date);
        self
    }

    pub fn with_first_name(mut self, first_name: &str) -> Self {
        self.first_name = Some(first_name.to_string());
        self
    }

    pub fn with_last_name(mut self, last_name: &str) -> Self {
        self.last_name = Some(last_name.to_string());
        self
    }
}

/// Renders ids the way the portal's own form does: `[7, 11]`.
fn id_list<T: ToString>(items: &[T]) -> String {
    let ids: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    format!("[{}]", ids.join(", "))
}

fn format_submitted(date: NaiveDate) -> String {
    format!("{} 00:00:00", date.format("%m/%d/%Y"))
}
