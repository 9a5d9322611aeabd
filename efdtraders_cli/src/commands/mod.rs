pub mod filing;
pub mod individuals;
pub mod portfolios;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use efdtraders_lib::validation;
use efdtraders_lib::{Client, Query, SearchQuery, Settings};
use indicatif::{ProgressBar, ProgressStyle};

const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}";

/// Listing filters and run tuning shared by the commands that page through
/// the search listing. Flags override the environment settings.
#[derive(Args)]
pub struct RunArgs {
    /// Report type: annual or ptr (repeatable; default both)
    #[arg(long = "report-type")]
    pub report_types: Vec<String>,

    /// Filer type: senator, candidate, former-senator (repeatable; default all)
    #[arg(long = "filer-type")]
    pub filer_types: Vec<String>,

    /// Earliest submission date, MM/DD/YYYY
    #[arg(long)]
    pub since: Option<String>,

    /// Latest submission date, MM/DD/YYYY
    #[arg(long)]
    pub until: Option<String>,

    /// Only filers with this first name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Only filers with this last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Rows per listing page (1-100)
    #[arg(long)]
    pub page_size: Option<i64>,

    /// Pause between requests in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Directory the timestamped JSON files are written to
    #[arg(long, default_value = "data")]
    pub out_dir: PathBuf,
}

impl RunArgs {
    /// Environment settings with this command's overrides applied.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::from_env()?;
        if let Some(size) = self.page_size {
            settings.page_size = validation::validate_page_size(size)?;
        }
        if let Some(ms) = self.delay_ms {
            settings.request_delay = Duration::from_millis(validation::validate_delay_ms(ms)?);
        }
        if let Some(ref since) = self.since {
            settings.submitted_start = validation::validate_submitted_date(since)?;
        }
        Ok(settings)
    }

    pub fn query(&self, settings: &Settings) -> Result<SearchQuery> {
        let mut query = SearchQuery::default()
            .with_submitted_start(settings.submitted_start)
            .with_length(settings.page_size);

        if let Some(ref until) = self.until {
            let end = validation::validate_submitted_date(until)?;
            if end < settings.submitted_start {
                bail!(
                    "--until {} is before the submission start {}",
                    end.format("%m/%d/%Y"),
                    settings.submitted_start.format("%m/%d/%Y")
                );
            }
            query = query.with_submitted_end(end);
        }
        if let Some(name) = non_blank(&self.first_name) {
            query = query.with_first_name(name);
        }
        if let Some(name) = non_blank(&self.last_name) {
            query = query.with_last_name(name);
        }

        if !self.report_types.is_empty() {
            let types = self
                .report_types
                .iter()
                .map(|t| validation::validate_report_type(t))
                .collect::<Result<Vec<_>, _>>()?;
            query = query.with_report_types(&types);
        }

        if !self.filer_types.is_empty() {
            let types = self
                .filer_types
                .iter()
                .map(|t| validation::validate_filer_type(t))
                .collect::<Result<Vec<_>, _>>()?;
            query = query.with_filer_types(&types);
        }

        Ok(query)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn client(settings: &Settings) -> Result<Client> {
    Ok(Client::with_base_url(
        &settings.base_url,
        settings.session.clone(),
    )?)
}

pub fn progress_bar(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(ProgressStyle::with_template(PROGRESS_TEMPLATE)?);
    pb.set_message(message.to_string());
    Ok(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::from_lookup(|key| match key {
            "CSRF_TOKEN" => Some("tok".to_string()),
            "SESSION_ID" => Some("sid".to_string()),
            "EFD_SUBMITTED_START" => Some("01/01/2020".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn args() -> RunArgs {
        RunArgs {
            report_types: Vec::new(),
            filer_types: Vec::new(),
            since: None,
            until: None,
            first_name: None,
            last_name: None,
            page_size: None,
            delay_ms: None,
            out_dir: PathBuf::from("data"),
        }
    }

    fn value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn name_and_end_date_flags_reach_the_form() {
        let mut run = args();
        run.until = Some("06/30/2021".to_string());
        run.first_name = Some(" Jane ".to_string());
        run.last_name = Some("Roe".to_string());
        let form = run.query(&settings()).unwrap().to_form();
        assert_eq!(value(&form, "submitted_end_date"), Some("06/30/2021 00:00:00"));
        assert_eq!(value(&form, "first_name"), Some("Jane"));
        assert_eq!(value(&form, "last_name"), Some("Roe"));
    }

    #[test]
    fn blank_names_are_not_sent() {
        let mut run = args();
        run.first_name = Some("   ".to_string());
        let form = run.query(&settings()).unwrap().to_form();
        assert_eq!(value(&form, "first_name"), Some(""));
        assert_eq!(value(&form, "submitted_end_date"), Some(""));
    }

    #[test]
    fn end_date_before_start_is_rejected() {
        let mut run = args();
        run.until = Some("12/31/2019".to_string());
        assert!(run.query(&settings()).is_err());
    }
}
