//! Merging search-listing rows into one [`Individual`] per person.

use std::collections::HashMap;

use regex::Regex;

use crate::error::DisclosureError;
use crate::model::{Individual, IndividualKey, Position};

/// Marker of scanned paper filings, which have no machine-readable table.
pub const PAPER_MARKER: &str = "/paper/";

/// One row of the search listing after its HTML cells are decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRow {
    pub first_name: String,
    pub last_name: String,
    pub office_text: String,
    pub link: String,
}

impl SearchRow {
    pub fn is_paper(&self) -> bool {
        is_paper_link(&self.link)
    }
}

pub fn is_paper_link(link: &str) -> bool {
    link.contains(PAPER_MARKER)
}

/// Compiled patterns for decoding listing rows. Build once per run.
pub struct RowParser {
    position: Regex,
    href: Regex,
}

impl RowParser {
    pub fn new() -> Result<Self, DisclosureError> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| DisclosureError::Parse(format!("regex compile error: {}", e)))
        };
        Ok(Self {
            position: compile(r"(?i)(Senator|Candidate)")?,
            href: compile(r#"href="([^"]+)""#)?,
        })
    }

    /// Decodes `[first_name, last_name, office_text, link_html, date_received]`.
    pub fn parse(&self, columns: &[String]) -> Result<SearchRow, DisclosureError> {
        let [first, last, office, link_html, ..] = columns else {
            return Err(DisclosureError::Parse(format!(
                "search row has {} columns, expected at least 4",
                columns.len()
            )));
        };

        let link = self
            .href
            .captures(link_html)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| DisclosureError::Parse(format!("no link in {:?}", link_html)))?;
        Ok(SearchRow {
            first_name: title_case(first),
            last_name: title_case(last),
            office_text: office.trim().to_string(),
            link,
        })
    }

    /// Finds "Senator" or "Candidate" anywhere in the office text.
    pub fn position(&self, office_text: &str) -> Position {
        match self.position.captures(office_text).and_then(|cap| cap.get(1)) {
            Some(m) if m.as_str().eq_ignore_ascii_case("senator") => Position::Senator,
            Some(_) => Position::Candidate,
            None => Position::Unknown,
        }
    }
}

/// Title-cases a name the way the listing's consumers expect: each letter
/// that follows a non-letter is upper-cased, all others lower-cased
/// (`" o'BRIEN-smith "` becomes `"O'Brien-Smith"`).
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_is_letter = false;
    for ch in name.trim().chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// What [`IndividualRegistry::ingest`] did with a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ingested {
    /// First sighting of this person.
    Created,
    /// Known person, new link appended.
    Appended,
    /// Known person, link already recorded.
    DuplicateLink,
    /// Paper filing; nothing changed.
    SkippedPaper,
}

/// Per-page tally returned by [`IndividualRegistry::ingest_page`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub created: usize,
    pub appended: usize,
    pub duplicates: usize,
    pub paper: usize,
    pub malformed: usize,
}

/// Insertion-ordered set of individuals keyed by normalized name.
#[derive(Debug, Default)]
pub struct IndividualRegistry {
    individuals: Vec<Individual>,
    index: HashMap<IndividualKey, usize>,
}

impl IndividualRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from previously saved individuals, merging
    /// repeated names and dropping paper links.
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        let mut registry = Self::new();
        for individual in individuals {
            let links: Vec<String> = individual
                .links
                .into_iter()
                .filter(|link| !is_paper_link(link))
                .collect();
            let key = IndividualKey {
                first_name: title_case(&individual.first_name),
                last_name: title_case(&individual.last_name),
            };
            let idx = registry.entry(key, individual.position);
            for link in links {
                registry.push_link(idx, link);
            }
        }
        registry
    }

    /// Records one listing row. Paper filings are skipped without touching
    /// the registry.
    pub fn ingest(&mut self, row: SearchRow, position: Position) -> Ingested {
        if row.is_paper() {
            tracing::debug!(
                "Skipping paper filing for {} {}",
                row.first_name,
                row.last_name
            );
            return Ingested::SkippedPaper;
        }

        let key = IndividualKey {
            first_name: row.first_name,
            last_name: row.last_name,
        };
        let existed = self.index.contains_key(&key);
        let idx = self.entry(key, position);
        match (existed, self.push_link(idx, row.link)) {
            (false, _) => Ingested::Created,
            (true, true) => Ingested::Appended,
            (true, false) => Ingested::DuplicateLink,
        }
    }

    /// Decodes and records a page of raw listing rows. Rows that cannot be
    /// decoded are logged and counted, never fatal.
    pub fn ingest_page(&mut self, parser: &RowParser, rows: &[Vec<String>]) -> IngestStats {
        let mut stats = IngestStats::default();
        for columns in rows {
            let row = match parser.parse(columns) {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Skipping search row: {}", e);
                    stats.malformed += 1;
                    continue;
                }
            };
            let position = parser.position(&row.office_text);
            match self.ingest(row, position) {
                Ingested::Created => stats.created += 1,
                Ingested::Appended => stats.appended += 1,
                Ingested::DuplicateLink => stats.duplicates += 1,
                Ingested::SkippedPaper => stats.paper += 1,
            }
        }
        stats
    }

    fn entry(&mut self, key: IndividualKey, position: Position) -> usize {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.individuals.len();
        self.individuals.push(Individual {
            first_name: key.first_name.clone(),
            last_name: key.last_name.clone(),
            position,
            links: Vec::new(),
        });
        self.index.insert(key, idx);
        idx
    }

    fn push_link(&mut self, idx: usize, link: String) -> bool {
        let links = &mut self.individuals[idx].links;
        if links.contains(&link) {
            return false;
        }
        links.push(link);
        true
    }

    pub fn get(&self, key: &IndividualKey) -> Option<&Individual> {
        self.index.get(key).map(|&idx| &self.individuals[idx])
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Total number of filing links across all individuals.
    pub fn link_count(&self) -> usize {
        self.individuals.iter().map(|i| i.links.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(first: &str, last: &str, office: &str, href: &str) -> Vec<String> {
        vec![
            first.to_string(),
            last.to_string(),
            office.to_string(),
            format!(
                "<a href=\"{}\" target=\"_blank\">Periodic Transaction Report for 01/15/2020</a>",
                href
            ),
            "01/16/2020".to_string(),
        ]
    }

    fn key(first: &str, last: &str) -> IndividualKey {
        IndividualKey {
            first_name: first.into(),
            last_name: last.into(),
        }
    }

    #[test]
    fn title_case_names() {
        assert_eq!(title_case("  JOHN "), "John");
        assert_eq!(title_case("mary ann"), "Mary Ann");
        assert_eq!(title_case("o'BRIEN-smith"), "O'Brien-Smith");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn parse_row_extracts_names_and_link() {
        let parser = RowParser::new().unwrap();
        let row = parser
            .parse(&cols("JOHN", "doe", "Doe, John (Senator)", "/search/view/ptr/abc/"))
            .unwrap();
        assert_eq!(row.first_name, "John");
        assert_eq!(row.last_name, "Doe");
        assert_eq!(row.office_text, "Doe, John (Senator)");
        assert_eq!(row.link, "/search/view/ptr/abc/");
    }

    #[test]
    fn parse_row_without_link_fails() {
        let parser = RowParser::new().unwrap();
        let columns: Vec<String> = ["A", "B", "Senator", "no anchor"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(parser.parse(&columns).is_err());
        assert!(parser.parse(&columns[..2]).is_err());
    }

    #[test]
    fn position_is_case_insensitive() {
        let parser = RowParser::new().unwrap();
        assert_eq!(parser.position("Doe, John (senator)"), Position::Senator);
        assert_eq!(parser.position("CANDIDATE"), Position::Candidate);
        assert_eq!(parser.position("Former Member"), Position::Unknown);
    }

    #[test]
    fn repeated_names_merge_links() {
        let parser = RowParser::new().unwrap();
        let mut registry = IndividualRegistry::new();
        let rows = vec![
            cols("JOHN", "DOE", "Senator", "/search/view/ptr/1/"),
            cols("Jane", "Roe", "Candidate", "/search/view/annual/2/"),
            cols(" john", "doe ", "Senator", "/search/view/annual/3/"),
            cols("John", "Doe", "Senator", "/search/view/paper/4/"),
        ];
        let stats = registry.ingest_page(&parser, &rows);
        assert_eq!(
            stats,
            IngestStats {
                created: 2,
                appended: 1,
                duplicates: 0,
                paper: 1,
                malformed: 0,
            }
        );
        assert_eq!(registry.len(), 2);
        let john = registry.get(&key("John", "Doe")).unwrap();
        assert_eq!(
            john.links,
            vec!["/search/view/ptr/1/", "/search/view/annual/3/"]
        );
        assert_eq!(john.position, Position::Senator);
        assert_eq!(registry.link_count(), 3);
    }

    #[test]
    fn paper_only_person_is_never_created() {
        let parser = RowParser::new().unwrap();
        let mut registry = IndividualRegistry::new();
        let rows = vec![cols("Pat", "Paper", "Senator", "/search/view/paper/1/")];
        registry.ingest_page(&parser, &rows);
        assert!(registry.is_empty());
    }

    #[test]
    fn adjacent_paper_rows_are_all_skipped() {
        let parser = RowParser::new().unwrap();
        let mut registry = IndividualRegistry::new();
        let rows = vec![
            cols("A", "B", "Senator", "/search/view/ptr/1/"),
            cols("A", "B", "Senator", "/search/view/paper/2/"),
            cols("A", "B", "Senator", "/search/view/paper/3/"),
            cols("A", "B", "Senator", "/search/view/ptr/4/"),
        ];
        let stats = registry.ingest_page(&parser, &rows);
        assert_eq!(stats.paper, 2);
        assert_eq!(
            registry.get(&key("A", "B")).unwrap().links,
            vec!["/search/view/ptr/1/", "/search/view/ptr/4/"]
        );
    }

    #[test]
    fn same_link_twice_is_not_duplicated() {
        let parser = RowParser::new().unwrap();
        let mut registry = IndividualRegistry::new();
        let rows = vec![
            cols("A", "B", "Senator", "/search/view/ptr/1/"),
            cols("A", "B", "Senator", "/search/view/ptr/1/"),
        ];
        let stats = registry.ingest_page(&parser, &rows);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(registry.link_count(), 1);
    }

    #[test]
    fn malformed_rows_are_counted() {
        let parser = RowParser::new().unwrap();
        let mut registry = IndividualRegistry::new();
        let rows = vec![vec!["only".to_string()]];
        let stats = registry.ingest_page(&parser, &rows);
        assert_eq!(stats.malformed, 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn insertion_order_is_kept() {
        let parser = RowParser::new().unwrap();
        let mut registry = IndividualRegistry::new();
        let rows = vec![
            cols("Zed", "Zulu", "Senator", "/search/view/ptr/1/"),
            cols("Amy", "Alpha", "Senator", "/search/view/ptr/2/"),
        ];
        registry.ingest_page(&parser, &rows);
        let names: Vec<String> = registry.iter().map(|i| i.full_name()).collect();
        assert_eq!(names, vec!["Zed Zulu", "Amy Alpha"]);
    }

    #[test]
    fn from_individuals_merges_and_drops_paper() {
        let saved = vec![
            Individual {
                first_name: "JOHN".into(),
                last_name: "doe".into(),
                position: Position::Senator,
                links: vec![
                    "/search/view/paper/1/".into(),
                    "/search/view/paper/2/".into(),
                    "/search/view/ptr/3/".into(),
                ],
            },
            Individual {
                first_name: "John".into(),
                last_name: "Doe".into(),
                position: Position::Senator,
                links: vec!["/search/view/annual/4/".into()],
            },
        ];
        let registry = IndividualRegistry::from_individuals(saved);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(&key("John", "Doe")).unwrap().links,
            vec!["/search/view/ptr/3/", "/search/view/annual/4/"]
        );
    }
}
