//! Locating the data table inside a filing page.
//!
//! Periodic transaction reports put their transactions in the first table
//! of the page. Annual reports have several numbered parts; holdings live in
//! the table under the "Part 3. Assets" heading, and only rows marked with
//! the `nowrap` class are data rows.

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::DisclosureError;

/// Heading text that introduces the holdings section of an annual report.
pub const ASSETS_HEADING: &str = "Part 3. Assets";

/// Class the portal puts on data rows of annual-report tables.
const DATA_ROW_CLASS: &str = "nowrap";

/// How many containers above the assets heading may hold its table.
const MAX_HEADING_DEPTH: usize = 2;

/// Cell texts of one table row, in column order.
pub type RawRow = Vec<String>;

/// Report layout, chosen once per filing link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    /// Periodic transaction report (`/ptr/` links).
    Periodic,
    /// Annual report (`/annual/` links).
    Annual,
}
impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ReportKind::Periodic => "ptr",
                ReportKind::Annual => "annual",
            }
        )
    }
}

impl ReportKind {
    /// Picks the layout from the marker in the link, or `None` for links
    /// that are neither kind.
    pub fn from_link(link: &str) -> Option<Self> {
        let link = link.to_ascii_lowercase();
        if link.contains("ptr") {
            Some(ReportKind::Periodic)
        } else if link.contains("annual") {
            Some(ReportKind::Annual)
        } else {
            None
        }
    }
}

/// A parsed filing page.
pub struct FilingDocument {
    html: Html,
}

impl FilingDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All text of the page, one space between text nodes.
    pub fn page_text(&self) -> String {
        self.html
            .root_element()
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns the candidate data rows for the given report layout.
    pub fn rows(&self, kind: ReportKind) -> Result<Vec<RawRow>, DisclosureError> {
        match kind {
            ReportKind::Periodic => self.periodic_rows(),
            ReportKind::Annual => self.annual_rows(),
        }
    }

    fn periodic_rows(&self) -> Result<Vec<RawRow>, DisclosureError> {
        let table_sel = selector("table")?;
        let row_sel = selector("tr")?;
        let table = self
            .html
            .select(&table_sel)
            .next()
            .ok_or_else(|| DisclosureError::TableNotFound("transactions table".into()))?;
        table_rows(table, &row_sel)
    }

    fn annual_rows(&self) -> Result<Vec<RawRow>, DisclosureError> {
        let table_sel = selector("table")?;
        let row_sel = selector(&format!("tr.{}", DATA_ROW_CLASS))?;

        let heading = self
            .assets_heading()
            .ok_or_else(|| DisclosureError::TableNotFound(format!("'{}' heading", ASSETS_HEADING)))?;

        let table = heading
            .ancestors()
            .take(MAX_HEADING_DEPTH)
            .filter_map(ElementRef::wrap)
            .find_map(|container| container.select(&table_sel).next())
            .ok_or_else(|| DisclosureError::TableNotFound("assets table".into()))?;
        table_rows(table, &row_sel)
    }

    /// Element whose own text is the assets heading.
    fn assets_heading(&self) -> Option<ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .find(|node| match node.value() {
                Node::Text(text) => text.trim() == ASSETS_HEADING,
                _ => false,
            })
            .and_then(|text_node| text_node.parent())
            .and_then(ElementRef::wrap)
    }
}

/// Parses `html` and returns its rows for `kind`.
pub fn extract_rows(kind: ReportKind, html: &str) -> Result<Vec<RawRow>, DisclosureError> {
    FilingDocument::parse(html).rows(kind)
}

fn selector(css: &str) -> Result<Selector, DisclosureError> {
    Selector::parse(css)
        .map_err(|e| DisclosureError::Parse(format!("selector {:?}: {:?}", css, e)))
}

/// Rows of `table` matching `row_sel` that have at least one `<td>`.
fn table_rows(table: ElementRef<'_>, row_sel: &Selector) -> Result<Vec<RawRow>, DisclosureError> {
    let cell_sel = selector("td")?;
    Ok(table
        .select(row_sel)
        .map(|row| row.select(&cell_sel).map(cell_text).collect::<RawRow>())
        .filter(|cells| !cells.is_empty())
        .collect())
}

/// Text of a cell with line structure kept: `<br>` and source newlines
/// become line breaks, each line is whitespace-collapsed, and runs of
/// blank lines shrink to one so multi-asset cells split cleanly.
pub fn cell_text(cell: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if el.name() == "br" => raw.push('\n'),
            _ => {}
        }
    }

    let mut lines: Vec<String> = Vec::new();
    for line in raw.split('\n') {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
