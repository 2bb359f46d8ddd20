//! Career page parsing: position marker plus one row per season played.

use crate::error::{Result, ScrapeError};
use crate::html::{selector, text_of};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

pub const POSITION_SELECTOR: &str = ".player-summary__player-pos";

/// How content rows and their cells are located once the first stats row is found.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum RowLayout {
    /// Every second sibling is a row and every second child a cell; the
    /// nodes in between are separators.
    #[default]
    Interleaved,
    /// Any following `tr` carrying `td` cells, whatever sits in between.
    Structural,
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum MalformedRowPolicy {
    #[default]
    SkipRow,
    SkipPlayer,
}

/// One season of box-score averages, in header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRow(Vec<String>);

impl SeasonRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    pub fn season(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn team(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Career {
    pub position: String,
    pub rows: Vec<SeasonRow>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CareerParser {
    layout: RowLayout,
    on_malformed: MalformedRowPolicy,
}

enum Cell<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
}

impl<'a> Cell<'a> {
    fn nested_text(&self, selector: &Selector) -> Option<String> {
        match self {
            Cell::Element(el) => el.select(selector).next().map(text_of),
            Cell::Text(_) => None,
        }
    }

    fn text(&self) -> String {
        match self {
            Cell::Element(el) => text_of(*el),
            Cell::Text(text) => text.trim().to_string(),
        }
    }
}

impl CareerParser {
    pub fn new(layout: RowLayout, on_malformed: MalformedRowPolicy) -> Self {
        Self {
            layout,
            on_malformed,
        }
    }

    /// `None` when the page lists no position; such players are not scraped.
    pub fn parse(&self, html: &str) -> Result<Option<Career>> {
        let document = Html::parse_document(html);
        let marker = selector(POSITION_SELECTOR)?;
        let position = document
            .select(&marker)
            .next()
            .map(text_of)
            .filter(|position| !position.is_empty());

        match position {
            Some(position) => Ok(Some(Career {
                position,
                rows: self.rows(&document)?,
            })),
            None => Ok(None),
        }
    }

    fn rows(&self, document: &Html) -> Result<Vec<SeasonRow>> {
        let Some(first) = document.select(&selector("td")?).next() else {
            return Ok(vec![]);
        };
        let start = first
            .parent()
            .and_then(ElementRef::wrap)
            .ok_or(ScrapeError::MissingElement("stats row"))?;

        let link = selector("a")?;
        let span = selector("span")?;
        let rows = match self.layout {
            RowLayout::Interleaved => interleaved_rows(start),
            RowLayout::Structural => structural_rows(start),
        };

        let mut seasons = Vec::with_capacity(rows.len());
        for (idx, row) in rows.into_iter().enumerate() {
            let cells = match self.layout {
                RowLayout::Interleaved => interleaved_cells(row),
                RowLayout::Structural => structural_cells(row),
            };
            match season_row(idx, &cells, &link, &span) {
                Ok(season) => seasons.push(season),
                Err(e) if self.on_malformed == MalformedRowPolicy::SkipRow => {
                    warn!(error = %e, "skipping malformed stats row");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(seasons)
    }
}

/// Cell 0 holds the season inside a link, cell 1 the team inside a span.
fn season_row(
    row: usize,
    cells: &[Cell<'_>],
    link: &Selector,
    span: &Selector,
) -> Result<SeasonRow> {
    if cells.is_empty() {
        return Err(ScrapeError::MalformedRow { row, field: "cells" });
    }
    let mut fields = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        let text = match i {
            0 => cell.nested_text(link).ok_or(ScrapeError::MalformedRow {
                row,
                field: "season link",
            })?,
            1 => cell.nested_text(span).ok_or(ScrapeError::MalformedRow {
                row,
                field: "team span",
            })?,
            _ => cell.text(),
        };
        fields.push(text);
    }
    Ok(SeasonRow::new(fields))
}

/// Walks two siblings at a time from `start`. Landing on anything that is not
/// an element, or running off the end, closes the table.
fn interleaved_rows(start: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = vec![start];
    let mut current = start;
    while let Some(row) = current
        .next_sibling()
        .and_then(|node| node.next_sibling())
        .and_then(ElementRef::wrap)
    {
        rows.push(row);
        current = row;
    }
    rows
}

fn structural_rows(start: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    std::iter::once(start)
        .chain(start.next_siblings().filter_map(ElementRef::wrap))
        .filter(|row| row.value().name() == "tr" && !structural_cells(*row).is_empty())
        .collect()
}

fn interleaved_cells(row: ElementRef<'_>) -> Vec<Cell<'_>> {
    row.children()
        .skip(1)
        .step_by(2)
        .map(|node| match ElementRef::wrap(node) {
            Some(el) => Cell::Element(el),
            None => Cell::Text(node.value().as_text().map_or("", |text| &**text)),
        })
        .collect()
}

fn structural_cells(row: ElementRef<'_>) -> Vec<Cell<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "td")
        .map(Cell::Element)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const FULL_ROW: &str = r#"<td><a href="/s">2010-11</a></td>
        <td><span>SAS</span></td>
        <td>28</td>"#;

    fn page(position: &str, body: &str) -> String {
        format!(
            r#"<html><body>
<span class="player-summary__player-pos">{position}</span>
<table>
<tbody>
{body}
</tbody>
</table>
</body></html>"#
        )
    }

    fn interleaved() -> CareerParser {
        CareerParser::default()
    }

    #[test]
    fn parse_career_should_work() {
        let content = fs::read_to_string("fixtures/career.html").unwrap();
        let career = interleaved().parse(&content).unwrap().unwrap();

        assert_eq!(career.position, "G");
        assert_eq!(career.rows.len(), 5);
        assert!(career.rows.iter().all(|row| row.fields().len() == 24));

        let seasons: Vec<_> = career.rows.iter().filter_map(SeasonRow::season).collect();
        assert_eq!(
            seasons,
            ["2001-02", "2002-03", "2003-04", "2004-05", "2005-06"]
        );
        assert_eq!(career.rows[0].team(), Some("SAS"));
        assert_eq!(career.rows[4].fields()[6], "18.9");
        assert_eq!(career.rows[4].fields()[23], "2.0");
    }

    #[test]
    fn structural_layout_should_match_fixture() {
        let content = fs::read_to_string("fixtures/career.html").unwrap();
        let parser = CareerParser::new(RowLayout::Structural, MalformedRowPolicy::SkipRow);
        let structural = parser.parse(&content).unwrap().unwrap();
        let interleaved = interleaved().parse(&content).unwrap().unwrap();
        assert_eq!(structural, interleaved);
    }

    #[test]
    fn missing_position_should_yield_none() {
        let html = page("", &format!("<tr>\n{FULL_ROW}\n</tr>"));
        assert_eq!(interleaved().parse(&html).unwrap(), None);

        let html = format!("<html><body><table><tr>\n{FULL_ROW}\n</tr></table></body></html>");
        assert_eq!(interleaved().parse(&html).unwrap(), None);
    }

    #[test]
    fn empty_table_should_yield_no_rows() {
        let html = page("F", "");
        let career = interleaved().parse(&html).unwrap().unwrap();
        assert_eq!(career.position, "F");
        assert!(career.rows.is_empty());
    }

    #[test]
    fn walk_should_stop_at_text_separator() {
        // the comment sits between the last row and the trailing whitespace,
        // so the second step lands on a bare text node
        let body = format!("<tr>\n{FULL_ROW}\n</tr>\n<tr>\n{FULL_ROW}\n</tr><!-- end -->\n");
        let career = interleaved().parse(&page("C", &body)).unwrap().unwrap();
        assert_eq!(career.rows.len(), 2);
        assert_eq!(career.rows[1].fields(), ["2010-11", "SAS", "28"]);
    }

    #[test]
    fn malformed_row_should_be_skipped() {
        let body = format!(
            "<tr>\n{FULL_ROW}\n</tr>\n<tr>\n<td>2011-12</td>\n<td><span>SAS</span></td>\n</tr>\n<tr>\n{FULL_ROW}\n</tr>\n"
        );
        let career = interleaved().parse(&page("G", &body)).unwrap().unwrap();
        assert_eq!(career.rows.len(), 2);
    }

    #[test]
    fn malformed_row_should_fail_player_when_asked() {
        let body = format!("<tr>\n{FULL_ROW}\n</tr>\n<tr>\n<td><a>2011-12</a></td>\n<td>SAS</td>\n</tr>\n");
        let parser = CareerParser::new(RowLayout::Interleaved, MalformedRowPolicy::SkipPlayer);
        let err = parser.parse(&page("G", &body)).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "row 1: missing team span");
    }

    #[test]
    fn structural_layout_should_handle_packed_rows() {
        // no whitespace between rows or cells: the stride walk would skip rows
        let row = r#"<tr><td><a href="/s">2010-11</a></td><td><span>SAS</span></td><td>28</td></tr>"#;
        let body = format!("{row}<tr class=\"spacer\"></tr>{row}{row}");
        let parser = CareerParser::new(RowLayout::Structural, MalformedRowPolicy::SkipRow);
        let career = parser.parse(&page("G", &body)).unwrap().unwrap();
        assert_eq!(career.rows.len(), 3);
        assert_eq!(career.rows[2].fields(), ["2010-11", "SAS", "28"]);
    }
}
