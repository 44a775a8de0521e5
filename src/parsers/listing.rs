use crate::config::ListingSelectors;
use crate::error::{ExtractionFault, HarvestError, Result};
use crate::results::PublicationRecord;
use crate::utils;
use scraper::{ElementRef, Html, Selector};

/// Compiled selectors for one listing layout
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    base_url: String,
    row: Selector,
    number: Selector,
    title: Selector,
    authors: Selector,
    info: Selector,
    link: Selector,
    raw: ListingSelectors,
}

impl ListingExtractor {
    /// Compile the selectors; detail links are resolved against `base_url`
    pub fn new(base_url: &str, selectors: &ListingSelectors) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            row: create_selector(&selectors.row)?,
            number: create_selector(&selectors.number)?,
            title: create_selector(&selectors.title)?,
            authors: create_selector(&selectors.authors)?,
            info: create_selector(&selectors.info)?,
            link: create_selector(&selectors.link)?,
            raw: selectors.clone(),
        })
    }

    /// Extract every listing row of a rendered page, top to bottom
    ///
    /// A row whose ordinal cannot be read is skipped. Any other field that
    /// fails is logged and left blank.
    pub fn extract(&self, html: &str) -> Vec<PublicationRecord> {
        let doc = Html::parse_document(html);

        let rows = doc.select(&self.row).collect::<Vec<_>>();
        ::log::debug!("Listing parser found {} rows", rows.len());

        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            match self.extract_row(row) {
                Ok(record) => records.push(record),
                Err(fault) => {
                    ::log::warn!("Skipping listing row {}: {}", index, fault);
                }
            }
        }
        records
    }

    /// Build one record; only a bad ordinal is an error
    fn extract_row(
        &self,
        row: ElementRef<'_>,
    ) -> std::result::Result<PublicationRecord, ExtractionFault> {
        let sequence_number = self.sequence_number(row)?;

        let title = blank_on_fault(
            sequence_number,
            "title",
            first_text(row, &self.title, &self.raw.title, "title"),
        );
        let authors = blank_on_fault(
            sequence_number,
            "authors",
            first_text(row, &self.authors, &self.raw.authors, "authors"),
        );
        let summary_info = blank_on_fault(sequence_number, "info", self.summary_info(row));
        let detail_url = match self.detail_url(row) {
            Ok(url) => Some(url),
            Err(fault) => {
                ::log::warn!("Row {}: {}", sequence_number, fault);
                None
            }
        };

        Ok(PublicationRecord::new(
            sequence_number,
            title,
            authors,
            summary_info,
            detail_url,
        ))
    }

    fn sequence_number(&self, row: ElementRef<'_>) -> std::result::Result<u64, ExtractionFault> {
        let label = first_text(row, &self.number, &self.raw.number, "number")?;
        parse_sequence_number(&label)
    }

    /// Rows can carry several decorated spans; the last one holds the source line
    fn summary_info(&self, row: ElementRef<'_>) -> std::result::Result<String, ExtractionFault> {
        row.select(&self.info)
            .last()
            .map(element_text)
            .ok_or_else(|| ExtractionFault::MissingElement {
                field: "info",
                selector: self.raw.info.clone(),
            })
    }

    fn detail_url(&self, row: ElementRef<'_>) -> std::result::Result<String, ExtractionFault> {
        let anchor = row
            .select(&self.link)
            .next()
            .ok_or_else(|| ExtractionFault::MissingElement {
                field: "url",
                selector: self.raw.link.clone(),
            })?;
        let href = anchor
            .value()
            .attr("href")
            .ok_or_else(|| ExtractionFault::MissingAttribute {
                field: "url",
                attr: "href".to_string(),
            })?;

        utils::absolute_url(&self.base_url, href).map_err(|e| ExtractionFault::InvalidUrl {
            href: href.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Turn a displayed ordinal such as `"1.234"` or `"12."` into a number
pub fn parse_sequence_number(label: &str) -> std::result::Result<u64, ExtractionFault> {
    let digits = label.trim().replace('.', "");
    digits
        .trim()
        .parse::<u64>()
        .map_err(|_| ExtractionFault::InvalidNumber {
            text: label.to_string(),
        })
}

/// Failed fields become empty strings so downstream tables never see nulls
fn blank_on_fault(
    sequence_number: u64,
    field: &str,
    value: std::result::Result<String, ExtractionFault>,
) -> String {
    match value {
        Ok(text) => text.trim().to_string(),
        Err(fault) => {
            ::log::warn!("Row {} field {}: {}", sequence_number, field, fault);
            String::new()
        }
    }
}

fn first_text(
    row: ElementRef<'_>,
    selector: &Selector,
    raw: &str,
    field: &'static str,
) -> std::result::Result<String, ExtractionFault> {
    row.select(selector)
        .next()
        .map(element_text)
        .ok_or_else(|| ExtractionFault::MissingElement {
            field,
            selector: raw.to_string(),
        })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| HarvestError::InvalidSelector(sel_str.into()))
}
