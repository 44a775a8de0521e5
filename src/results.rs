use serde::Serialize;

/// One bibliographic entry read from a listing row
///
/// Serialized field names are the checkpoint column names downstream
/// consumers already expect (`number,title,authors,info,url`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicationRecord {
    /// Ordinal displayed on the row, separators removed
    #[serde(rename = "number")]
    pub sequence_number: u64,

    /// Publication title (empty when it could not be read)
    pub title: String,

    /// Author line (empty when it could not be read)
    pub authors: String,

    /// Source/summary line (empty when it could not be read)
    #[serde(rename = "info")]
    pub summary_info: String,

    /// Absolute link to the publication page
    #[serde(rename = "url")]
    pub detail_url: Option<String>,
}

impl PublicationRecord {
    /// Create a new record
    pub fn new(
        sequence_number: u64,
        title: String,
        authors: String,
        summary_info: String,
        detail_url: Option<String>,
    ) -> Self {
        Self {
            sequence_number,
            title,
            authors,
            summary_info,
            detail_url,
        }
    }
}

/// Records accumulated since the start of a segment (or the last flush, in delta mode)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlBatch {
    records: Vec<PublicationRecord>,
}

impl CrawlBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page worth of records, keeping row order
    pub fn extend(&mut self, records: impl IntoIterator<Item = PublicationRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[PublicationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sequence numbers of the first and last record, if any
    pub fn bounds(&self) -> Option<(u64, u64)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.sequence_number, last.sequence_number)),
            _ => None,
        }
    }
}

impl From<Vec<PublicationRecord>> for CrawlBatch {
    fn from(records: Vec<PublicationRecord>) -> Self {
        Self { records }
    }
}

/// Where the crawl is and where it stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlPosition {
    pub current_page: u32,
    pub target_page: u32,
}

impl CrawlPosition {
    pub fn new(current_page: u32, target_page: u32) -> Self {
        Self {
            current_page,
            target_page,
        }
    }
}

/// How one segment of the crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEnd {
    /// The target page was extracted
    ReachedTarget { page: u32 },
    /// A challenge page interrupted the segment at `page`, which was not extracted
    Blocked { page: u32 },
}

impl SegmentEnd {
    pub fn page(&self) -> u32 {
        match self {
            SegmentEnd::ReachedTarget { page } | SegmentEnd::Blocked { page } => *page,
        }
    }
}

/// Summary of a whole crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Number of segments run (one plus the number of obstacles hit)
    pub segments: usize,
    /// Pages whose rows were extracted
    pub pages_extracted: usize,
    /// Records extracted across all segments
    pub records_extracted: usize,
    /// Flushes that produced an artifact
    pub artifacts_written: usize,
    /// Obstacles encountered
    pub obstacles: usize,
    /// Last page reached
    pub last_page: u32,
}
