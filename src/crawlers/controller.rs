use crate::config::{FlushPolicy, HarvestConfig};
use crate::crawlers::crawler::{InterventionGate, ListingBrowser};
use crate::error::{HarvestError, Result};
use crate::obstacle::ObstacleDetector;
use crate::parsers::ListingExtractor;
use crate::results::{CrawlBatch, CrawlPosition, CrawlReport, SegmentEnd};
use crate::sink::CheckpointSink;
use std::time::Duration;

/// Where a segment is in its page cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CrawlState {
    /// Reading the page the browser is on
    Fetching(u32),
    /// A challenge page replaced the listing
    Blocked(u32),
    /// Page extracted; flush if due, then move on
    Advancing(u32),
    Terminated(SegmentEnd),
}

/// Drives the crawl: extract, checkpoint, paginate, and pause for challenges
///
/// The browser must already be logged in and showing the start page.
pub struct CrawlController<B, S, G> {
    browser: B,
    sink: S,
    gate: G,
    extractor: ListingExtractor,
    detector: ObstacleDetector,
    flush_every: u32,
    flush_policy: FlushPolicy,
    inter_page_delay: Duration,
    challenge_cooldown: Duration,
    report: CrawlReport,
}

impl<B, S, G> CrawlController<B, S, G>
where
    B: ListingBrowser,
    S: CheckpointSink,
    G: InterventionGate,
{
    pub fn new(config: &HarvestConfig, browser: B, sink: S, gate: G) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            browser,
            sink,
            gate,
            extractor: ListingExtractor::new(&config.base_url, &config.selectors)?,
            detector: ObstacleDetector::new(&config.challenge_markers)?,
            flush_every: config.flush_every_n_pages,
            flush_policy: config.flush_policy,
            inter_page_delay: config.inter_page_delay(),
            challenge_cooldown: config.challenge_cooldown(),
            report: CrawlReport::default(),
        })
    }

    /// Run segments back to back until the target page has been extracted
    ///
    /// Each segment after an obstacle picks up on the page that was blocked,
    /// with a fresh batch and the same browser session.
    pub async fn run(&mut self, start_page: u32, target_page: u32) -> Result<CrawlReport> {
        if start_page == 0 || start_page > target_page {
            return Err(HarvestError::Config(format!(
                "cannot crawl from page {} to page {}",
                start_page, target_page
            )));
        }
        let mut position = CrawlPosition::new(start_page, target_page);

        loop {
            let end = self.run_segment(position).await?;
            position.current_page = end.page();

            println!(
                "Finished at page {}, {}",
                position.current_page,
                match end {
                    SegmentEnd::ReachedTarget { .. } => "target reached",
                    SegmentEnd::Blocked { .. } => "continuing",
                }
            );

            if let SegmentEnd::ReachedTarget { .. } = end {
                break;
            }
        }

        self.report.last_page = position.current_page;
        ::log::info!(
            "Crawl complete: {} pages, {} records, {} artifacts, {} segments",
            self.report.pages_extracted,
            self.report.records_extracted,
            self.report.artifacts_written,
            self.report.segments
        );
        Ok(self.report.clone())
    }

    /// One contiguous run from `position.current_page` to the target or an obstacle
    async fn run_segment(&mut self, position: CrawlPosition) -> Result<SegmentEnd> {
        ::log::info!(
            "Starting segment at page {} (target {})",
            position.current_page,
            position.target_page
        );
        self.report.segments += 1;

        let mut batch = CrawlBatch::new();
        let mut state = CrawlState::Fetching(position.current_page);

        loop {
            state = match state {
                CrawlState::Fetching(page) => {
                    let location = self.browser.current_location().await?;
                    if self.detector.is_blocked(&location) {
                        CrawlState::Blocked(page)
                    } else {
                        let html = self.browser.current_content().await?;
                        let records = self.extractor.extract(&html);
                        println!("Recording page {} ...", page);
                        ::log::info!("Page {}: {} records", page, records.len());

                        self.report.pages_extracted += 1;
                        self.report.records_extracted += records.len();
                        batch.extend(records);
                        CrawlState::Advancing(page)
                    }
                }
                CrawlState::Blocked(page) => {
                    ::log::warn!("Challenge page hit on page {}", page);
                    self.report.obstacles += 1;
                    self.gate.await_resolution(page).await?;
                    tokio::time::sleep(self.challenge_cooldown).await;
                    CrawlState::Terminated(SegmentEnd::Blocked { page })
                }
                CrawlState::Advancing(page) => {
                    if page % self.flush_every == 0 {
                        self.flush(&batch)?;
                        if self.flush_policy == FlushPolicy::Delta {
                            batch = CrawlBatch::new();
                        }
                    }

                    if page >= position.target_page {
                        CrawlState::Terminated(SegmentEnd::ReachedTarget { page })
                    } else {
                        self.browser.click_next_page().await?;
                        tokio::time::sleep(self.inter_page_delay).await;
                        CrawlState::Fetching(page + 1)
                    }
                }
                CrawlState::Terminated(end) => {
                    if batch.is_empty() {
                        ::log::info!(
                            "Segment ended at page {} with nothing new to flush",
                            end.page()
                        );
                    }
                    self.flush(&batch)?;
                    return Ok(end);
                }
            };
        }
    }

    fn flush(&mut self, batch: &CrawlBatch) -> Result<()> {
        if self.sink.flush(batch)?.is_some() {
            self.report.artifacts_written += 1;
        }
        Ok(())
    }

    pub fn browser_mut(&mut self) -> &mut B {
        &mut self.browser
    }

    /// Give back the browser so the session can be closed
    pub fn into_browser(self) -> B {
        self.browser
    }
}
