use clap::Parser;
use listing_harvest::{Harvest, HarvestConfig};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let harvest = match &args.config {
        Some(path) => match Harvest::from_config_file(path) {
            Ok(harvest) => harvest,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return;
            }
        },
        None => Harvest::new(HarvestConfig::default()),
    };
    let harvest = apply_overrides(harvest, &args);

    println!("Note: crawling requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL if not using {}",
        harvest.config().webdriver_url
    );

    let start_time = std::time::Instant::now();

    // Errors end the crawl; whatever was flushed stays on disk
    match harvest.run().await {
        Ok(report) => {
            ::log::info!(
                "Harvest finished at page {} with {} records in {:.2} seconds",
                report.last_page,
                report.records_extracted,
                start_time.elapsed().as_secs_f64()
            );
        }
        Err(e) => {
            ::log::error!("Harvest stopped: {}", e);
        }
    }
}

fn apply_overrides(mut harvest: Harvest, args: &Args) -> Harvest {
    if let Some(org_id) = args.org_id {
        harvest = harvest.with_org_id(org_id);
    }
    if let Some(page) = args.start_page {
        harvest = harvest.with_start_page(page);
    }
    if let Some(page) = args.target_page {
        harvest = harvest.with_target_page(page);
    }
    if let Some(delay) = args.delay {
        harvest = harvest.with_inter_page_delay(delay);
    }
    if let Some(dir) = &args.output_dir {
        harvest = harvest.with_output_dir(dir);
    }
    if let Some(policy) = args.flush_policy {
        harvest = harvest.with_flush_policy(policy.into());
    }
    harvest
}
