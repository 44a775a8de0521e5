use clap::{Parser, ValueEnum};
use listing_harvest::FlushPolicy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "listing-harvest")]
#[command(about = "Crawls a paginated publication listing into CSV checkpoints")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Organization whose publications are listed
    #[arg(long)]
    pub org_id: Option<u64>,

    /// First page to extract
    #[arg(short, long)]
    pub start_page: Option<u32>,

    /// Last page to extract
    #[arg(short, long)]
    pub target_page: Option<u32>,

    /// Seconds to wait after each pagination click
    #[arg(long)]
    pub delay: Option<u64>,

    /// Directory for checkpoint files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Whether each flush rewrites the whole segment or only new rows
    #[arg(long, value_enum)]
    pub flush_policy: Option<FlushPolicyArg>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FlushPolicyArg {
    Cumulative,
    Delta,
}

impl From<FlushPolicyArg> for FlushPolicy {
    fn from(arg: FlushPolicyArg) -> Self {
        match arg {
            FlushPolicyArg::Cumulative => FlushPolicy::Cumulative,
            FlushPolicyArg::Delta => FlushPolicy::Delta,
        }
    }
}
