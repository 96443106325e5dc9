//! Command implementations

pub mod decode;
pub mod demo;
pub mod results;
pub mod simple;
pub mod submit;
pub mod today;

pub use decode::{DecodeResult, decode_code};
pub use demo::{DemoSummary, autoplay, run_demo};
pub use results::{ResultsSummary, SnapshotIndexer, collect_results};
pub use simple::run_simple;
pub use submit::{LocalSubmitter, SubmitReceipt};
pub use today::{DailyPuzzle, daily_puzzle};

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar in the house style
#[must_use]
pub fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}
