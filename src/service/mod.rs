pub mod analyzer;
pub mod http;
pub mod monitor;
pub mod recommendations;
pub mod scoring;

pub use http::{FetchConfig, PageFetcher};
pub use monitor::PageMonitor;
