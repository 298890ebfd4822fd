pub mod client;
pub mod error;
pub mod extractor;
pub mod mapper;
pub mod result;

pub use client::{TransportConfig, build_client, fetch_bytes, fetch_page_text};
pub use error::MirrorError;
pub use extractor::extract_and_rewrite;
pub use mapper::local_path_for;
pub use result::{AssetKind, DiscoveredAsset, ExtractionResult};
