use serde::{Deserialize, Serialize};

/// Where in the document a reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    Script,
    FormAction,
    Anchor,
    Image,
    Link,
    ButtonNavigation,
}

/// One distinct asset awaiting download. The URL is absolute and
/// query-stripped; `kind` records the first source that discovered it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredAsset {
    pub url: String,
    pub kind: AssetKind,
}

/// Output of one extraction pass over a fetched page.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// The document serialized after all in-place rewrites.
    pub html: String,
    /// Insertion-ordered, de-duplicated set of asset URLs: scripts first,
    /// then the remaining kinds in source order.
    pub assets: Vec<DiscoveredAsset>,
    /// Total attribute rewrites performed, duplicates included.
    pub rewrites: usize,
}
