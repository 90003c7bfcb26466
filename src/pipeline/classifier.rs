use crate::manifest::{ImageType, ManifestEntry};

/// Entries must be strictly wider than this to count as an illustration.
pub const MIN_ILLUSTRATION_WIDTH: u32 = 100;
/// Entries must be strictly taller than this to count as an illustration.
pub const MIN_ILLUSTRATION_HEIGHT: u32 = 100;

/// A manifest entry that survived classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Illustration {
    /// Position in the classified sequence; the final file is `<output_index>.png`.
    pub output_index: usize,
    pub entry: ManifestEntry,
}

/// Whether an entry looks like a real illustration: a colour image large
/// enough not to be a bullet or decorative glyph.
pub fn is_illustration(entry: &ManifestEntry) -> bool {
    entry.image_type == ImageType::Image
        && entry.color == "icc"
        && entry.width > MIN_ILLUSTRATION_WIDTH
        && entry.height > MIN_ILLUSTRATION_HEIGHT
}

/// Filter the manifest down to illustrations, keeping manifest order.
pub fn classify(manifest: &[ManifestEntry]) -> Vec<Illustration> {
    manifest
        .iter()
        .filter(|entry| is_illustration(entry))
        .enumerate()
        .map(|(output_index, entry)| Illustration {
            output_index,
            entry: entry.clone(),
        })
        .collect()
}
