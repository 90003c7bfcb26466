//! Extract illustrations from PDFs: list the embedded images, dump them,
//! keep the ones that look like real illustrations and put their soft masks
//! back on as an alpha channel.

pub mod cache;
pub mod config;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod pipeline;
pub mod runner;
pub mod tools;

pub use cache::ensure_manifest;
pub use error::{PietroError, Result};
pub use manifest::ManifestEntry;
pub use pipeline::job_runner::extract_images;
