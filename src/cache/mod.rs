pub mod store;

pub use store::{ManifestStore, ensure_manifest};
