//! Single-command PDF operations run through the same sandbox as the
//! extraction pipeline.

pub mod compress;
pub mod merge;
pub mod metadata;
pub mod pages;
pub mod text;
