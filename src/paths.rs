//! Output locations derived from the source file.

use std::path::{Path, PathBuf};

pub const IIF_EXTENSION: &str = "iif";
pub const LOG_EXTENSION: &str = "log";

/// Same directory and file stem as `source`, with an `.iif` extension.
pub fn iif_path(source: &Path) -> PathBuf {
    source.with_extension(IIF_EXTENSION)
}

/// Same directory and file stem as `source`, with a `.log` extension.
pub fn log_path(source: &Path) -> PathBuf {
    source.with_extension(LOG_EXTENSION)
}
