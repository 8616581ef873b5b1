//! Opening access logs, rotated ones included.
//!
//! Rotation leaves `access.log.2.gz` or `access.log.3.zst` behind; those are
//! decompressed while streaming so the processor only ever sees text.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Compression applied to an access log on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Codec {
    Gzip,
    Zstd,
}

impl Codec {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => Some(Self::Gzip),
            Some("zst") => Some(Self::Zstd),
            _ => None,
        }
    }
}

/// Whether `path` names a `.gz` or `.zst` log.
pub fn is_compressed(path: impl AsRef<Path>) -> bool {
    Codec::from_path(path.as_ref()).is_some()
}

/// Open an access log for streaming, decompressing `.gz` and `.zst` files.
pub fn open_file(path: impl AsRef<Path>) -> Result<Box<dyn Read + Send>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open access log: {}", path.display()))?;

    let reader: Box<dyn Read + Send> = match Codec::from_path(path) {
        Some(Codec::Gzip) => Box::new(GzDecoder::new(file)),
        Some(Codec::Zstd) => Box::new(
            zstd::Decoder::new(file)
                .with_context(|| format!("Failed to start zstd stream for {}", path.display()))?,
        ),
        None => Box::new(file),
    };
    Ok(reader)
}
