use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use memmap2::Mmap;
use std::fs::{self, File};
use std::path::Path;

/// Files above this size are memory-mapped instead of read through a buffer
const MMAP_THRESHOLD: u64 = 10_000_000;

/// Decoded `data:` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Parse a base64 `data:<mime>;base64,<payload>` URL
    pub fn parse(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| anyhow!("Not a data URL"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| anyhow!("Data URL has no payload"))?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or_else(|| anyhow!("Only base64 data URLs are supported"))?;

        let bytes = STANDARD
            .decode(payload.trim())
            .context("Failed to decode data URL payload")?;
        if bytes.is_empty() {
            return Err(anyhow!("Data URL payload is empty"));
        }

        Ok(Self::new(mime, bytes))
    }

    /// Encode back to a `data:` URL string
    pub fn to_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Read a local image fully into memory and return it as a data URL
pub fn read_image_as_data_url(path: &Path) -> Result<String> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(anyhow!("Not an image file: {}", path.display()));
    }

    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let bytes = if metadata.len() > MMAP_THRESHOLD {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file for mmap: {}", path.display()))?;
        // SAFETY: the map is copied out immediately and dropped before returning
        let mmap = unsafe {
            Mmap::map(&file)
                .with_context(|| format!("Failed to create mmap for: {}", path.display()))?
        };
        mmap.to_vec()
    } else {
        fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))?
    };

    tracing::debug!(path = %path.display(), bytes = bytes.len(), %mime, "image ingested");
    Ok(DataUrl::new(mime.essence_str(), bytes).to_url())
}
