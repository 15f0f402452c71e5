use anyhow::{Context, Result};
use bzip2::Compression;
use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use super::Manifest;

pub const DEFAULT_OUTFILE: &str = "manifest.json.bz2";

/// Pretty JSON with two-space indentation and every object's keys sorted.
pub fn to_json(manifest: &Manifest) -> Result<String> {
    // Going through `Value` sorts keys at every level, whatever the field
    // order of the types being serialized.
    let value = serde_json::to_value(manifest).context("convert manifest to JSON")?;
    serde_json::to_string_pretty(&value).context("render manifest JSON")
}

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = BzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).context("bzip2 compress")?;
    encoder.finish().context("bzip2 compress")
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    BzDecoder::new(data)
        .read_to_end(&mut out)
        .context("bzip2 decompress")?;
    Ok(out)
}

/// Encode, compress and write the manifest. An existing file at `path` is
/// replaced.
pub fn write_manifest(manifest: &Manifest, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(manifest)?;
    let bytes = compress(json.as_bytes())?;

    fs::write(path, &bytes).with_context(|| format!("write manifest {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        files = manifest.len(),
        json_bytes = json.len(),
        compressed_bytes = bytes.len(),
        "manifest written"
    );

    Ok(())
}

/// Read a manifest written by [`write_manifest`] (or any bzip2 JSON manifest).
pub fn read_manifest(path: impl AsRef<Path>) -> Result<Manifest> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("read manifest {}", path.display()))?;
    let json = decompress(&bytes).with_context(|| format!("decompress {}", path.display()))?;

    serde_json::from_slice(&json).with_context(|| format!("parse manifest {}", path.display()))
}
