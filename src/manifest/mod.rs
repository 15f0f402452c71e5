mod builder;
mod codec;
mod models;

pub use builder::{build_manifest, file_entry};
pub use codec::{DEFAULT_OUTFILE, compress, decompress, read_manifest, to_json, write_manifest};
pub use models::{FileEntry, Manifest, PartSummary};
