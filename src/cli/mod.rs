use clap::Parser;
use std::path::PathBuf;

use crate::manifest::DEFAULT_OUTFILE;

/// Create a manifest file from a list of file IDs.
#[derive(Parser, Debug)]
#[command(name = "dx-manifest", author, version, about, long_about = None)]
pub struct Args {
    /// File IDs to describe, in the order they should appear.
    #[arg(value_name = "ID", required = true, num_args = 1..)]
    pub ids: Vec<String>,

    /// Project ID the files live in; scopes and speeds up the lookups.
    #[arg(long, value_name = "PROJECT")]
    pub project: String,

    /// Where to write the compressed manifest.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTFILE)]
    pub outfile: PathBuf,
}
