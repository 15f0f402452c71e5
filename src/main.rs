use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use dx_manifest::api::DxClient;
use dx_manifest::cli::Args;
use dx_manifest::{environment, logging, manifest};

/// Spinner-and-bar over the file IDs, drawn on stderr.
fn describe_progress(total: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
    )
    .context("build progress style")?
    .progress_chars("#>-");
    pb.set_style(style);
    Ok(pb)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse first: a bad command line must not touch config or network.
    let args = Args::parse();
    logging::init_logging()?;

    let env = environment::load().context("resolve API environment")?;
    tracing::info!(
        token_source = %env.token_source(),
        server = %env.api_server().host(),
        "obtained API token"
    );

    let client = DxClient::from_environment(&env)?;

    let progress = describe_progress(args.ids.len())?;
    let manifest = manifest::build_manifest(&client, &args.project, args.ids.as_slice(), &progress)
        .await
        .with_context(|| format!("describe files in project '{}'", args.project))?;

    manifest::write_manifest(&manifest, &args.outfile)?;

    println!("Manifest file written to {}", args.outfile.display());

    Ok(())
}
