use indicatif::ProgressBar;

use super::{FileEntry, Manifest};
use crate::api::{ApiError, DescribeFile};

/// Describe one file and reduce it to its manifest entry.
pub async fn file_entry<D>(api: &D, file_id: &str, project: &str) -> Result<FileEntry, ApiError>
where
    D: DescribeFile + ?Sized,
{
    let description = api.describe_file(file_id, project).await?;
    let entry = FileEntry::from(&description);

    tracing::debug!(
        file_id,
        name = entry.name(),
        parts = entry.parts().len(),
        bytes = entry.size(),
        "described file"
    );

    Ok(entry)
}

/// Describe every file in order and collect them under `project`.
///
/// Requests go out one at a time. The first failure aborts the whole build.
pub async fn build_manifest<D, S>(
    api: &D,
    project: &str,
    file_ids: &[S],
    progress: &ProgressBar,
) -> Result<Manifest, ApiError>
where
    D: DescribeFile + ?Sized,
    S: AsRef<str>,
{
    let mut files = Vec::with_capacity(file_ids.len());

    for file_id in file_ids {
        let file_id = file_id.as_ref();
        progress.set_message(file_id.to_string());
        files.push(file_entry(api, file_id, project).await?);
        progress.inc(1);
    }

    progress.finish_and_clear();

    Ok(Manifest::for_project(project, files))
}
