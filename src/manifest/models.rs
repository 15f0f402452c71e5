use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::{FileDescription, PartDescription};

/// Project id -> files in that project.
///
/// Manifests built by this tool carry exactly one project; manifests read
/// back from disk may carry any number.
#[allow(clippy::len_without_is_empty)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    projects: BTreeMap<String, Vec<FileEntry>>,
}

impl Manifest {
    pub fn for_project(project: impl Into<String>, files: Vec<FileEntry>) -> Self {
        let mut projects = BTreeMap::new();
        projects.insert(project.into(), files);
        Self { projects }
    }

    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    pub fn files(&self, project: &str) -> Option<&[FileEntry]> {
        self.projects.get(project).map(Vec::as_slice)
    }

    /// Number of files across all projects.
    pub fn len(&self) -> usize {
        self.projects.values().map(Vec::len).sum()
    }
}

/// One file in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    folder: String,
    id: String,
    name: String,
    parts: BTreeMap<String, PartSummary>,
}

impl FileEntry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        folder: impl Into<String>,
        parts: BTreeMap<String, PartSummary>,
    ) -> Self {
        Self {
            folder: folder.into(),
            id: id.into(),
            name: name.into(),
            parts,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn parts(&self) -> &BTreeMap<String, PartSummary> {
        &self.parts
    }

    /// Sum of all part sizes.
    pub fn size(&self) -> u64 {
        self.parts.values().map(PartSummary::size).sum()
    }
}

impl From<&FileDescription> for FileEntry {
    fn from(file: &FileDescription) -> Self {
        let parts = file
            .parts()
            .iter()
            .map(|(part_id, part)| (part_id.clone(), PartSummary::from(part)))
            .collect();

        FileEntry::new(file.id(), file.name(), file.folder(), parts)
    }
}

/// Checksum and size of one part; nothing else survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSummary {
    md5: String,
    size: u64,
}

impl PartSummary {
    pub fn new(md5: impl Into<String>, size: u64) -> Self {
        Self {
            md5: md5.into(),
            size,
        }
    }

    pub fn md5(&self) -> &str {
        &self.md5
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl From<&PartDescription> for PartSummary {
    fn from(part: &PartDescription) -> Self {
        PartSummary::new(part.md5(), part.size())
    }
}
