use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of a `/{file-id}/describe` call.
#[derive(Debug, Serialize)]
pub struct DescribeRequest<'a> {
    pub project: &'a str,
    pub fields: DescribeFields,
}

/// Field selector; only the fields set to `true` come back.
#[derive(Debug, Serialize)]
pub struct DescribeFields {
    pub id: bool,
    pub name: bool,
    pub folder: bool,
    pub parts: bool,
}

impl DescribeFields {
    /// The fields a manifest entry is built from.
    pub fn manifest() -> Self {
        Self {
            id: true,
            name: true,
            folder: true,
            parts: true,
        }
    }
}

/// A file as the service describes it.
#[derive(Debug, Clone, Deserialize)]
pub struct FileDescription {
    id: String,
    name: String,
    folder: String,
    #[serde(default)]
    parts: BTreeMap<String, PartDescription>,
}

impl FileDescription {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        folder: impl Into<String>,
        parts: BTreeMap<String, PartDescription>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            folder: folder.into(),
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

    pub fn parts(&self) -> &BTreeMap<String, PartDescription> {
        &self.parts
    }
}

/// One part of a file. The service sends more than checksum and size
/// (`state`, and whatever it adds later); those land in `other`.
#[derive(Debug, Clone, Deserialize)]
pub struct PartDescription {
    md5: String,
    size: u64,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

impl PartDescription {
    pub fn new(md5: impl Into<String>, size: u64) -> Self {
        Self {
            md5: md5.into(),
            size,
            other: serde_json::Map::new(),
        }
    }

    /// Attach an extra field, as the service would send it.
    #[cfg(test)]
    pub(crate) fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.other.insert(key.into(), value);
        self
    }

    pub fn md5(&self) -> &str {
        &self.md5
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn other(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.other
    }
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(rename = "type", default)]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) message: String,
}
