use serde::*;

use super::Source;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderVersion {
	pub name: String,
	pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectVersions {
	pub game: String,
	pub loader: LoaderVersion,
}

/// Project-level metadata, persisted next to the content index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
	pub name: String,
	pub description: String,
	pub author: String,
	pub versions: ProjectVersions,
	pub default_source: Source,
}
