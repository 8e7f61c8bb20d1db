use serde::*;

use super::{Dependency, RequiredBy};

/// What kind of content an item installs as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
	#[default] Mod,
	ResourcePack,
	ShaderPack,
	DataPack,
	World,
}

impl ContentType {
	/// The instance folder this kind of content deploys into.
	pub fn folder_name(&self) -> &'static str {
		match self {
			ContentType::Mod => "mods",
			ContentType::ResourcePack => "resourcepacks",
			ContentType::ShaderPack => "shaderpacks",
			ContentType::DataPack => "datapacks",
			ContentType::World => "saves",
		}
	}
}

/// Which side of the game requires the item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModSide {
	#[default] None,
	Client,
	Server,
	Both,
}

/// Where an item's metadata and files come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
	#[default] Modrinth,
	Curseforge,
	Custom,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHashes {
	#[serde(default)] pub sha1: String,
	#[serde(default)] pub sha256: String,
	#[serde(default)] pub sha512: String,
	#[serde(default)] pub md5: String,
}

/// The single file an item installs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
	pub filename: String,
	pub filesize: u64,
	/// Relative to the project root.
	pub filepath: String,
	#[serde(default)]
	pub hashes: FileHashes,
}

/// One installable unit of the pack.
///
/// `slug` is the stable unique key within a project and is never empty once stored.
/// The `required_by` back-references are maintained by the resolution and removal
/// engines: every entry must point at a live item that actually lists this item
/// among its dependencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
	pub content_type: ContentType,
	pub name: String,
	pub id: String,
	pub slug: String,
	pub side: ModSide,
	pub page_url: String,
	pub download_url: String,
	pub version_id: String,
	pub source: Source,
	pub file: FileData,
	pub dependencies: Vec<Dependency>,
	#[serde(default)]
	pub required_by: Vec<RequiredBy>,
	/// True iff this item was inserted solely because another item required it.
	#[serde(default)]
	pub added_as_dependency: bool,
}

impl ContentItem {
	/// The identity other items record in their `required_by` lists.
	pub fn as_required_by(&self) -> RequiredBy {
		RequiredBy {
			name: self.name.clone(),
			slug: self.slug.clone(),
			id: self.id.clone(),
		}
	}
}

impl std::fmt::Display for ContentItem {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ({})", self.name, self.slug)
	}
}
