//! Side ledgers kept next to the content index.
//!
//! Both are plain lists consumed by collaborators outside the engines: the
//! incompatibility ledger records items flagged during adds, the removed-files
//! ledger tells the instance sync which files no longer belong to the pack.

use serde::*;

use crate::pack::*;
use crate::error::*;
use crate::config::ProjectPaths;

/// One item flagged incompatible during an add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncompatEntry {
	pub slug: String,
	pub id: String,
	pub content_type: ContentType,
}

impl From<&Dependency> for IncompatEntry {
	fn from(dep: &Dependency) -> Self {
		Self {
			slug: dep.slug.clone(),
			id: dep.id.clone(),
			content_type: ContentType::Mod,
		}
	}
}

pub fn read_incompat(paths: &ProjectPaths) -> Result<Vec<IncompatEntry>> {
	let path = paths.incompat_file();
	if !path.is_file() {
		return Ok(Vec::new());
	}
	let f = std::fs::File::open(path)?;
	Ok(serde_json::from_reader(f)?)
}

pub fn write_incompat(paths: &ProjectPaths, entries: &[IncompatEntry]) -> Result<()> {
	let f = std::fs::File::create(paths.incompat_file())?;
	serde_json::to_writer_pretty(f, entries)?;
	Ok(())
}

/// Removed-files ledger. Paths are recorded as stored in
/// [`FileData::filepath`], relative to the project root.
///
/// [`FileData::filepath`]: crate::pack::FileData
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemovedFiles {
	pub files: Vec<String>,
}

impl RemovedFiles {
	pub fn load(paths: &ProjectPaths) -> Result<Self> {
		let path = paths.removed_files_file();
		if !path.is_file() {
			return Ok(Self::default());
		}
		let f = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(f)?)
	}

	pub fn save(&self, paths: &ProjectPaths) -> Result<()> {
		let f = std::fs::File::create(paths.removed_files_file())?;
		serde_json::to_writer_pretty(f, self)?;
		Ok(())
	}

	pub fn record(&mut self, filepath: &str) {
		if filepath.is_empty() {
			return;
		}
		if !self.files.iter().any(|f| f == filepath) {
			self.files.push(filepath.to_string());
		}
	}
}
