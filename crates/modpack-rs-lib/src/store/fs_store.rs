use serde::*;
use rayon::prelude::*;

use crate::pack::*;
use crate::error::*;
use crate::config::ProjectPaths;
use super::ContentStore;

/// One line of the content index.
///
/// The index is authoritative: an item absent from it is absent from the store,
/// whatever record files happen to be lying around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
	pub slug: String,
	pub id: String,
	pub content_type: ContentType,
	pub source: Source,
}

impl IndexEntry {
	fn for_item(item: &ContentItem) -> Self {
		Self {
			slug: item.slug.clone(),
			id: item.id.clone(),
			content_type: item.content_type,
			source: item.source,
		}
	}
}

/// File-backed [`ContentStore`] over a project directory.
#[derive(Debug)]
pub struct FsStore {
	paths: ProjectPaths,
}

impl FsStore {
	/// Creates the on-disk project skeleton and returns a store over it.
	pub fn init(paths: ProjectPaths, project: &Project) -> Result<Self> {
		std::fs::create_dir_all(paths.content_dir())?;
		let store = Self { paths };
		store.write_index(&[])?;
		store.write_project(project)?;
		log::info!("initialised project store at {}", store.paths.root().display());
		Ok(store)
	}

	/// Opens an existing project directory.
	pub fn open(paths: ProjectPaths) -> Result<Self> {
		if !paths.index_file().is_file() {
			return Err(Error::NotFound(format!(
				"{} is not a modpack project (missing content index)",
				paths.root().display()
			)));
		}
		Ok(Self { paths })
	}

	pub fn paths(&self) -> &ProjectPaths {
		&self.paths
	}

	pub fn read_project(&self) -> Result<Project> {
		let f = std::fs::File::open(self.paths.project_file())?;
		Ok(serde_json::from_reader(f)?)
	}

	pub fn write_project(&self, project: &Project) -> Result<()> {
		let f = std::fs::File::create(self.paths.project_file())?;
		serde_json::to_writer_pretty(f, project)?;
		Ok(())
	}

	pub fn read_index(&self) -> Result<Vec<IndexEntry>> {
		let f = std::fs::File::open(self.paths.index_file())?;
		Ok(serde_json::from_reader(f)?)
	}

	fn write_index(&self, entries: &[IndexEntry]) -> Result<()> {
		let f = std::fs::File::create(self.paths.index_file())?;
		serde_json::to_writer_pretty(f, entries)?;
		Ok(())
	}

	fn read_record(&self, slug: &str) -> Result<ContentItem> {
		let f = std::fs::File::open(self.paths.content_file(slug))?;
		Ok(serde_json::from_reader(f)?)
	}

	fn write_record(&self, item: &ContentItem) -> Result<()> {
		let f = std::fs::File::create(self.paths.content_file(&item.slug))?;
		serde_json::to_writer_pretty(f, item)?;
		Ok(())
	}

	fn find_entry<'a>(entries: &'a [IndexEntry], key: &str) -> Option<&'a IndexEntry> {
		if key.is_empty() {
			return None;
		}
		entries.iter().find(|e| e.slug == key || e.id == key)
	}
}

impl ContentStore for FsStore {
	fn get(&self, key: &str) -> Result<ContentItem> {
		let entries = self.read_index()?;
		let entry = Self::find_entry(&entries, key)
			.ok_or_else(|| Error::NotFound(key.to_string()))?;
		self.read_record(&entry.slug)
	}

	fn put(&self, item: &ContentItem) -> Result<()> {
		if item.slug.is_empty() {
			return Err(Error::InvalidState("cannot store an item with an empty slug".to_string()));
		}
		let mut entries = self.read_index()?;
		if entries.iter().any(|e| e.slug == item.slug) {
			return Err(Error::AlreadyExists(item.slug.clone()));
		}
		/* Record first, then index: the index is what makes the item visible. */
		self.write_record(item)?;
		entries.push(IndexEntry::for_item(item));
		self.write_index(&entries)?;
		log::debug!("stored {}", item.slug);
		Ok(())
	}

	fn update(&self, item: &ContentItem) -> Result<()> {
		let mut entries = self.read_index()?;
		let pos = entries.iter().position(|e| e.slug == item.slug)
			.ok_or_else(|| Error::NotFound(item.slug.clone()))?;
		self.write_record(item)?;
		entries[pos] = IndexEntry::for_item(item);
		self.write_index(&entries)?;
		log::debug!("updated {}", item.slug);
		Ok(())
	}

	fn delete(&self, slug: &str) -> Result<()> {
		let mut entries = self.read_index()?;
		let pos = entries.iter().position(|e| e.slug == slug)
			.ok_or_else(|| Error::NotFound(slug.to_string()))?;
		entries.remove(pos);
		self.write_index(&entries)?;
		match std::fs::remove_file(self.paths.content_file(slug)) {
			Ok(()) => {},
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
			Err(e) => return Err(e.into()),
		}
		log::debug!("deleted {}", slug);
		Ok(())
	}

	fn list_all(&self) -> Result<Vec<ContentItem>> {
		let entries = self.read_index()?;
		/* Reads are independent so they fan out; collect keeps index order. */
		entries.par_iter()
			.map(|e| self.read_record(&e.slug))
			.collect()
	}

	fn exists(&self, key: &str) -> bool {
		match self.read_index() {
			Ok(entries) => Self::find_entry(&entries, key).is_some(),
			Err(e) => {
				log::warn!("failed to read content index: {}", e);
				false
			},
		}
	}
}
