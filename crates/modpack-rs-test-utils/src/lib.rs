//! Various helpers for testing the engines without providers or a terminal.
//!
//! The fakes here stand in for the external capabilities: an in-memory
//! provider with failure injection, a chooser answering from a script, and a
//! store wrapper that fails on demand. Fixture constructors build content
//! items with predictable names so tests stay readable.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use modpack_rs::pack::*;
use modpack_rs::error::*;
use modpack_rs::config::ProjectPaths;
use modpack_rs::store::{ContentStore, FsStore};
use modpack_rs::provider::ProviderClient;
use modpack_rs::chooser::*;

/* Fixtures */

/// A mod item with predictable fields derived from its slug.
pub fn make_item(slug: &str) -> ContentItem {
	ContentItem {
		content_type: ContentType::Mod,
		name: slug.to_string(),
		id: format!("id-{}", slug),
		slug: slug.to_string(),
		file: FileData {
			filename: format!("{}.jar", slug),
			filesize: 1024,
			filepath: format!("overrides/mods/{}.jar", slug),
			..Default::default()
		},
		..Default::default()
	}
}

pub fn make_item_with_deps(slug: &str, dependencies: Vec<Dependency>) -> ContentItem {
	let mut item = make_item(slug);
	item.dependencies = dependencies;
	item
}

pub fn dependency(slug: &str, dependency_type: DependencyType) -> Dependency {
	Dependency {
		name: slug.to_string(),
		slug: slug.to_string(),
		id: format!("id-{}", slug),
		dependency_type,
	}
}

pub fn require(slug: &str) -> Dependency {
	dependency(slug, DependencyType::Required)
}

/* Project and instance directories */

/// A fresh project store in a temp directory. Keep the `TempDir` alive for as
/// long as the store is used.
pub fn temp_project() -> (tempfile::TempDir, FsStore) {
	let dir = tempfile::tempdir().expect("failed to create temp project dir");
	let paths = ProjectPaths::new(dir.path());
	let store = FsStore::init(paths, &Project::default()).expect("failed to init project store");
	(dir, store)
}

/// A fake game instance whose mods folder contains the given files.
pub fn temp_instance(filenames: &[&str]) -> tempfile::TempDir {
	let dir = tempfile::tempdir().expect("failed to create temp instance dir");
	let mods_dir = dir.path().join("mods");
	std::fs::create_dir_all(&mods_dir).expect("failed to create mods dir");
	for filename in filenames {
		std::fs::write(mods_dir.join(filename), filename).expect("failed to write mod file");
	}
	dir
}

/* Capability fakes */

/// In-memory [`ProviderClient`]. Items are looked up by slug or id; keys in
/// the failure set error out, and every dependency fetch is recorded so tests
/// can assert on dedup behaviour.
#[derive(Default)]
pub struct FakeProvider {
	items: HashMap<String, ContentItem>,
	fail: HashSet<String>,
	fetched: RefCell<Vec<String>>,
}

impl FakeProvider {
	pub fn new() -> Self {
		Default::default()
	}

	pub fn with_item(mut self, item: ContentItem) -> Self {
		if !item.id.is_empty() {
			self.items.insert(item.id.clone(), item.clone());
		}
		self.items.insert(item.slug.clone(), item);
		self
	}

	pub fn failing(mut self, key: &str) -> Self {
		self.fail.insert(key.to_string());
		self
	}

	/// Every key passed to `fetch_dependency_item`, in call order.
	pub fn fetches(&self) -> Vec<String> {
		self.fetched.borrow().clone()
	}

	fn lookup(&self, key: &str) -> Result<ContentItem> {
		if self.fail.contains(key) {
			return Err(Error::Provider {
				key: key.to_string(),
				reason: "injected fetch failure".to_string(),
			});
		}
		self.items.get(key).cloned().ok_or_else(|| Error::Provider {
			key: key.to_string(),
			reason: "unknown item".to_string(),
		})
	}
}

impl ProviderClient for FakeProvider {
	fn fetch_item(&self, key: &str) -> Result<ContentItem> {
		self.lookup(key)
	}

	fn fetch_dependency_item(&self, key: &str) -> Result<ContentItem> {
		self.fetched.borrow_mut().push(key.to_string());
		self.lookup(key)
	}

	fn download(&self, item: &ContentItem, dest: &std::path::Path) -> Result<()> {
		std::fs::write(dest, &item.slug)?;
		Ok(())
	}
}

/// [`Chooser`] answering every decision from preset fields.
pub struct ScriptedChooser {
	pub incompat: IncompatResolution,
	pub dependents: DependentHandling,
	pub remove_orphans: bool,
	/// Keys picked when asked to select a dependency subset.
	pub select_keys: Vec<String>,
}

impl Default for ScriptedChooser {
	fn default() -> Self {
		Self {
			incompat: IncompatResolution::Continue,
			dependents: DependentHandling::RemoveAnyway,
			remove_orphans: false,
			select_keys: Vec::new(),
		}
	}
}

impl Chooser for ScriptedChooser {
	fn resolve_incompatibilities(&self, _conflicts: &[Dependency]) -> Result<IncompatResolution> {
		Ok(self.incompat.clone())
	}

	fn select_dependencies(&self, candidates: &[Dependency]) -> Result<Vec<Dependency>> {
		Ok(candidates
			.iter()
			.filter(|d| self.select_keys.iter().any(|k| k == d.key()))
			.cloned()
			.collect())
	}

	fn handle_dependents(&self, _target: &ContentItem, _dependents: &[ContentItem]) -> Result<DependentHandling> {
		Ok(self.dependents)
	}

	fn confirm_orphan_removal(&self, _orphans: &[ContentItem]) -> Result<bool> {
		Ok(self.remove_orphans)
	}
}

/// Store wrapper that fails `delete` for chosen slugs, for exercising partial
/// commit outcomes.
pub struct FlakyStore<S> {
	inner: S,
	fail_delete: HashSet<String>,
}

impl<S: ContentStore> FlakyStore<S> {
	pub fn new(inner: S) -> Self {
		Self { inner, fail_delete: Default::default() }
	}

	pub fn failing_delete(mut self, slug: &str) -> Self {
		self.fail_delete.insert(slug.to_string());
		self
	}

	pub fn inner(&self) -> &S {
		&self.inner
	}
}

impl<S: ContentStore> ContentStore for FlakyStore<S> {
	fn get(&self, key: &str) -> Result<ContentItem> {
		self.inner.get(key)
	}

	fn put(&self, item: &ContentItem) -> Result<()> {
		self.inner.put(item)
	}

	fn update(&self, item: &ContentItem) -> Result<()> {
		self.inner.update(item)
	}

	fn delete(&self, slug: &str) -> Result<()> {
		if self.fail_delete.contains(slug) {
			return Err(Error::IO(std::io::Error::new(
				std::io::ErrorKind::Other,
				"injected delete failure",
			)));
		}
		self.inner.delete(slug)
	}

	fn list_all(&self) -> Result<Vec<ContentItem>> {
		self.inner.list_all()
	}

	fn exists(&self, key: &str) -> bool {
		self.inner.exists(key)
	}
}
