//! High-level flows tying the engines to the capability objects, the way a
//! front-end drives them. Nothing here formats user-facing text; decisions go
//! through the [`Chooser`] and outcomes come back as values.
//!
//! [`Chooser`]: crate::chooser::Chooser

use crate::pack::*;
use crate::error::*;
use crate::store::ContentStore;
use crate::provider::ProviderClient;
use crate::chooser::{Chooser, DependentHandling};
use crate::resolver::{DependencyResolver, Resolution};
use crate::removal;
use crate::removal::CommitOutcome;
use crate::ledger;
use crate::ledger::{IncompatEntry, RemovedFiles};
use crate::config::ProjectPaths;
use crate::game_instance::{GameInstance, FileStatus};

/// Adds `root` and everything it requires.
///
/// The resolver settles the dependency graph first, then the root itself is
/// stored (a duplicate root surfaces here as [`Error::AlreadyExists`]), then
/// any incompatibilities found along the way are written to the ledger.
pub fn add_content(
	store: &dyn ContentStore,
	provider: &dyn ProviderClient,
	chooser: &dyn Chooser,
	paths: &ProjectPaths,
	root: ContentItem,
	interactive: bool,
) -> Result<Resolution> {
	let resolution = DependencyResolver::new(store, provider, chooser, interactive)
		.add_with_dependencies(&root)?;

	store.put(&root)?;
	log::info!("added {}", root);

	if !resolution.incompatible.is_empty() {
		let entries: Vec<IncompatEntry> = resolution.incompatible.iter().map(IncompatEntry::from).collect();
		ledger::write_incompat(paths, &entries)?;
	}

	Ok(resolution)
}

/// Fetches an item from the provider by slug or id and adds it like
/// [`add_content`]. The fetched item counts as directly requested.
pub fn add_by_key(
	store: &dyn ContentStore,
	provider: &dyn ProviderClient,
	chooser: &dyn Chooser,
	paths: &ProjectPaths,
	key: &str,
	interactive: bool,
) -> Result<Resolution> {
	let mut root = provider.fetch_item(key)?;
	root.added_as_dependency = false;
	add_content(store, provider, chooser, paths, root, interactive)
}

/// Downloads the content file of every stored item that has none on disk yet,
/// into its recorded location under the project root.
///
/// Failed downloads are logged and skipped; the count of files actually
/// fetched is returned.
pub fn download_missing(
	store: &dyn ContentStore,
	provider: &dyn ProviderClient,
	paths: &ProjectPaths,
) -> Result<usize> {
	let mut downloaded = 0;
	for item in store.list_all()? {
		if item.file.filepath.is_empty() {
			log::warn!("{} has no recorded file path, skipping", item);
			continue;
		}
		let dest = paths.root().join(&item.file.filepath);
		if dest.is_file() {
			log::debug!("content of {} already downloaded, skipping", item.slug);
			continue;
		}
		if let Some(parent) = dest.parent() {
			std::fs::create_dir_all(parent)?;
		}
		match provider.download(&item, &dest) {
			Ok(()) => {
				log::info!("downloaded {}", item);
				downloaded += 1;
			},
			Err(e) => log::error!("failed to download {}: {}", item, e),
		}
	}
	Ok(downloaded)
}

/// Removes the item matching `key`, surfacing the dependent and orphan
/// decisions through the chooser before committing.
///
/// The commit never aborts on a single item: the returned outcome carries the
/// success count and the per-item failures for the caller to report.
pub fn remove_content(
	store: &dyn ContentStore,
	chooser: &dyn Chooser,
	paths: &ProjectPaths,
	key: &str,
) -> Result<CommitOutcome> {
	let target = store.get(key)?;
	let all_items = store.list_all()?;

	let dependents = removal::find_dependents(&target.slug, &all_items);
	let mut removal_set = vec![target.clone()];
	if !dependents.is_empty() {
		match chooser.handle_dependents(&target, &dependents)? {
			DependentHandling::RemoveAll => removal_set.extend(dependents),
			DependentHandling::RemoveAnyway => {
				log::warn!("removing {} despite {} dependent(s)", target, dependents.len());
			},
			DependentHandling::Cancel => return Err(Error::Cancelled),
		}
	}

	let orphans = removal::find_orphans(&removal_set, &all_items);
	if !orphans.is_empty() && chooser.confirm_orphan_removal(&orphans)? {
		removal_set.extend(orphans);
	}

	let mut removed_files = RemovedFiles::load(paths).unwrap_or_else(|e| {
		log::warn!("failed to load removed-files ledger: {}", e);
		RemovedFiles::default()
	});
	let outcome = removal::commit(store, &removal_set, Some(&mut removed_files));
	if let Err(e) = removed_files.save(paths) {
		log::warn!("failed to save removed-files ledger: {}", e);
	}

	log::info!("removed {} of {} items", outcome.removed, removal_set.len());
	Ok(outcome)
}

/// Hash-checks every stored item's file inside a linked instance.
pub fn verify_instance(
	store: &dyn ContentStore,
	instance: &GameInstance,
) -> Result<Vec<(ContentItem, FileStatus)>> {
	let mut report = Vec::new();
	for item in store.list_all()? {
		let status = instance.verify_file(&item)?;
		if status != FileStatus::Ok {
			log::warn!("{}: file check returned {:?}", item, status);
		}
		report.push((item, status));
	}
	Ok(report)
}
