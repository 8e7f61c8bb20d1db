//! Removal planning, orphan detection and batch commit.
//!
//! Removal is a three-step conversation with the caller: discover what depends
//! on the target ([`find_dependents`]), work out what the chosen removal set
//! strands ([`find_orphans`]), then [`commit`] the final set. The engine makes
//! no decisions between the steps; that is the caller's (and its
//! [`Chooser`]'s) job.
//!
//! [`Chooser`]: crate::chooser::Chooser

use std::collections::HashSet;

use crate::pack::*;
use crate::error::*;
use crate::store::ContentStore;
use crate::depgraph::DependentsGraph;
use crate::ledger::RemovedFiles;

/// Aggregate result of a [`commit`]. Items fail independently; a failure never
/// stops the rest of the batch.
#[derive(Debug)]
pub struct CommitOutcome {
	pub removed: usize,
	pub failures: Vec<(String, Error)>,
}

/// Every item that would break, directly or transitively, if `target`
/// disappeared. Cycle-safe; `target` itself is not included.
pub fn find_dependents(target: &str, all_items: &[ContentItem]) -> Vec<ContentItem> {
	let graph = DependentsGraph::from_items(all_items);
	graph.closure(target)
		.into_iter()
		.filter(|slug| slug != target)
		.filter_map(|slug| all_items.iter().find(|i| i.slug == slug).cloned())
		.collect()
}

/// Dependencies stranded by removing `removal_set`.
///
/// An item is orphaned iff it was only ever added as a dependency and none of
/// its back-references survive the removal. Items already in the removal set
/// are never reported, and each orphan is reported once.
pub fn find_orphans(removal_set: &[ContentItem], all_items: &[ContentItem]) -> Vec<ContentItem> {
	let removing: HashSet<&str> = removal_set.iter().map(|i| i.slug.as_str()).collect();
	let mut seen: HashSet<String> = HashSet::new();
	let mut orphans = Vec::new();

	for target in removal_set {
		for dep in &target.dependencies {
			if dep.dependency_type != DependencyType::Required {
				continue;
			}

			let dep_item = all_items.iter().find(|i| {
				i.slug == dep.slug || (!dep.id.is_empty() && i.id == dep.id)
			});
			let dep_item = match dep_item {
				Some(item) => item,
				None => continue,
			};

			if seen.contains(dep_item.slug.as_str()) || removing.contains(dep_item.slug.as_str()) {
				continue;
			}
			if !dep_item.added_as_dependency {
				continue;
			}

			let survivors = dep_item.required_by
				.iter()
				.filter(|r| !removing.contains(r.slug.as_str()))
				.count();
			if survivors == 0 {
				seen.insert(dep_item.slug.clone());
				orphans.push(dep_item.clone());
			}
		}
	}

	orphans
}

/// Removes every item in `removal_set`, continuing past per-item failures.
///
/// For each item: its content file path is recorded in `ledger` (when given),
/// the `required_by` lists of its surviving dependencies are repaired, and the
/// item is deleted. Repair is skipped for dependencies that are themselves in
/// the batch, since their records are about to go too.
pub fn commit(
	store: &dyn ContentStore,
	removal_set: &[ContentItem],
	mut ledger: Option<&mut RemovedFiles>,
) -> CommitOutcome {
	let removing: HashSet<&str> = removal_set.iter().map(|i| i.slug.as_str()).collect();
	let mut outcome = CommitOutcome { removed: 0, failures: Vec::new() };

	for item in removal_set {
		if let Some(ledger) = ledger.as_deref_mut() {
			ledger.record(&item.file.filepath);
		}

		for dep in &item.dependencies {
			if removing.contains(dep.slug.as_str()) {
				continue;
			}
			let mut dep_item = match store.get(dep.key()) {
				Ok(dep_item) => dep_item,
				Err(_) => continue,
			};
			let before = dep_item.required_by.len();
			dep_item.required_by.retain(|r| r.slug != item.slug);
			if dep_item.required_by.len() != before {
				if let Err(e) = store.update(&dep_item) {
					log::warn!("failed to update back-references of {}: {}", dep_item.slug, e);
				}
			}
		}

		match store.delete(&item.slug) {
			Ok(()) => {
				log::info!("removed {}", item);
				outcome.removed += 1;
			},
			Err(e) => {
				log::error!("failed to remove {}: {}", item, e);
				outcome.failures.push((item.slug.clone(), e));
			},
		}
	}

	outcome
}
