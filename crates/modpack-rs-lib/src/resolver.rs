//! Recursive dependency resolution for adds.
//!
//! # Usage
//! 1. Create a [`DependencyResolver`] with the store, provider and chooser
//!    capabilities it should operate through.
//! 1. Call [`DependencyResolver::add_with_dependencies`] with the item being
//!    added. The resolver settles every descendant: conflicts are screened,
//!    required dependencies are fetched and stored, back-references are kept
//!    consistent.
//! 1. Store the root item itself and persist the returned incompatibility
//!    list; the resolver deliberately leaves both to the caller (see
//!    [`crate::manager::add_content`]).

use std::collections::HashSet;

use crate::pack::*;
use crate::error::*;
use crate::store::ContentStore;
use crate::provider::ProviderClient;
use crate::chooser::{Chooser, IncompatResolution};
use crate::removal;

/// Recursion ceiling, one level per item. Cycles are broken by the processed
/// set; this is a separate safety valve for pathological provider graphs.
const MAX_DEPTH: u32 = 10;

/// What an add settled.
#[derive(Debug, Default)]
pub struct Resolution {
	/// Dependencies inserted by this call, in insertion order.
	pub added: Vec<ContentItem>,
	/// Incompatible dependency declarations collected anywhere in the visited
	/// graph whose targets are present in the store once the call ends.
	pub incompatible: Vec<Dependency>,
}

/// Single-use resolution engine. One instance corresponds to one
/// `add_with_dependencies` call; the dedup state does not carry over.
pub struct DependencyResolver<'a> {
	store: &'a dyn ContentStore,
	provider: &'a dyn ProviderClient,
	chooser: &'a dyn Chooser,
	/// When set, the chooser picks the dependency subset at every level
	/// instead of auto-selecting required entries.
	interactive: bool,

	processed: HashSet<String>,
	added: Vec<ContentItem>,
	incompatible: Vec<Dependency>,
}

impl<'a> DependencyResolver<'a> {
	pub fn new(
		store: &'a dyn ContentStore,
		provider: &'a dyn ProviderClient,
		chooser: &'a dyn Chooser,
		interactive: bool,
	) -> Self {
		Self {
			store,
			provider,
			chooser,
			interactive,
			processed: Default::default(),
			added: Default::default(),
			incompatible: Default::default(),
		}
	}

	/// Settles everything below `root`: screens the root's incompatibilities,
	/// then recursively fetches and stores its dependency graph.
	///
	/// `root` itself is never stored here. Provider and store failures on one
	/// dependency are logged and its siblings continue; only a chooser failure
	/// or an explicit cancel aborts the whole call.
	pub fn add_with_dependencies(mut self, root: &ContentItem) -> Result<Resolution> {
		self.screen_incompatibilities(root)?;

		/* The root counts as visited from the start, or a cycle leading back to
		   it would fetch it a second time as somebody's dependency. */
		for key in [root.slug.as_str(), root.id.as_str()] {
			if !key.is_empty() {
				self.processed.insert(key.to_string());
			}
		}

		self.resolve(root, 0)?;

		let mut seen = HashSet::new();
		let incompatible = self.incompatible
			.into_iter()
			.filter(|d| self.store.exists(&d.slug) || self.store.exists(&d.id))
			.filter(|d| seen.insert(d.key().to_string()))
			.collect();

		Ok(Resolution { added: self.added, incompatible })
	}

	/// Surfaces the root's `Incompatible` entries that are already in the pack
	/// and executes the chooser's answer. Runs once, before any recursion, on
	/// the root's own conflicts only.
	fn screen_incompatibilities(&mut self, root: &ContentItem) -> Result<()> {
		let conflicts: Vec<Dependency> = root.dependencies
			.iter()
			.filter(|d| d.dependency_type == DependencyType::Incompatible)
			.filter(|d| self.store.exists(&d.slug) || self.store.exists(&d.id))
			.cloned()
			.collect();

		if conflicts.is_empty() {
			return Ok(());
		}

		match self.chooser.resolve_incompatibilities(&conflicts)? {
			IncompatResolution::RemoveAll => {
				for dep in &conflicts {
					self.remove_conflict(dep);
				}
			},
			IncompatResolution::RemoveSubset(slugs) => {
				for dep in conflicts.iter().filter(|d| slugs.iter().any(|s| s == &d.slug)) {
					self.remove_conflict(dep);
				}
			},
			IncompatResolution::Continue => {
				log::warn!("continuing add with {} incompatible items present", conflicts.len());
			},
			IncompatResolution::Cancel => return Err(Error::Cancelled),
		}

		Ok(())
	}

	/// Removes one conflicting item, repairing back-references but running no
	/// orphan cascade.
	fn remove_conflict(&self, dep: &Dependency) {
		let item = match self.store.get(dep.key()).or_else(|_| self.store.get(&dep.id)) {
			Ok(item) => item,
			Err(e) => {
				log::error!("failed to load incompatible item {}: {}", dep.name, e);
				return;
			},
		};
		let outcome = removal::commit(self.store, std::slice::from_ref(&item), None);
		for (slug, e) in &outcome.failures {
			log::error!("failed to remove incompatible item {}: {}", slug, e);
		}
		if outcome.removed > 0 {
			log::info!("removed incompatible item {}", item);
		}
	}

	fn resolve(&mut self, item: &ContentItem, depth: u32) -> Result<()> {
		if depth > MAX_DEPTH {
			log::warn!("maximum dependency depth reached below {}, stopping recursive resolution", item.slug);
			return Ok(());
		}

		for dep in &item.dependencies {
			if dep.dependency_type == DependencyType::Incompatible {
				self.incompatible.push(dep.clone());
			}
		}

		let selected: Vec<Dependency> = if self.interactive {
			let candidates: Vec<Dependency> = item.dependencies
				.iter()
				.filter(|d| !d.key().is_empty())
				.filter(|d| !self.processed.contains(d.key()))
				.filter(|d| !self.store.exists(&d.slug) && !self.store.exists(&d.id))
				.cloned()
				.collect();
			if candidates.is_empty() {
				Vec::new()
			} else {
				self.chooser.select_dependencies(&candidates)?
			}
		} else {
			item.dependencies
				.iter()
				.filter(|d| d.dependency_type == DependencyType::Required)
				.cloned()
				.collect()
		};

		for dep in selected {
			let key = dep.key().to_string();
			if key.is_empty() {
				log::warn!("dependency {} has neither slug nor id, skipping", dep.name);
				continue;
			}

			if self.processed.contains(&key)
				|| self.store.exists(&dep.slug)
				|| self.store.exists(&dep.id)
			{
				if self.store.exists(&dep.slug) || self.store.exists(&dep.id) {
					if let Err(e) = self.update_required_by(&dep, item) {
						log::error!("failed to update back-reference on {}: {}", dep.name, e);
					}
				}
				continue;
			}

			/* Marked before the fetch so cyclic provider graphs terminate. */
			self.processed.insert(key.clone());

			let mut fetched = match self.provider.fetch_dependency_item(&key) {
				Ok(fetched) => fetched,
				Err(e) => {
					log::error!("failed to fetch dependency {}: {}", dep.name, e);
					continue;
				},
			};

			fetched.added_as_dependency = true;
			fetched.required_by = vec![item.as_required_by()];

			if let Err(e) = self.store.put(&fetched) {
				log::error!("failed to store dependency {}: {}", fetched.slug, e);
				continue;
			}
			log::info!("added dependency {}", fetched);
			self.added.push(fetched.clone());

			if let Err(e) = self.resolve(&fetched, depth + 1) {
				log::error!("failed to resolve sub-dependencies of {}: {}", fetched.slug, e);
			}
		}

		Ok(())
	}

	/// Adds `item` to an already-stored dependency's back-references, if it is
	/// not recorded there yet.
	fn update_required_by(&self, dep: &Dependency, item: &ContentItem) -> Result<()> {
		let mut stored = self.store.get(dep.key()).or_else(|_| self.store.get(&dep.id))?;

		let already = stored.required_by.iter().any(|r| {
			if item.id.is_empty() { r.slug == item.slug } else { r.id == item.id }
		});
		if already {
			return Ok(());
		}

		stored.required_by.push(item.as_required_by());
		self.store.update(&stored)?;
		log::info!("recorded {} as requiring {}", item.slug, stored.slug);
		Ok(())
	}
}
