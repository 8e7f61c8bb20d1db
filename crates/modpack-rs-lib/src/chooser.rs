//! Decision capability.
//!
//! The engines compute candidate sets and surface them here as typed options;
//! how the answer is obtained (terminal prompt, GUI, a script) is entirely the
//! implementor's business. The engines never format user-facing text.

use crate::pack::*;
use crate::error::*;

/// Answer to the incompatibility screen run before an add.
#[derive(Debug, Clone, PartialEq)]
pub enum IncompatResolution {
	/// Remove every conflicting item already in the pack.
	RemoveAll,
	/// Add the new item anyway, conflicts and all.
	Continue,
	/// Abort the add.
	Cancel,
	/// Remove only the named slugs.
	RemoveSubset(Vec<String>),
}

/// Answer to "other items depend on the one being removed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentHandling {
	/// Remove the dependents along with the target.
	RemoveAll,
	/// Remove only the target, leaving its dependents with broken edges.
	RemoveAnyway,
	/// Abort the removal.
	Cancel,
}

pub trait Chooser {
	/// Conflicting items were found in the pack while adding something new.
	fn resolve_incompatibilities(&self, conflicts: &[Dependency]) -> Result<IncompatResolution>;
	/// Pick which of `candidates` to pull in. Only called on interactive adds;
	/// the returned subset may be empty.
	fn select_dependencies(&self, candidates: &[Dependency]) -> Result<Vec<Dependency>>;
	/// Decide what happens to the items depending on `target`.
	fn handle_dependents(&self, target: &ContentItem, dependents: &[ContentItem]) -> Result<DependentHandling>;
	/// Whether to also remove dependencies orphaned by the pending removal.
	fn confirm_orphan_removal(&self, orphans: &[ContentItem]) -> Result<bool>;
}
