//! Content storage.
//!
//! The engines only ever see the [`ContentStore`] trait so they can be driven
//! against fakes in tests. [`FsStore`] is the shipped implementation: a JSON
//! index plus one record file per slug, kept in lock-step.

use crate::pack::*;
use crate::error::*;

mod fs_store;
pub use fs_store::FsStore;
pub use fs_store::IndexEntry;

/// Synchronous storage of a project's content items, keyed by slug with id
/// fallback on lookups.
///
/// Callers must serialize mutating access per project; the store does not
/// provide transactional isolation between concurrent engine calls.
pub trait ContentStore {
	/// Fetch a stored item by slug, falling back to id match.
	fn get(&self, key: &str) -> Result<ContentItem>;
	/// Insert a new item. Fails with [`Error::AlreadyExists`] when the slug is
	/// already live; existing records are only ever replaced through
	/// [`ContentStore::update`].
	fn put(&self, item: &ContentItem) -> Result<()>;
	/// Replace an existing item's record. Fails with [`Error::NotFound`] when
	/// the slug is not stored.
	fn update(&self, item: &ContentItem) -> Result<()>;
	/// Remove an item by slug.
	fn delete(&self, slug: &str) -> Result<()>;
	/// Every stored item, in index order.
	fn list_all(&self) -> Result<Vec<ContentItem>>;
	/// Whether an item with this slug or id is stored. Empty keys never exist.
	fn exists(&self, key: &str) -> bool;
}
