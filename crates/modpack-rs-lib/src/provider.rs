//! Provider capability.
//!
//! Search, metadata fetch and file download live with external provider
//! clients; the engines only depend on this trait and treat each failed fetch
//! as a bounded local failure.

use crate::pack::ContentItem;
use crate::error::*;

pub trait ProviderClient {
	/// Fetch a directly requested item by slug or id.
	fn fetch_item(&self, key: &str) -> Result<ContentItem>;
	/// Fetch an item that is being pulled in as a dependency of another.
	fn fetch_dependency_item(&self, key: &str) -> Result<ContentItem>;
	/// Download the item's content file to `dest`.
	fn download(&self, item: &ContentItem, dest: &std::path::Path) -> Result<()>;
}
