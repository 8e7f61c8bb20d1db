use serde::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyType {
	#[default] Required,
	Optional,
	Embedded,
	Incompatible,
}

/// One edge of an item's declared dependency list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
	pub name: String,
	pub slug: String,
	pub id: String,
	pub dependency_type: DependencyType,
}

impl Dependency {
	/// Stable identity for dedup and provider lookups. Empty when the provider
	/// supplied neither a slug nor an id.
	pub fn key(&self) -> &str {
		if self.slug.is_empty() { &self.id } else { &self.slug }
	}
}

/// Back-reference to an item that requires this one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequiredBy {
	pub name: String,
	pub slug: String,
	pub id: String,
}
