//! Locations of everything a project persists.

/// Resolves the files making up an on-disk modpack project from its root directory.
///
/// All engine and store code goes through these accessors so the layout is decided
/// in exactly one place.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
	root: std::path::PathBuf,
}

impl ProjectPaths {
	pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &std::path::Path {
		&self.root
	}

	/// Project metadata.
	pub fn project_file(&self) -> std::path::PathBuf {
		self.root.join("pack.json")
	}

	/// Ordered index of every stored item.
	pub fn index_file(&self) -> std::path::PathBuf {
		self.root.join("content.sum.json")
	}

	/// Directory holding one full record per slug.
	pub fn content_dir(&self) -> std::path::PathBuf {
		self.root.join("content")
	}

	pub fn content_file(&self, slug: &str) -> std::path::PathBuf {
		self.content_dir().join(format!("{}.json", slug))
	}

	/// Ledger of items flagged incompatible during adds.
	pub fn incompat_file(&self) -> std::path::PathBuf {
		self.root.join("incompat.sum.json")
	}

	/// Ledger of removed content files, consumed by instance syncing.
	pub fn removed_files_file(&self) -> std::path::PathBuf {
		self.root.join("removed-files.json")
	}

	/// Serialized bisection session. Its presence is the "session active" signal.
	pub fn bisect_file(&self) -> std::path::PathBuf {
		self.root.join("bisect.json")
	}
}
