//! A linked install (instance) of the game.
//!
//! Content files inside an instance are toggled purely by filename: an enabled
//! file carries its normal name, a disabled one the same name plus
//! [`DISABLED_SUFFIX`]. Everything here operates on that convention.

use crate::pack::*;
use crate::error::*;

/// Appended to a content file's name to stop the game loading it.
pub const DISABLED_SUFFIX: &str = ".disabled";

/// Result of checking one deployed content file against its recorded hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
	Ok,
	Missing,
	HashMismatch,
	/// The item carries no sha256 to check against.
	Unverifiable,
}

#[derive(Debug)]
pub struct GameInstance {
	path: std::path::PathBuf,
}

impl GameInstance {
	pub fn new(game_root_directory: impl AsRef<std::path::Path>) -> Result<GameInstance> {
		let game_root_directory = game_root_directory.as_ref();
		std::fs::metadata(game_root_directory)?; // Gives the user more info compared to using `exists()`
		Ok(GameInstance { path: game_root_directory.to_path_buf() })
	}

	pub fn game_dir(&self) -> &std::path::Path {
		&self.path
	}

	/// Folder a kind of content deploys into within this instance.
	pub fn content_dir(&self, content_type: ContentType) -> std::path::PathBuf {
		self.path.join(content_type.folder_name())
	}

	pub fn mods_dir(&self) -> std::path::PathBuf {
		self.content_dir(ContentType::Mod)
	}

	/// Strips [`DISABLED_SUFFIX`] from every file in the mods directory.
	///
	/// Returns per-file failure descriptions; one bad rename does not stop the
	/// pass. Running this on an already-restored directory is a no-op.
	pub fn enable_all_mods(&self) -> Result<Vec<String>> {
		let mods_dir = self.mods_dir();
		let mut failures = Vec::new();

		for entry in std::fs::read_dir(&mods_dir)? {
			let entry = match entry {
				Ok(entry) => entry,
				Err(e) => {
					failures.push(format!("{}: {}", mods_dir.display(), e));
					continue;
				},
			};
			let name = entry.file_name().to_string_lossy().to_string();
			if let Some(enabled) = name.strip_suffix(DISABLED_SUFFIX) {
				log::trace!("enabling {} in {}", enabled, self.path.display());
				if let Err(e) = std::fs::rename(entry.path(), mods_dir.join(enabled)) {
					failures.push(format!("{}: {}", name, e));
				}
			}
		}

		Ok(failures)
	}

	/// Renames one mod file to its disabled variant. Returns whether anything
	/// was renamed; a file that is absent (or already disabled) is left alone.
	pub fn disable_mod(&self, filename: &str) -> std::io::Result<bool> {
		let enabled = self.mods_dir().join(filename);
		if !enabled.is_file() {
			return Ok(false);
		}
		log::trace!("disabling {} in {}", filename, self.path.display());
		let disabled = self.mods_dir().join(format!("{}{}", filename, DISABLED_SUFFIX));
		std::fs::rename(enabled, disabled)?;
		Ok(true)
	}

	/// Checks an item's deployed file against its recorded sha256. Either the
	/// enabled or the disabled variant of the file counts as present.
	pub fn verify_file(&self, item: &ContentItem) -> Result<FileStatus> {
		if item.file.hashes.sha256.is_empty() {
			return Ok(FileStatus::Unverifiable);
		}

		let enabled = self.content_dir(item.content_type).join(&item.file.filename);
		let disabled = self.content_dir(item.content_type)
			.join(format!("{}{}", item.file.filename, DISABLED_SUFFIX));
		let path = if enabled.is_file() {
			enabled
		} else if disabled.is_file() {
			disabled
		} else {
			return Ok(FileStatus::Missing);
		};

		let digest = sha256::try_digest(path.as_path())?;
		if digest.eq_ignore_ascii_case(&item.file.hashes.sha256) {
			Ok(FileStatus::Ok)
		} else {
			Ok(FileStatus::HashMismatch)
		}
	}
}
