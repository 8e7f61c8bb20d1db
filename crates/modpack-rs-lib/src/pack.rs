//! Various types associated with pack content.

mod content;
pub use content::ContentItem;
pub use content::FileData;
pub use content::FileHashes;
pub use content::ContentType;
pub use content::ModSide;
pub use content::Source;

mod dependency;
pub use dependency::Dependency;
pub use dependency::DependencyType;
pub use dependency::RequiredBy;

mod project;
pub use project::Project;
pub use project::ProjectVersions;
pub use project::LoaderVersion;
