use modpack_rs::Error;
use modpack_rs::pack::*;
use modpack_rs::ledger;
use modpack_rs::ledger::RemovedFiles;
use modpack_rs::config::ProjectPaths;
use modpack_rs::store::{ContentStore, FsStore};

use modpack_rs_test_utils::*;

#[test]
fn put_then_get_by_slug_or_id() {
	let (_dir, store) = temp_project();
	store.put(&make_item("x")).unwrap();

	assert_eq!(store.get("x").unwrap().slug, "x");
	assert_eq!(store.get("id-x").unwrap().slug, "x");
	assert!(store.exists("x"));
	assert!(store.exists("id-x"));
	assert!(!store.exists("y"));
	assert!(!store.exists(""));
}

#[test]
fn duplicate_slugs_conflict() {
	let (_dir, store) = temp_project();
	store.put(&make_item("x")).unwrap();

	let err = store.put(&make_item("x")).unwrap_err();
	assert!(matches!(err, Error::AlreadyExists(slug) if slug == "x"));
}

#[test]
fn empty_slugs_are_rejected() {
	let (_dir, store) = temp_project();
	let mut item = make_item("x");
	item.slug = String::new();

	assert!(store.put(&item).is_err());
}

#[test]
fn update_requires_presence() {
	let (_dir, store) = temp_project();
	let err = store.update(&make_item("x")).unwrap_err();
	assert!(matches!(err, Error::NotFound(_)));

	store.put(&make_item("x")).unwrap();
	let mut item = store.get("x").unwrap();
	item.required_by.push(RequiredBy {
		name: "y".to_string(),
		slug: "y".to_string(),
		id: "id-y".to_string(),
	});
	store.update(&item).unwrap();

	assert_eq!(store.get("x").unwrap().required_by.len(), 1);
}

#[test]
fn delete_keeps_index_and_records_in_step() {
	let (_dir, store) = temp_project();
	store.put(&make_item("x")).unwrap();
	assert!(store.paths().content_file("x").is_file());

	store.delete("x").unwrap();
	assert!(!store.exists("x"));
	assert!(!store.paths().content_file("x").is_file());
	assert!(matches!(store.get("x").unwrap_err(), Error::NotFound(_)));
	assert!(matches!(store.delete("x").unwrap_err(), Error::NotFound(_)));
}

#[test]
fn list_all_preserves_index_order() {
	let (_dir, store) = temp_project();
	for slug in ["c", "a", "b"] {
		store.put(&make_item(slug)).unwrap();
	}

	let slugs: Vec<String> = store.list_all().unwrap().into_iter().map(|i| i.slug).collect();
	assert_eq!(slugs, vec!["c", "a", "b"]);
}

#[test]
fn opening_a_plain_directory_fails() {
	let dir = tempfile::tempdir().unwrap();
	let err = FsStore::open(ProjectPaths::new(dir.path())).unwrap_err();
	assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn open_sees_what_init_wrote() {
	let dir = tempfile::tempdir().unwrap();
	let project = Project {
		name: "testpack".to_string(),
		author: "someone".to_string(),
		versions: ProjectVersions {
			game: "1.20.1".to_string(),
			loader: LoaderVersion { name: "fabric".to_string(), version: "0.14.21".to_string() },
		},
		..Default::default()
	};

	{
		let store = FsStore::init(ProjectPaths::new(dir.path()), &project).unwrap();
		store.put(&make_item("x")).unwrap();
	}

	let store = FsStore::open(ProjectPaths::new(dir.path())).unwrap();
	assert_eq!(store.read_project().unwrap(), project);
	assert!(store.exists("x"));

	let index = store.read_index().unwrap();
	assert_eq!(index.len(), 1);
	assert_eq!(index[0].slug, "x");
	assert_eq!(index[0].id, "id-x");
}

#[test]
fn incompat_ledger_roundtrip() {
	let (_dir, store) = temp_project();
	let paths = store.paths();

	/* Missing ledger reads as empty. */
	assert!(ledger::read_incompat(paths).unwrap().is_empty());

	let entries = vec![ledger::IncompatEntry {
		slug: "badmod".to_string(),
		id: "id-badmod".to_string(),
		content_type: ContentType::Mod,
	}];
	ledger::write_incompat(paths, &entries).unwrap();
	assert_eq!(ledger::read_incompat(paths).unwrap(), entries);
}

#[test]
fn removed_files_ledger_dedupes() {
	let (_dir, store) = temp_project();
	let paths = store.paths();

	let mut removed = RemovedFiles::load(paths).unwrap();
	assert!(removed.files.is_empty());

	removed.record("overrides/mods/a.jar");
	removed.record("overrides/mods/a.jar");
	removed.record("");
	removed.record("overrides/mods/b.jar");
	removed.save(paths).unwrap();

	let reloaded = RemovedFiles::load(paths).unwrap();
	assert_eq!(reloaded.files, vec!["overrides/mods/a.jar", "overrides/mods/b.jar"]);
}
