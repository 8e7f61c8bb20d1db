use modpack_rs::pack::*;
use modpack_rs::manager;
use modpack_rs::store::ContentStore;
use modpack_rs::game_instance::{GameInstance, FileStatus, DISABLED_SUFFIX};

use modpack_rs_test_utils::*;

#[test]
fn missing_instance_directories_are_rejected() {
	assert!(GameInstance::new("/definitely/not/here").is_err());
}

#[test]
fn disable_and_enable_rename_by_suffix() {
	let dir = temp_instance(&["a.jar", "b.jar"]);
	let instance = GameInstance::new(dir.path()).unwrap();

	assert!(instance.disable_mod("a.jar").unwrap());
	assert!(!instance.disable_mod("missing.jar").unwrap());
	assert!(dir.path().join("mods").join(format!("a.jar{}", DISABLED_SUFFIX)).is_file());
	assert!(dir.path().join("mods").join("b.jar").is_file());

	let failures = instance.enable_all_mods().unwrap();
	assert!(failures.is_empty());
	assert!(dir.path().join("mods").join("a.jar").is_file());
}

#[test]
fn verify_reports_each_file_state() {
	let dir = temp_instance(&["good.jar", "tampered.jar"]);
	let instance = GameInstance::new(dir.path()).unwrap();

	/* Fixture instance files contain their own filename. */
	let mut good = make_item("good");
	good.file.hashes.sha256 = sha256::digest("good.jar");
	assert_eq!(instance.verify_file(&good).unwrap(), FileStatus::Ok);

	let mut tampered = make_item("tampered");
	tampered.file.hashes.sha256 = sha256::digest("something else entirely");
	assert_eq!(instance.verify_file(&tampered).unwrap(), FileStatus::HashMismatch);

	let mut missing = make_item("missing");
	missing.file.hashes.sha256 = sha256::digest("missing.jar");
	assert_eq!(instance.verify_file(&missing).unwrap(), FileStatus::Missing);

	let unhashed = make_item("good");
	assert_eq!(instance.verify_file(&unhashed).unwrap(), FileStatus::Unverifiable);
}

#[test]
fn disabled_files_still_count_as_present() {
	let dir = temp_instance(&["a.jar"]);
	let instance = GameInstance::new(dir.path()).unwrap();
	instance.disable_mod("a.jar").unwrap();

	let mut item = make_item("a");
	item.file.hashes.sha256 = sha256::digest("a.jar");
	assert_eq!(instance.verify_file(&item).unwrap(), FileStatus::Ok);
}

#[test]
fn verification_walks_the_whole_store() {
	let (_dir, store) = temp_project();
	let instance_dir = temp_instance(&["a.jar"]);
	let instance = GameInstance::new(instance_dir.path()).unwrap();

	let mut a = make_item("a");
	a.file.hashes.sha256 = sha256::digest("a.jar");
	store.put(&a).unwrap();
	store.put(&make_item("b")).unwrap();

	let report = manager::verify_instance(&store, &instance).unwrap();
	assert_eq!(report.len(), 2);
	assert_eq!(report[0].0.slug, "a");
	assert_eq!(report[0].1, FileStatus::Ok);
	assert_eq!(report[1].1, FileStatus::Unverifiable);
}
