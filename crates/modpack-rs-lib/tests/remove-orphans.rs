use modpack_rs::Error;
use modpack_rs::pack::*;
use modpack_rs::manager;
use modpack_rs::removal;
use modpack_rs::ledger::RemovedFiles;
use modpack_rs::store::ContentStore;
use modpack_rs::chooser::DependentHandling;

use modpack_rs_test_utils::*;

/// `dep`, stored as something `holder` pulled in.
fn stored_dependency_of(dep_slug: &str, holders: &[&ContentItem]) -> ContentItem {
	let mut item = make_item(dep_slug);
	item.added_as_dependency = true;
	item.required_by = holders.iter().map(|h| h.as_required_by()).collect();
	item
}

#[test]
fn removing_a_holder_keeps_declined_orphan() {
	/* Scenario: x requires y, y only exists for x's sake, the user declines
	   the orphan cleanup. */
	let (_dir, store) = temp_project();
	let x = make_item_with_deps("x", vec![require("y")]);
	let y = stored_dependency_of("y", &[&x]);
	store.put(&x).unwrap();
	store.put(&y).unwrap();

	let chooser = ScriptedChooser { remove_orphans: false, ..Default::default() };
	let outcome = manager::remove_content(&store, &chooser, store.paths(), "x").unwrap();

	assert_eq!(outcome.removed, 1);
	assert!(outcome.failures.is_empty());

	let remaining = store.list_all().unwrap();
	assert_eq!(remaining.len(), 1);
	assert_eq!(remaining[0].slug, "y");
	/* The dangling back-reference must have been repaired. */
	assert!(remaining[0].required_by.is_empty());

	let removed_files = RemovedFiles::load(store.paths()).unwrap();
	assert_eq!(removed_files.files, vec!["overrides/mods/x.jar"]);
}

#[test]
fn removing_with_dependents_cascades() {
	/* Scenario: removing y while x requires it, cascading to x. */
	let (_dir, store) = temp_project();
	let x = make_item_with_deps("x", vec![require("y")]);
	let y = stored_dependency_of("y", &[&x]);
	store.put(&x).unwrap();
	store.put(&y).unwrap();

	let chooser = ScriptedChooser { dependents: DependentHandling::RemoveAll, ..Default::default() };
	let outcome = manager::remove_content(&store, &chooser, store.paths(), "y").unwrap();

	assert_eq!(outcome.removed, 2);
	assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn cancelling_leaves_the_store_alone() {
	let (_dir, store) = temp_project();
	let x = make_item_with_deps("x", vec![require("y")]);
	let y = stored_dependency_of("y", &[&x]);
	store.put(&x).unwrap();
	store.put(&y).unwrap();

	let chooser = ScriptedChooser { dependents: DependentHandling::Cancel, ..Default::default() };
	let err = manager::remove_content(&store, &chooser, store.paths(), "y").unwrap_err();

	assert!(matches!(err, Error::Cancelled));
	assert_eq!(store.list_all().unwrap().len(), 2);
}

#[test]
fn orphans_are_removed_when_confirmed() {
	let (_dir, store) = temp_project();
	let x = make_item_with_deps("x", vec![require("y")]);
	let y = stored_dependency_of("y", &[&x]);
	store.put(&x).unwrap();
	store.put(&y).unwrap();

	let chooser = ScriptedChooser { remove_orphans: true, ..Default::default() };
	let outcome = manager::remove_content(&store, &chooser, store.paths(), "x").unwrap();

	assert_eq!(outcome.removed, 2);
	assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn dependency_with_other_holders_is_not_orphaned() {
	let (_dir, store) = temp_project();
	let x = make_item_with_deps("x", vec![require("y")]);
	let z = make_item_with_deps("z", vec![require("y")]);
	let y = stored_dependency_of("y", &[&x, &z]);
	store.put(&x).unwrap();
	store.put(&z).unwrap();
	store.put(&y).unwrap();

	let chooser = ScriptedChooser { remove_orphans: true, ..Default::default() };
	manager::remove_content(&store, &chooser, store.paths(), "x").unwrap();

	let y = store.get("y").unwrap();
	assert_eq!(y.required_by.len(), 1);
	assert_eq!(y.required_by[0].slug, "z");
}

#[test]
fn directly_requested_items_are_never_orphans() {
	let (_dir, store) = temp_project();
	let x = make_item_with_deps("x", vec![require("y")]);
	let mut y = stored_dependency_of("y", &[&x]);
	y.added_as_dependency = false;
	store.put(&x).unwrap();
	store.put(&y).unwrap();

	let chooser = ScriptedChooser { remove_orphans: true, ..Default::default() };
	manager::remove_content(&store, &chooser, store.paths(), "x").unwrap();

	assert!(store.exists("y"));
	assert!(store.get("y").unwrap().required_by.is_empty());
}

#[test]
fn dependents_discovery_is_transitive() {
	let a = make_item("a");
	let b = make_item_with_deps("b", vec![require("a")]);
	let c = make_item_with_deps("c", vec![require("b")]);
	let all = vec![a, b, c];

	let dependents = removal::find_dependents("a", &all);
	let slugs: Vec<&str> = dependents.iter().map(|i| i.slug.as_str()).collect();
	assert_eq!(slugs, vec!["b", "c"]);
}

#[test]
fn dependents_discovery_survives_cycles() {
	let a = make_item_with_deps("a", vec![require("b")]);
	let b = make_item_with_deps("b", vec![require("a")]);
	let all = vec![a, b];

	let dependents = removal::find_dependents("a", &all);
	let slugs: Vec<&str> = dependents.iter().map(|i| i.slug.as_str()).collect();
	assert_eq!(slugs, vec!["b"]);
}

#[test]
fn each_orphan_is_reported_once() {
	let x1 = make_item_with_deps("x1", vec![require("y")]);
	let x2 = make_item_with_deps("x2", vec![require("y")]);
	let y = stored_dependency_of("y", &[&x1, &x2]);
	let all = vec![x1.clone(), x2.clone(), y];

	let orphans = removal::find_orphans(&[x1, x2], &all);
	assert_eq!(orphans.len(), 1);
	assert_eq!(orphans[0].slug, "y");
}

#[test]
fn commit_continues_past_item_failures() {
	let (_dir, store) = temp_project();
	let store = FlakyStore::new(store).failing_delete("b");
	let items = [make_item("a"), make_item("b"), make_item("c")];
	for item in &items {
		store.put(item).unwrap();
	}

	let outcome = removal::commit(&store, &items, None);

	assert_eq!(outcome.removed, 2);
	assert_eq!(outcome.failures.len(), 1);
	assert_eq!(outcome.failures[0].0, "b");

	let remaining = store.list_all().unwrap();
	assert_eq!(remaining.len(), 1);
	assert_eq!(remaining[0].slug, "b");
}

#[test]
fn repair_skips_pairs_removed_together() {
	/* Both ends of the x -> y edge go in one batch; no point writing to a
	   record that is about to be deleted. */
	let (_dir, store) = temp_project();
	let x = make_item_with_deps("x", vec![require("y")]);
	let y = stored_dependency_of("y", &[&x]);
	store.put(&x).unwrap();
	store.put(&y).unwrap();

	let outcome = removal::commit(&store, &[x, y], None);
	assert_eq!(outcome.removed, 2);
	assert!(outcome.failures.is_empty());
	assert!(store.list_all().unwrap().is_empty());
}
