//! Dependency-aware bisection over a linked game instance.
//!
//! A session walks `Inactive -> Active -> Finished`: [`BisectState::create`]
//! snapshots the pack, each round [`BisectState::next_step`] picks roughly half
//! of the remaining suspects to switch off (dragging their dependents along so
//! the instance still boots), [`BisectState::apply_current_step`] renames the
//! files, and the recorded good/bad outcomes narrow the candidate set until at
//! most one slug remains.
//!
//! The persisted session file is the single source of truth: every derived set
//! is recomputed from `history`, so a crash between steps loses nothing and
//! applying a step twice converges to the same on-disk state. The file's
//! presence is what makes a session "active"; [`BisectState::finish`] restores
//! the instance and deletes it.

use std::collections::{HashMap, HashSet};

use serde::*;

use crate::pack::*;
use crate::error::*;
use crate::config::ProjectPaths;
use crate::depgraph::DependentsGraph;
use crate::game_instance::GameInstance;

/// Outcome of testing the instance with one step's configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
	#[default] Unknown,
	/// The issue went away with this step's mods disabled.
	Good,
	/// The issue persisted with this step's mods disabled.
	Bad,
}

/// One round of the bisection. `disabled_mods` and `enabled_mods` partition
/// the session's full mod set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BisectStep {
	pub disabled_mods: Vec<String>,
	pub enabled_mods: Vec<String>,
	pub test_result: TestResult,
}

/// The whole persisted state of one fault-isolation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BisectState {
	/// Game folder being tested.
	pub linked_instance: std::path::PathBuf,
	/// Every slug present when the session started. Immutable for the
	/// session's lifetime; all derived sets are filtered views of it.
	pub all_mods: Vec<String>,
	pub history: Vec<BisectStep>,
	/// Index into `history`; `None` before the first step.
	pub current_step: Option<usize>,
	/// slug -> slugs declaring a dependency on it, computed once at creation.
	pub dependencies: HashMap<String, Vec<String>>,
	/// slug -> content filename inside the instance mods folder.
	pub mod_files: HashMap<String, String>,
	pub created: String,
}

impl BisectState {
	/// Snapshots `all_items` into a fresh session against `linked_instance`.
	pub fn create(linked_instance: impl Into<std::path::PathBuf>, all_items: &[ContentItem]) -> Self {
		let mut all_mods = Vec::with_capacity(all_items.len());
		let mut mod_files = HashMap::new();
		for item in all_items {
			all_mods.push(item.slug.clone());
			mod_files.insert(item.slug.clone(), item.file.filename.clone());
		}

		Self {
			linked_instance: linked_instance.into(),
			all_mods,
			history: Vec::new(),
			current_step: None,
			dependencies: DependentsGraph::to_map(all_items),
			mod_files,
			created: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
		}
	}

	/* Session file handling. */

	pub fn is_active(paths: &ProjectPaths) -> bool {
		paths.bisect_file().is_file()
	}

	pub fn load(paths: &ProjectPaths) -> Result<Self> {
		let path = paths.bisect_file();
		if !path.is_file() {
			return Err(Error::NotFound("no active bisection".to_string()));
		}
		let f = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(f)?)
	}

	pub fn save(&self, paths: &ProjectPaths) -> Result<()> {
		let f = std::fs::File::create(paths.bisect_file())?;
		serde_json::to_writer_pretty(f, self)?;
		Ok(())
	}

	pub fn delete(paths: &ProjectPaths) -> Result<()> {
		match std::fs::remove_file(paths.bisect_file()) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e.into()),
		}
	}

	/* Candidate derivation. */

	/// Slugs that could still be causing the issue, in `all_mods` order.
	///
	/// A `good` step clears its disabled mods (things worked without them), a
	/// `bad` step clears its enabled mods (the symptom survived them), an
	/// unscored step contributes nothing.
	pub fn current_candidates(&self) -> Vec<String> {
		if self.history.is_empty() {
			return self.all_mods.clone();
		}

		let mut candidates: HashSet<&str> = self.all_mods.iter().map(String::as_str).collect();
		for step in &self.history {
			match step.test_result {
				TestResult::Good => {
					for slug in &step.disabled_mods {
						candidates.remove(slug.as_str());
					}
				},
				TestResult::Bad => {
					for slug in &step.enabled_mods {
						candidates.remove(slug.as_str());
					}
				},
				TestResult::Unknown => {},
			}
		}

		self.all_mods
			.iter()
			.filter(|slug| candidates.contains(slug.as_str()))
			.cloned()
			.collect()
	}

	/// Computes the next disabled/enabled partition without recording it.
	///
	/// Fails with [`Error::BisectionComplete`] once at most one candidate
	/// remains. The returned disabled set is closed under "depends on a
	/// disabled mod" over the whole snapshot, so no enabled mod is left with a
	/// dead dependency.
	pub fn next_step(&self) -> Result<(Vec<String>, Vec<String>)> {
		let candidates = self.current_candidates();
		if candidates.len() <= 1 {
			return Err(Error::BisectionComplete);
		}

		let graph = DependentsGraph::from_map(&self.dependencies);
		let seeds = select_for_disabling(&candidates, &graph);

		/* Anything depending on a disabled seed goes dark with it. */
		let mut disabled: HashSet<String> = HashSet::new();
		for seed in &seeds {
			disabled.extend(graph.closure(seed));
		}

		let disabled_mods: Vec<String> = self.all_mods
			.iter()
			.filter(|slug| disabled.contains(slug.as_str()))
			.cloned()
			.collect();
		let enabled_mods: Vec<String> = self.all_mods
			.iter()
			.filter(|slug| !disabled.contains(slug.as_str()))
			.cloned()
			.collect();

		Ok((disabled_mods, enabled_mods))
	}

	/* Step lifecycle. */

	/// Appends a new unscored step and moves the cursor onto it.
	pub fn add_step(&mut self, disabled: Vec<String>, enabled: Vec<String>) {
		self.history.push(BisectStep {
			disabled_mods: disabled,
			enabled_mods: enabled,
			test_result: TestResult::Unknown,
		});
		self.current_step = Some(self.history.len() - 1);
	}

	pub fn current(&self) -> Option<&BisectStep> {
		self.current_step.and_then(|i| self.history.get(i))
	}

	/// Scores the current step. A step can only be scored once, and only with
	/// a known outcome.
	pub fn record_result(&mut self, outcome: TestResult) -> Result<()> {
		if outcome == TestResult::Unknown {
			return Err(Error::InvalidState("a test outcome must be good or bad".to_string()));
		}
		let step = self.current_step
			.and_then(|i| self.history.get_mut(i))
			.ok_or_else(|| Error::InvalidState("no current step to record a result for".to_string()))?;
		if step.test_result != TestResult::Unknown {
			return Err(Error::InvalidState("current step already has a recorded result".to_string()));
		}
		step.test_result = outcome;
		Ok(())
	}

	/// Moves the cursor back one step. Navigation only: history is untouched
	/// and the caller re-applies to sync the instance.
	pub fn go_to_previous_step(&mut self) -> Result<()> {
		match self.current_step {
			Some(i) if i > 0 => {
				self.current_step = Some(i - 1);
				Ok(())
			},
			_ => Err(Error::InvalidState("already at the first step".to_string())),
		}
	}

	/* Instance file handling. */

	/// Brings the instance's mods folder in line with the current step:
	/// everything is re-enabled first, then the step's disabled files are
	/// renamed away. Slugs with no known file are skipped with a warning.
	///
	/// Idempotent: re-running after a crash converges to the same state.
	/// Per-file failures are aggregated; `history` is never touched here.
	pub fn apply_current_step(&self) -> Result<()> {
		let step = self.current()
			.ok_or_else(|| Error::InvalidState("no current step to apply".to_string()))?;

		let instance = GameInstance::new(&self.linked_instance)?;
		let mut failures = instance.enable_all_mods()?;

		for slug in &step.disabled_mods {
			let filename = match self.mod_files.get(slug) {
				Some(filename) => filename,
				None => {
					log::warn!("no known file for {}, skipping", slug);
					continue;
				},
			};
			if let Err(e) = instance.disable_mod(filename) {
				failures.push(format!("{}: {}", filename, e));
			}
		}

		if failures.is_empty() {
			Ok(())
		} else {
			Err(Error::InstanceFiles(failures))
		}
	}

	/// Ends the session: restores every mod file and deletes the session file.
	///
	/// Returns the remaining candidates: none means no fault was isolated, one
	/// means it was, more than one is a narrowed but inconclusive result. If
	/// the restore pass fails the session file is kept so the call can be
	/// retried.
	pub fn finish(self, paths: &ProjectPaths) -> Result<Vec<String>> {
		let candidates = self.current_candidates();

		let instance = GameInstance::new(&self.linked_instance)?;
		let failures = instance.enable_all_mods()?;
		if !failures.is_empty() {
			return Err(Error::InstanceFiles(failures));
		}

		Self::delete(paths)?;
		log::info!("bisection finished with {} candidate(s)", candidates.len());
		Ok(candidates)
	}
}

/// Picks which candidates to switch off, aiming for half the candidate set
/// after dependency expansion.
///
/// Candidates are weighed by how many candidates their dependents-closure
/// drags down with them, then greedily accepted smallest-impact first until
/// the running total reaches `max(1, candidates/2)`. A candidate already
/// covered by an earlier pick is skipped, and a pick that would overshoot
/// twice the target is refused once something is selected, so one huge subtree
/// cannot blank the whole instance.
fn select_for_disabling(candidates: &[String], graph: &DependentsGraph) -> Vec<String> {
	let target = std::cmp::max(1, candidates.len() / 2);
	let candidate_set: HashSet<&str> = candidates.iter().map(String::as_str).collect();

	let mut impacts: Vec<(&String, Vec<String>)> = candidates
		.iter()
		.map(|slug| {
			let closure: Vec<String> = graph.closure(slug)
				.into_iter()
				.filter(|s| candidate_set.contains(s.as_str()))
				.collect();
			(slug, closure)
		})
		.collect();
	impacts.sort_by_key(|(_, closure)| closure.len());

	let mut selected: Vec<String> = Vec::new();
	let mut covered: HashSet<String> = HashSet::new();
	let mut total = 0usize;

	for (slug, closure) in &impacts {
		if covered.contains(slug.as_str()) {
			continue;
		}
		if total + closure.len() > target * 2 && total > 0 {
			break;
		}
		selected.push((*slug).clone());
		covered.extend(closure.iter().cloned());
		total += closure.len();
		if total >= target {
			break;
		}
	}

	/* Degenerate impacts still have to make progress. */
	if selected.is_empty() {
		if let Some(first) = candidates.first() {
			selected.push(first.clone());
		}
	}

	selected
}
