//! Reverse dependency ("dependents") graph.
//!
//! Edges run from a dependency to the items declaring it, so walking forward
//! from a slug yields everything that would break if that slug disappeared.
//! Both the removal engine and the bisection engine derive their closures here.

use std::collections::HashMap;

use petgraph::prelude::*;
use petgraph::visit::Dfs;

use crate::pack::ContentItem;

pub struct DependentsGraph<'a> {
	graph: DiGraphMap<&'a str, ()>,
}

impl<'a> DependentsGraph<'a> {
	/// Builds the graph from live items. Every declared dependency edge counts,
	/// whatever its type.
	pub fn from_items(items: &'a [ContentItem]) -> Self {
		let mut graph = DiGraphMap::new();
		for item in items {
			graph.add_node(item.slug.as_str());
			for dep in &item.dependencies {
				if dep.slug.is_empty() {
					continue;
				}
				graph.add_edge(dep.slug.as_str(), item.slug.as_str(), ());
			}
		}
		Self { graph }
	}

	/// Builds the graph from an already-reversed map (slug -> dependent slugs),
	/// the shape a bisection session snapshots.
	pub fn from_map(map: &'a HashMap<String, Vec<String>>) -> Self {
		let mut graph = DiGraphMap::new();
		for (slug, dependents) in map {
			graph.add_node(slug.as_str());
			for dependent in dependents {
				graph.add_edge(slug.as_str(), dependent.as_str(), ());
			}
		}
		Self { graph }
	}

	/// `start` plus every transitive dependent of it, in DFS order.
	///
	/// A visited set inside the traversal keeps this correct under dependency
	/// cycles. Unknown slugs yield just themselves.
	pub fn closure(&self, start: &str) -> Vec<String> {
		let node = match self.graph.nodes().find(|n| *n == start) {
			Some(n) => n,
			None => return vec![start.to_string()],
		};
		let mut out = Vec::new();
		let mut dfs = Dfs::new(&self.graph, node);
		while let Some(n) = dfs.next(&self.graph) {
			out.push(n.to_string());
		}
		out
	}

	/// Reverse map view of the graph (slug -> dependent slugs), the persisted
	/// shape for bisection sessions.
	pub fn to_map(items: &[ContentItem]) -> HashMap<String, Vec<String>> {
		let mut map: HashMap<String, Vec<String>> = HashMap::new();
		for item in items {
			for dep in &item.dependencies {
				if dep.slug.is_empty() {
					continue;
				}
				map.entry(dep.slug.clone()).or_default().push(item.slug.clone());
			}
		}
		map
	}
}
