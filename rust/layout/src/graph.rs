// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall graph for one floor.
//!
//! - **Nodes** = distinct quantized wall endpoints
//! - **Edges** = projected wall segments
//!
//! The graph is an undirected multigraph: two walls spanning the same pair of
//! points are both kept, since each one counts towards the cycle rank.
//! [`LayoutGraph::build`] sorts nodes and edges canonically so iteration
//! order never depends on the order records arrived in.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::types::{Point2D, Segment};

/// An edge in the wall graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    /// Source node index.
    pub source: usize,
    /// Target node index.
    pub target: usize,
    /// The wall record this edge was projected from.
    pub record_index: usize,
}

/// Undirected multigraph keyed by quantized coordinates.
#[derive(Debug, Clone)]
pub struct LayoutGraph {
    pub nodes: Vec<Point2D>,
    pub edges: Vec<GraphEdge>,
    /// Adjacency list: node index → list of (neighbor index, edge index).
    adjacency: Vec<Vec<(usize, usize)>>,
    /// Map from point to node index for fast lookup.
    point_to_node: FxHashMap<Point2D, usize>,
}

impl LayoutGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
            point_to_node: FxHashMap::default(),
        }
    }

    /// Builds a graph from projected segments in canonical order.
    ///
    /// Nodes are numbered in lexicographic point order and edges follow the
    /// sorted segment order (endpoints first, record index last), so any
    /// permutation of the same segments yields the same node numbering and
    /// the same edge geometry sequence.
    pub fn build(segments: &[Segment]) -> Result<Self> {
        let mut sorted = segments.to_vec();
        sorted.sort_unstable();

        let mut points: Vec<Point2D> = sorted
            .iter()
            .flat_map(|s| [s.start(), s.end()])
            .collect();
        points.sort_unstable();
        points.dedup();

        let mut graph = Self::new();
        for point in points {
            graph.add_node(point);
        }
        for segment in &sorted {
            let source = graph.add_node(segment.start());
            let target = graph.add_node(segment.end());
            graph.add_edge(source, target, segment.record_index)?;
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built wall graph"
        );
        Ok(graph)
    }

    // =========================================================================
    // Graph mutation
    // =========================================================================

    /// Adds a node for `point`, or returns the existing one.
    pub fn add_node(&mut self, point: Point2D) -> usize {
        if let Some(&idx) = self.point_to_node.get(&point) {
            return idx;
        }
        let idx = self.nodes.len();
        self.point_to_node.insert(point, idx);
        self.nodes.push(point);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Adds an undirected edge between two nodes.
    ///
    /// Parallel edges are allowed. Self-loops are rejected as zero-length
    /// walls.
    pub fn add_edge(&mut self, source: usize, target: usize, record_index: usize) -> Result<usize> {
        if source == target {
            return Err(Error::DegenerateSegment {
                index: record_index,
                point: self.nodes[source],
            });
        }
        let idx = self.edges.len();
        self.edges.push(GraphEdge {
            source,
            target,
            record_index,
        });
        self.adjacency[source].push((target, idx));
        self.adjacency[target].push((source, idx));
        Ok(idx)
    }

    // =========================================================================
    // Graph accessors
    // =========================================================================

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node index for a point.
    pub fn node_index(&self, point: Point2D) -> Option<usize> {
        self.point_to_node.get(&point).copied()
    }

    /// Returns the point stored at a node.
    pub fn point(&self, node: usize) -> Point2D {
        self.nodes[node]
    }

    /// Returns (neighbor index, edge index) pairs in edge order.
    pub fn neighbors(&self, node: usize) -> &[(usize, usize)] {
        &self.adjacency[node]
    }

    /// Returns the degree (number of incident walls) of a node.
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Nodes touched by exactly one wall (open wall ends).
    pub fn dangling_nodes(&self) -> Vec<usize> {
        (0..self.node_count())
            .filter(|&n| self.degree(n) == 1)
            .collect()
    }

    // =========================================================================
    // Connected components
    // =========================================================================

    /// Labels every node with its component, numbered `0..` in order of
    /// each component's lowest node index.
    pub fn component_labels(&self) -> Vec<usize> {
        let n = self.node_count();
        let mut parent: Vec<usize> = (0..n).collect();

        for edge in &self.edges {
            let a = find_root(&mut parent, edge.source);
            let b = find_root(&mut parent, edge.target);
            if a != b {
                parent[a.max(b)] = a.min(b);
            }
        }

        let mut root_label: Vec<Option<usize>> = vec![None; n];
        let mut next = 0;
        (0..n)
            .map(|node| {
                let root = find_root(&mut parent, node);
                *root_label[root].get_or_insert_with(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect()
    }

    /// Number of connected components.
    pub fn component_count(&self) -> usize {
        self.component_labels()
            .into_iter()
            .max()
            .map_or(0, |last| last + 1)
    }

    /// Number of independent cycles: `E - V + components`.
    pub fn cycle_rank(&self) -> usize {
        self.edge_count() + self.component_count() - self.node_count()
    }
}

impl Default for LayoutGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn find_root(parent: &mut [usize], mut node: usize) -> usize {
    while parent[node] != node {
        parent[node] = parent[parent[node]];
        node = parent[node];
    }
    node
}
