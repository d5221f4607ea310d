// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fundamental cycle basis of a wall graph.
//!
//! A depth-first spanning forest is grown from each unvisited node in index
//! order. Every edge left out of the forest closes exactly one cycle: the
//! tree path between its endpoints plus the edge itself. Because
//! [`LayoutGraph::build`] numbers nodes and edges canonically, the resulting
//! basis is identical for any ordering of the input walls.

use crate::graph::LayoutGraph;
use crate::types::Point2D;

/// One independent closed loop of walls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Node indices in walk order; the walk closes back to the first node.
    pub nodes: Vec<usize>,
    /// Quantized points matching `nodes`.
    pub vertices: Vec<Point2D>,
    /// Edge indices traversed, ending with the non-tree edge that closes the loop.
    pub edges: Vec<usize>,
}

impl Cycle {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Spanning forest with parent links for path reconstruction.
struct SpanningForest {
    /// (parent node, edge to parent); `None` for roots.
    parent: Vec<Option<(usize, usize)>>,
    depth: Vec<usize>,
    tree_edge: Vec<bool>,
}

impl SpanningForest {
    fn build(graph: &LayoutGraph) -> Self {
        let n = graph.node_count();
        let mut visited = vec![false; n];
        let mut forest = Self {
            parent: vec![None; n],
            depth: vec![0; n],
            tree_edge: vec![false; graph.edge_count()],
        };

        for root in 0..n {
            if visited[root] {
                continue;
            }
            visited[root] = true;
            let mut stack = vec![root];

            while let Some(node) = stack.pop() {
                for &(neighbor, edge) in graph.neighbors(node) {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        forest.parent[neighbor] = Some((node, edge));
                        forest.depth[neighbor] = forest.depth[node] + 1;
                        forest.tree_edge[edge] = true;
                        stack.push(neighbor);
                    }
                }
            }
        }

        forest
    }

    /// Walks the tree path `u → lca → v` and closes it with `closing_edge`.
    fn close_cycle(&self, u: usize, v: usize, closing_edge: usize) -> (Vec<usize>, Vec<usize>) {
        let mut left = vec![u];
        let mut left_edges = Vec::new();
        let mut right = vec![v];
        let mut right_edges = Vec::new();
        let (mut a, mut b) = (u, v);

        while a != b {
            if self.depth[a] >= self.depth[b] {
                let Some((p, e)) = self.parent[a] else { break };
                left_edges.push(e);
                left.push(p);
                a = p;
            } else {
                let Some((p, e)) = self.parent[b] else { break };
                right_edges.push(e);
                right.push(p);
                b = p;
            }
        }

        // Both walks end on the common ancestor; keep it once.
        right.pop();
        right.reverse();
        right_edges.reverse();

        let mut nodes = left;
        nodes.extend(right);
        let mut edges = left_edges;
        edges.extend(right_edges);
        edges.push(closing_edge);
        (nodes, edges)
    }
}

/// Computes the fundamental cycle basis, one cycle per non-tree edge.
///
/// Returns `E - V + components` cycles. Parallel walls produce two-node
/// cycles; isolated walls and open chains produce none.
pub fn fundamental_cycles(graph: &LayoutGraph) -> Vec<Cycle> {
    let forest = SpanningForest::build(graph);

    graph
        .edges
        .iter()
        .enumerate()
        .filter(|&(idx, _)| !forest.tree_edge[idx])
        .map(|(idx, edge)| {
            let (nodes, edges) = forest.close_cycle(edge.source, edge.target, idx);
            let vertices = nodes.iter().map(|&n| graph.point(n)).collect();
            Cycle {
                nodes,
                vertices,
                edges,
            }
        })
        .collect()
}
