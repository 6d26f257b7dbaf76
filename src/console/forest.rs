//! Rebuild parent→children edges from a flat node list.
//!
//! A node is a root when its parent is null, itself, or not in the list
//! (the server uses 0 as the sentinel above the real root). Nodes caught
//! in a parent cycle are promoted to roots so nothing is lost.
//!
//! Edges are kept as indices and every walk uses an explicit stack, so
//! arbitrarily deep chains are fine.

use std::collections::HashMap;

use crate::api::CategoryNode;

/// Deepest level a display nests to. Anything below is shown as
/// siblings at this level, in pre-order.
pub const MAX_DISPLAY_DEPTH: usize = 64;

/// One node in pre-order, with its distance from its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestEntry<'a> {
    pub node: &'a CategoryNode,
    pub depth: usize,
}

impl ForestEntry<'_> {
    pub fn display_depth(&self) -> usize {
        self.depth.min(MAX_DISPLAY_DEPTH)
    }
}

#[derive(Debug, Clone)]
pub struct Forest<'a> {
    nodes: &'a [CategoryNode],
    roots: Vec<usize>,
    children: Vec<Vec<usize>>,
}

impl<'a> Forest<'a> {
    pub fn build(nodes: &'a [CategoryNode]) -> Self {
        let ids: HashMap<i64, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();

        let mut claimed: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut candidates = Vec::new();
        for (i, n) in nodes.iter().enumerate() {
            match n.parent.and_then(|p| ids.get(&p).copied()) {
                Some(p) if nodes[p].id != n.id => claimed[p].push(i),
                _ => candidates.push(i),
            }
        }

        let mut forest = Forest {
            nodes,
            roots: Vec::new(),
            children: vec![Vec::new(); nodes.len()],
        };
        let mut visited = vec![false; nodes.len()];
        for root in candidates {
            forest.attach(root, &claimed, &mut visited);
        }
        // Whatever is left hangs off a cycle.
        for i in 0..nodes.len() {
            if !visited[i] {
                forest.attach(i, &claimed, &mut visited);
            }
        }
        forest
    }

    fn attach(&mut self, root: usize, claimed: &[Vec<usize>], visited: &mut [bool]) {
        visited[root] = true;
        self.roots.push(root);
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            for &child in &claimed[i] {
                if !visited[child] {
                    visited[child] = true;
                    self.children[i].push(child);
                    stack.push(child);
                }
            }
        }
    }

    pub fn roots(&self) -> impl Iterator<Item = &'a CategoryNode> + '_ {
        let nodes = self.nodes;
        self.roots.iter().map(move |&i| &nodes[i])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node in pre-order: each root followed by its subtree,
    /// siblings in input order.
    pub fn walk(&self) -> Vec<ForestEntry<'a>> {
        let nodes = self.nodes;
        let mut out = Vec::with_capacity(nodes.len());
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&i| (i, 0)).collect();
        while let Some((i, depth)) = stack.pop() {
            out.push(ForestEntry {
                node: &nodes[i],
                depth,
            });
            stack.extend(self.children[i].iter().rev().map(|&c| (c, depth + 1)));
        }
        out
    }
}

pub fn build_forest(nodes: &[CategoryNode]) -> Forest<'_> {
    Forest::build(nodes)
}
