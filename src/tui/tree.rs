//! Foldable category tree, tui-tree-widget integration.
//!
//! ```text
//! v 0  root
//!   v 1  Electronics
//!       2  Phones
//!       3  Laptops
//!   > 4  Books          ← collapsed
//! ```
//!
//! Items are assembled bottom-up from the pre-order walk with an explicit
//! stack. Nesting stops at `MAX_DISPLAY_DEPTH`.

use std::io;

use tui_tree_widget::TreeItem;

use crate::api::CategoryNode;
use crate::console::forest::{build_forest, ForestEntry};

/// Tree label for one category.
pub fn node_label(node: &CategoryNode) -> String {
    format!("{}  {}", node.id, node.name)
}

struct Pending {
    identifier: String,
    label: String,
    children: Vec<TreeItem<'static, String>>,
}

impl Pending {
    fn new(entry: &ForestEntry<'_>) -> Self {
        Self {
            identifier: entry.node.id.to_string(),
            label: node_label(entry.node),
            children: Vec::new(),
        }
    }

    fn finish(self) -> io::Result<TreeItem<'static, String>> {
        if self.children.is_empty() {
            Ok(TreeItem::new_leaf(self.identifier, self.label))
        } else {
            TreeItem::new(self.identifier, self.label, self.children)
        }
    }
}

/// Pop the innermost pending item into its parent (or the top level).
fn close_one(
    stack: &mut Vec<Pending>,
    top: &mut Vec<TreeItem<'static, String>>,
) -> io::Result<()> {
    if let Some(done) = stack.pop() {
        let item = done.finish()?;
        match stack.last_mut() {
            Some(parent) => parent.children.push(item),
            None => top.push(item),
        }
    }
    Ok(())
}

/// Build widget items from a flat node list. Fails only if two siblings
/// share an id.
pub fn build_category_tree(nodes: &[CategoryNode]) -> io::Result<Vec<TreeItem<'static, String>>> {
    let mut top = Vec::new();
    let mut stack: Vec<Pending> = Vec::new();
    for entry in build_forest(nodes).walk() {
        while stack.len() > entry.display_depth() {
            close_one(&mut stack, &mut top)?;
        }
        stack.push(Pending::new(&entry));
    }
    while !stack.is_empty() {
        close_one(&mut stack, &mut top)?;
    }
    Ok(top)
}

/// Identifier paths of every node with children, used to show the
/// whole forest expanded after a refresh.
pub fn expandable_paths(nodes: &[CategoryNode]) -> Vec<Vec<String>> {
    let walk = build_forest(nodes).walk();
    let mut paths = Vec::new();
    let mut prefix: Vec<String> = Vec::new();
    for (i, entry) in walk.iter().enumerate() {
        let depth = entry.display_depth();
        prefix.truncate(depth);
        prefix.push(entry.node.id.to_string());
        let has_children = walk
            .get(i + 1)
            .is_some_and(|next| next.display_depth() > depth);
        if has_children {
            paths.push(prefix.clone());
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::forest::MAX_DISPLAY_DEPTH;

    fn sample() -> Vec<CategoryNode> {
        vec![
            CategoryNode::new(0, "root", None),
            CategoryNode::new(1, "Electronics", Some(0)),
            CategoryNode::new(2, "Phones", Some(1)),
            CategoryNode::new(4, "Books", Some(0)),
        ]
    }

    fn chain(len: i64) -> Vec<CategoryNode> {
        (0..len)
            .map(|i| CategoryNode::new(i, "x", if i == 0 { None } else { Some(i - 1) }))
            .collect()
    }

    #[test]
    fn builds_single_root() {
        let items = build_category_tree(&sample()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identifier(), "0");
        assert_eq!(items[0].children().len(), 2);
        assert_eq!(items[0].children()[0].identifier(), "1");
        assert_eq!(items[0].children()[0].children()[0].identifier(), "2");
        assert_eq!(items[0].children()[1].identifier(), "4");
    }

    #[test]
    fn empty_list_builds_nothing() {
        assert!(build_category_tree(&[]).unwrap().is_empty());
    }

    #[test]
    fn duplicate_sibling_ids_rejected() {
        let nodes = vec![
            CategoryNode::new(0, "root", None),
            CategoryNode::new(1, "A", Some(0)),
            CategoryNode::new(1, "B", Some(0)),
        ];
        assert!(build_category_tree(&nodes).is_err());
    }

    #[test]
    fn expandable_paths_cover_internal_nodes() {
        let paths = expandable_paths(&sample());
        assert_eq!(
            paths,
            vec![vec!["0".to_string()], vec!["0".to_string(), "1".to_string()]]
        );
    }

    #[test]
    fn deep_chain_nests_to_the_display_limit() {
        let nodes = chain(5_000);
        let items = build_category_tree(&nodes).unwrap();
        assert_eq!(items.len(), 1);

        let mut item = &items[0];
        let mut levels = 0;
        while let Some(child) = item.children().first() {
            item = child;
            levels += 1;
        }
        assert_eq!(levels, MAX_DISPLAY_DEPTH);

        let paths = expandable_paths(&nodes);
        assert_eq!(paths.len(), MAX_DISPLAY_DEPTH);
    }

    #[test]
    fn label_format() {
        assert_eq!(node_label(&CategoryNode::new(7, "Toys", Some(0))), "7  Toys");
    }
}
