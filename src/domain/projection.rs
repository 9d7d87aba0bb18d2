//! Display projections of the topic hierarchy.
//!
//! A [`TopicView`] is a disposable, owned copy of (part of) the tree, built
//! for navigation. Views are rebuilt rather than patched and never write back
//! into the [`TopicArena`].

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::TopicArena;

/// Node of a display tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicView {
    pub title: String,
    /// Whether a navigator should show the children of this node
    pub expanded: bool,
    pub children: Vec<TopicView>,
}

impl TopicView {
    /// Number of nodes in this view, self included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TopicView::node_count).sum::<usize>()
    }

    /// Titles in pre-order, self first.
    pub fn titles(&self) -> Vec<&str> {
        let mut titles = Vec::with_capacity(self.node_count());
        self.collect_titles(&mut titles);
        titles
    }

    fn collect_titles<'a>(&'a self, titles: &mut Vec<&'a str>) {
        titles.push(&self.title);
        for child in &self.children {
            child.collect_titles(titles);
        }
    }

    /// Same titles in the same shape; expansion state is ignored.
    pub fn same_structure(&self, other: &TopicView) -> bool {
        self.title == other.title
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_structure(b))
    }

    /// Depth-first search below (and including) this node.
    pub fn find(&self, title: &str) -> Option<&TopicView> {
        if self.title == title {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(title))
    }

    /// Expands or collapses every descendant. The node itself is left alone.
    pub fn set_expanded_all(&mut self, expanded: bool) {
        for child in &mut self.children {
            child.expanded = expanded;
            child.set_expanded_all(expanded);
        }
    }
}

/// Full projection: one view node per topic, child order preserved.
///
/// The root view is expanded; every other node starts collapsed.
#[instrument(level = "debug", skip(tree))]
pub fn build(tree: &TopicArena) -> TopicView {
    let mut root = build_node(tree, tree.root());
    root.expanded = true;
    root
}

fn build_node(tree: &TopicArena, idx: Index) -> TopicView {
    TopicView {
        title: tree.title(idx).unwrap_or_default().to_string(),
        expanded: false,
        children: tree
            .children(idx)
            .iter()
            .map(|&child| build_node(tree, child))
            .collect(),
    }
}

/// Filtered projection: keeps the branches whose node or some descendant has
/// a title containing `key`, ignoring case.
///
/// Kept nodes are expanded so matches are visible. The root is always kept.
/// Each subtree is tested once, bottom-up.
#[instrument(level = "debug", skip(tree))]
pub fn filter(tree: &TopicArena, key: &str) -> TopicView {
    let key = key.to_lowercase();
    let root = tree.root();
    TopicView {
        title: tree.title(root).unwrap_or_default().to_string(),
        expanded: true,
        children: tree
            .children(root)
            .iter()
            .filter_map(|&child| filter_node(tree, child, &key))
            .collect(),
    }
}

fn filter_node(tree: &TopicArena, idx: Index, key: &str) -> Option<TopicView> {
    let title = tree.title(idx)?;
    let children: Vec<TopicView> = tree
        .children(idx)
        .iter()
        .filter_map(|&child| filter_node(tree, child, key))
        .collect();

    if children.is_empty() && !title.to_lowercase().contains(key) {
        return None;
    }
    Some(TopicView {
        title: title.to_string(),
        expanded: true,
        children,
    })
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// Renders what a navigator would show: children of collapsed nodes are
/// hidden and summarized as `[+N]`.
impl TreeNodeConvert for TopicView {
    fn to_tree_string(&self) -> Tree<String> {
        let mut label = if self.title.is_empty() {
            ".".to_string()
        } else {
            self.title.clone()
        };

        if !self.expanded && !self.children.is_empty() {
            label.push_str(&format!(" [+{}]", self.node_count() - 1));
            return Tree::new(label);
        }

        let leaves: Vec<_> = self
            .children
            .iter()
            .map(TreeNodeConvert::to_tree_string)
            .collect();

        Tree::new(label).with_leaves(leaves)
    }
}
