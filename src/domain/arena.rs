//! Arena-backed topic hierarchy.
//!
//! Nodes live in a generational arena and refer to each other by [`Index`],
//! so removing a subtree never leaves dangling links behind.

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{Content, TitleScope, TopicDocument, TopicElement};
use crate::domain::error::DomainError;

/// Data payload of a topic node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicData {
    pub title: String,
    /// Content references attached to this topic
    pub contents: Vec<Content>,
}

impl TopicData {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            contents: Vec::new(),
        }
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TopicNode {
    pub data: TopicData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in display order
    pub children: Vec<Index>,
}

/// The whole topic hierarchy.
///
/// There is always exactly one root. The root carries the document title, is
/// never returned by title lookups and cannot be renamed, moved or removed.
#[derive(Debug, Clone)]
pub struct TopicArena {
    arena: Arena<TopicNode>,
    root: Index,
}

impl Default for TopicArena {
    fn default() -> Self {
        Self::new("")
    }
}

/// Two hierarchies are equal when titles, contents and ordering match,
/// regardless of the arena slots they occupy.
impl PartialEq for TopicArena {
    fn eq(&self, other: &Self) -> bool {
        self.to_document() == other.to_document()
    }
}

impl Eq for TopicArena {}

/// Rejects titles without any visible character and titles with characters
/// that cannot appear in an XML 1.0 document.
pub fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() || !title.chars().all(is_xml_char) {
        return Err(DomainError::InvalidTitle {
            title: title.to_string(),
        });
    }
    Ok(())
}

// XML 1.0 `Char` production; surrogates are not representable as `char`
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

impl TopicArena {
    pub fn new(root_title: impl Into<String>) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TopicNode {
            data: TopicData::new(root_title),
            parent: None,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_title(&self) -> &str {
        self.arena
            .get(self.root)
            .map(|node| node.data.title.as_str())
            .unwrap_or_default()
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// True when the root has no topics beneath it.
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    pub fn get_node(&self, idx: Index) -> Option<&TopicNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TopicNode> {
        self.arena.get_mut(idx)
    }

    pub fn title(&self, idx: Index) -> Option<&str> {
        self.get_node(idx).map(|node| node.data.title.as_str())
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.get_node(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub fn child_titles(&self, idx: Index) -> Vec<String> {
        self.children(idx)
            .iter()
            .filter_map(|&child| self.title(child))
            .map(str::to_string)
            .collect()
    }

    /// Appends a node as last child of `parent`.
    ///
    /// Returns `None` without inserting when `parent` is not in the arena.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: TopicData, parent: Index) -> Option<Index> {
        if !self.arena.contains(parent) {
            return None;
        }
        let node_idx = self.arena.insert(TopicNode {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        Some(node_idx)
    }

    /// Depth-first, pre-order search for the first topic named `title`.
    #[instrument(level = "trace", skip(self))]
    pub fn find_by_title(&self, title: &str) -> Option<Index> {
        self.iter()
            .skip(1)
            .find(|(_, node)| node.data.title == title)
            .map(|(idx, _)| idx)
    }

    /// Resolves an optional title: `None` is the root.
    pub fn resolve(&self, title: Option<&str>) -> Result<Index, DomainError> {
        match title {
            None => Ok(self.root),
            Some(title) => self
                .find_by_title(title)
                .ok_or_else(|| DomainError::not_found(title)),
        }
    }

    /// Title of the parent of `idx`; `None` when the parent is the root.
    pub fn parent_title(&self, idx: Index) -> Option<String> {
        let parent = self.get_node(idx)?.parent?;
        self.parent_label(parent)
    }

    fn parent_label(&self, parent: Index) -> Option<String> {
        if parent == self.root {
            None
        } else {
            self.title(parent).map(str::to_string)
        }
    }

    /// Checks that `title` can live under `parent` without breaking
    /// uniqueness. `except` is the node being renamed or moved.
    pub fn ensure_title_free(
        &self,
        scope: TitleScope,
        parent: Index,
        title: &str,
        except: Option<Index>,
    ) -> Result<(), DomainError> {
        let clash = match scope {
            TitleScope::Siblings => self
                .children(parent)
                .iter()
                .copied()
                .find(|&child| Some(child) != except && self.title(child) == Some(title))
                .map(|_| self.parent_label(parent)),
            TitleScope::Tree => self
                .iter()
                .skip(1)
                .find(|(idx, node)| Some(*idx) != except && node.data.title == title)
                .map(|(idx, _)| self.parent_title(idx)),
        };
        match clash {
            Some(parent) => Err(DomainError::TitleCollision {
                title: title.to_string(),
                parent,
            }),
            None => Ok(()),
        }
    }

    pub fn rename(&mut self, idx: Index, title: impl Into<String>) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.data.title = title.into();
        }
    }

    /// Detaches `idx` from its parent and drops it with all descendants.
    ///
    /// Returns the number of removed nodes. The root is never removed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> usize {
        if idx == self.root || !self.arena.contains(idx) {
            return 0;
        }
        let doomed: Vec<Index> = self.iter_postorder_from(idx).map(|(i, _)| i).collect();
        self.detach(idx);
        for victim in &doomed {
            self.arena.remove(*victim);
        }
        doomed.len()
    }

    /// Moves `idx` with its subtree to the end of `new_parent`'s children.
    ///
    /// Callers must rule out cycles first (see [`Self::is_ancestor_or_self`]).
    #[instrument(level = "debug", skip(self))]
    pub fn reparent(&mut self, idx: Index, new_parent: Index) {
        if idx == self.root || !self.arena.contains(new_parent) {
            return;
        }
        self.detach(idx);
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = Some(new_parent);
        }
        if let Some(parent) = self.arena.get_mut(new_parent) {
            parent.children.push(idx);
        }
    }

    fn detach(&mut self, idx: Index) {
        let parent = self.get_node(idx).and_then(|node| node.parent);
        if let Some(parent) = parent.and_then(|p| self.arena.get_mut(p)) {
            parent.children.retain(|&child| child != idx);
        }
    }

    /// True when `ancestor` is `idx` itself or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: Index, idx: Index) -> bool {
        let mut current = Some(idx);
        while let Some(node_idx) = current {
            if node_idx == ancestor {
                return true;
            }
            current = self.get_node(node_idx).and_then(|node| node.parent);
        }
        false
    }

    /// Number of nodes in the subtree rooted at `idx`, `idx` included.
    pub fn subtree_size(&self, idx: Index) -> usize {
        self.iter_from(idx).count()
    }

    /// Pre-order traversal starting at the root.
    pub fn iter(&self) -> TreeIterator<'_> {
        self.iter_from(self.root)
    }

    pub fn iter_from(&self, start: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, start)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        self.iter_postorder_from(self.root)
    }

    pub fn iter_postorder_from(&self, start: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, start)
    }

    /// Snapshot of the hierarchy in its persisted form.
    pub fn to_document(&self) -> TopicDocument {
        TopicDocument {
            title: self.root_title().to_string(),
            topics: self
                .children(self.root)
                .iter()
                .map(|&child| self.to_element(child))
                .collect(),
        }
    }

    fn to_element(&self, idx: Index) -> TopicElement {
        let (title, contents) = self
            .get_node(idx)
            .map(|node| (node.data.title.clone(), node.data.contents.clone()))
            .unwrap_or_default();
        TopicElement {
            title,
            contents,
            topics: self
                .children(idx)
                .iter()
                .map(|&child| self.to_element(child))
                .collect(),
        }
    }

    /// Builds a hierarchy from its persisted form, enforcing title rules.
    #[instrument(level = "debug", skip(document))]
    pub fn from_document(document: &TopicDocument, scope: TitleScope) -> Result<Self, DomainError> {
        let mut tree = Self::new(document.title.clone());
        let root = tree.root;
        for element in &document.topics {
            tree.insert_element(element, root, scope)?;
        }
        Ok(tree)
    }

    fn insert_element(
        &mut self,
        element: &TopicElement,
        parent: Index,
        scope: TitleScope,
    ) -> Result<(), DomainError> {
        validate_title(&element.title)?;
        self.ensure_title_free(scope, parent, &element.title, None)?;
        let data = TopicData {
            title: element.title.clone(),
            contents: element.contents.clone(),
        };
        let idx = self
            .insert_node(data, parent)
            .ok_or_else(|| DomainError::not_found(&element.title))?;
        for child in &element.topics {
            self.insert_element(child, idx, scope)?;
        }
        Ok(())
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TopicArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TopicArena, start: Index) -> Self {
        let mut stack = Vec::new();
        if arena.get_node(start).is_some() {
            stack.push(start);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TopicNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TopicArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TopicArena, start: Index) -> Self {
        let mut stack = Vec::new();
        if arena.get_node(start).is_some() {
            stack.push((start, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TopicNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
