//! Topic tree controller
//!
//! Owns the canonical topic hierarchy and keeps it in step with the backing
//! store. Every mutation is validated against the live tree, applied to a
//! staged copy, written through to the store and only then swapped in, so a
//! failed call never leaves a partial change behind.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, Operation};
use crate::domain::projection;
use crate::domain::{
    validate_title, Content, DomainError, TitleScope, TopicArena, TopicCommand, TopicData,
    TopicView,
};
use crate::infrastructure::traits::TopicStore;

/// Mutation and query API over the topic hierarchy.
pub struct TopicTreeController {
    tree: TopicArena,
    store: Arc<dyn TopicStore>,
    scope: TitleScope,
}

impl std::fmt::Debug for TopicTreeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicTreeController")
            .field("store", &self.store.location())
            .field("scope", &self.scope)
            .field("nodes", &self.tree.len())
            .finish()
    }
}

fn rejected(operation: Operation) -> impl FnOnce(DomainError) -> ApplicationError {
    move |source| {
        warn!(%operation, %source, "rejected");
        ApplicationError::rejected(operation, source)
    }
}

impl TopicTreeController {
    /// Load the document from `store`.
    ///
    /// Fails if the document cannot be read or breaks the title rules of
    /// `scope`.
    #[instrument(level = "debug", skip(store), fields(location = %store.location()))]
    pub fn open(store: Arc<dyn TopicStore>, scope: TitleScope) -> ApplicationResult<Self> {
        let document = store
            .load()
            .map_err(|e| ApplicationError::persistence(Operation::Load, None, e))?;
        let tree = TopicArena::from_document(&document, scope).map_err(rejected(Operation::Load))?;
        info!("loaded {} topics from {}", tree.len() - 1, store.location());
        Ok(Self { tree, store, scope })
    }

    pub fn tree(&self) -> &TopicArena {
        &self.tree
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.tree.find_by_title(title).is_some()
    }

    /// Titles of the direct children of `parent` (the root if `None`).
    #[instrument(level = "debug", skip(self))]
    pub fn get_children(&self, parent: Option<&str>) -> ApplicationResult<Vec<String>> {
        let idx = self
            .tree
            .resolve(parent)
            .map_err(rejected(Operation::Children))?;
        Ok(self.tree.child_titles(idx))
    }

    /// Size of the subtree rooted at `title`, the topic itself included.
    pub fn subtree_size(&self, title: &str) -> ApplicationResult<usize> {
        let idx = self
            .tree
            .resolve(Some(title))
            .map_err(rejected(Operation::Children))?;
        Ok(self.tree.subtree_size(idx))
    }

    pub fn contents(&self, title: &str) -> ApplicationResult<&[Content]> {
        let idx = self
            .tree
            .resolve(Some(title))
            .map_err(rejected(Operation::Contents))?;
        Ok(self
            .tree
            .get_node(idx)
            .map(|node| node.data.contents.as_slice())
            .unwrap_or_default())
    }

    /// Append a new topic under `parent` (the root if `None`).
    #[instrument(level = "debug", skip(self))]
    pub fn add_node(&mut self, title: &str, parent: Option<&str>) -> ApplicationResult<()> {
        let op = Operation::Add;
        let parent_idx = self.tree.resolve(parent).map_err(rejected(op))?;
        validate_title(title).map_err(rejected(op))?;
        self.tree
            .ensure_title_free(self.scope, parent_idx, title, None)
            .map_err(rejected(op))?;

        let mut staged = self.tree.clone();
        staged
            .insert_node(TopicData::new(title), parent_idx)
            .ok_or_else(|| DomainError::NodeNotFound {
                title: parent.unwrap_or_default().to_string(),
            })
            .map_err(rejected(op))?;
        self.commit(op, title, staged)?;
        info!("added topic {title:?}");
        Ok(())
    }

    /// Rename in place; children and contents stay attached.
    ///
    /// Renaming a topic to its current title is a no-op and does not write.
    #[instrument(level = "debug", skip(self))]
    pub fn rename_node(&mut self, old_title: &str, new_title: &str) -> ApplicationResult<()> {
        let op = Operation::Rename;
        let idx = self.tree.resolve(Some(old_title)).map_err(rejected(op))?;
        if old_title == new_title {
            debug!("rename to same title, nothing to do");
            return Ok(());
        }
        validate_title(new_title).map_err(rejected(op))?;
        let parent = self
            .tree
            .get_node(idx)
            .and_then(|node| node.parent)
            .unwrap_or_else(|| self.tree.root());
        self.tree
            .ensure_title_free(self.scope, parent, new_title, Some(idx))
            .map_err(rejected(op))?;

        let mut staged = self.tree.clone();
        staged.rename(idx, new_title);
        self.commit(op, old_title, staged)?;
        info!("renamed topic {old_title:?} to {new_title:?}");
        Ok(())
    }

    /// Remove a topic together with its entire subtree.
    ///
    /// Returns the number of removed topics. Authorization is up to the
    /// caller.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_node(&mut self, title: &str) -> ApplicationResult<usize> {
        let op = Operation::Remove;
        let idx = self.tree.resolve(Some(title)).map_err(rejected(op))?;

        let mut staged = self.tree.clone();
        let removed = staged.remove_subtree(idx);
        self.commit(op, title, staged)?;
        info!("removed topic {title:?} ({removed} topics)");
        Ok(removed)
    }

    /// Re-parent a topic (with its subtree) as last child of `new_parent`.
    ///
    /// Moving a topic below itself or one of its descendants is rejected.
    /// Moving it to its current parent is a no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&mut self, title: &str, new_parent: Option<&str>) -> ApplicationResult<()> {
        let op = Operation::Move;
        let idx = self.tree.resolve(Some(title)).map_err(rejected(op))?;
        let target = self.tree.resolve(new_parent).map_err(rejected(op))?;

        if self.tree.is_ancestor_or_self(idx, target) {
            return Err(rejected(op)(DomainError::InvalidMove {
                title: title.to_string(),
                target: new_parent.unwrap_or_default().to_string(),
            }));
        }
        if self.tree.get_node(idx).and_then(|node| node.parent) == Some(target) {
            debug!("topic already under target, nothing to do");
            return Ok(());
        }
        self.tree
            .ensure_title_free(self.scope, target, title, Some(idx))
            .map_err(rejected(op))?;

        let mut staged = self.tree.clone();
        staged.reparent(idx, target);
        self.commit(op, title, staged)?;
        info!("moved topic {title:?} under {new_parent:?}");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn attach_content(&mut self, title: &str, content: Content) -> ApplicationResult<()> {
        let op = Operation::Attach;
        let idx = self.tree.resolve(Some(title)).map_err(rejected(op))?;

        let mut staged = self.tree.clone();
        if let Some(node) = staged.get_node_mut(idx) {
            node.data.contents.push(content);
        }
        self.commit(op, title, staged)?;
        info!("attached content to {title:?}");
        Ok(())
    }

    /// Dispatch an explicit mutation command.
    pub fn apply(&mut self, command: TopicCommand) -> ApplicationResult<()> {
        match command {
            TopicCommand::Add { title, parent } => self.add_node(&title, parent.as_deref()),
            TopicCommand::Rename { from, to } => self.rename_node(&from, &to),
            TopicCommand::Remove { title } => self.remove_node(&title).map(|_| ()),
            TopicCommand::Move { title, parent } => self.move_node(&title, parent.as_deref()),
            TopicCommand::Attach { title, content } => self.attach_content(&title, content),
        }
    }

    /// Full navigation tree of the current hierarchy.
    pub fn project(&self) -> TopicView {
        projection::build(&self.tree)
    }

    /// Navigation tree restricted to branches matching `key`.
    pub fn filter(&self, key: &str) -> TopicView {
        projection::filter(&self.tree, key)
    }

    /// Persist `staged` and make it the live tree. On failure the live tree
    /// is left as it was.
    fn commit(
        &mut self,
        operation: Operation,
        title: &str,
        staged: TopicArena,
    ) -> ApplicationResult<()> {
        let document = staged.to_document();
        self.store.save(&document).map_err(|source| {
            warn!(%operation, title, %source, "persisting failed, change discarded");
            ApplicationError::persistence(operation, Some(title.to_string()), source)
        })?;
        self.tree = staged;
        Ok(())
    }
}
