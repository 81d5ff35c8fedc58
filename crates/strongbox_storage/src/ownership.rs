//! The containment forest.
//!
//! Every entity has at most one parent. Roots are placed directly in the
//! world. `attach` and `detach` are the only operations that change the
//! parent/child relation, and `attach` validates before it mutates, so the
//! forest stays acyclic and no child is ever listed under two parents.
//!
//! Child lists are persistent vectors, so cloning the graph is O(1) and
//! shares structure with the original.

use im::{HashMap, Vector};

use strongbox_foundation::{EntityId, Error, Result};

/// Parent/child relation over entities.
#[derive(Clone, Debug, Default)]
pub struct OwnershipGraph {
    /// Child -> parent.
    parents: HashMap<EntityId, EntityId>,
    /// Parent -> children, in insertion order.
    children: HashMap<EntityId, Vector<EntityId>>,
}

impl OwnershipGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `child` under `parent`, appending it to the parent's children.
    ///
    /// A child already under another parent is moved. A child already under
    /// `parent` moves to the end of its list.
    ///
    /// # Errors
    ///
    /// Returns an error, without changing anything, if either id is null or
    /// if `parent` is `child` or one of its descendants.
    pub fn attach(&mut self, child: EntityId, parent: EntityId) -> Result<()> {
        if child.is_null() || parent.is_null() {
            return Err(Error::invalid_data("cannot attach the null entity"));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(Error::cycle(child, parent));
        }

        self.unlink(child);
        self.children.entry(parent).or_default().push_back(child);
        self.parents.insert(child, parent);
        Ok(())
    }

    /// Removes `child` from its parent, making it a root.
    ///
    /// Returns the former parent, or `None` if it was already a root.
    pub fn detach(&mut self, child: EntityId) -> Option<EntityId> {
        self.unlink(child)
    }

    fn unlink(&mut self, child: EntityId) -> Option<EntityId> {
        let parent = self.parents.remove(&child)?;
        if let Some(list) = self.children.get_mut(&parent) {
            if let Some(pos) = list.index_of(&child) {
                list.remove(pos);
            }
            if list.is_empty() {
                self.children.remove(&parent);
            }
        }
        Some(parent)
    }

    /// Returns the parent of `id`, if it has one.
    #[must_use]
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.parents.get(&id).copied()
    }

    /// Iterates the children of `id` in order.
    pub fn children(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.children
            .get(&id)
            .into_iter()
            .flat_map(|list| list.iter().copied())
    }

    /// Returns the number of direct children of `id`.
    #[must_use]
    pub fn child_count(&self, id: EntityId) -> usize {
        self.children.get(&id).map_or(0, Vector::len)
    }

    /// Returns true if `id` has any children.
    #[must_use]
    pub fn has_children(&self, id: EntityId) -> bool {
        self.child_count(id) > 0
    }

    /// Returns the position of `child` within its parent's children.
    #[must_use]
    pub fn position(&self, child: EntityId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children.get(&parent)?.index_of(&child)
    }

    /// Iterates the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Returns true if `ancestor` is a proper ancestor of `id`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Returns the root of the tree containing `id`.
    #[must_use]
    pub fn root_of(&self, id: EntityId) -> EntityId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Returns every descendant of `id` in pre-order.
    #[must_use]
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack: Vec<EntityId> = self.children(id).collect();
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let start = stack.len();
            stack.extend(self.children(next));
            stack[start..].reverse();
        }
        out
    }

    /// Returns the number of parent links.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.parents.len()
    }
}
