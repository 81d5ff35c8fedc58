//! The world arena.
//!
//! Every live entity is owned by one table keyed by identifier. References
//! between entities are plain identifiers resolved through this table, and
//! containment lives in the [`OwnershipGraph`]. All structural mutation goes
//! through `&mut World`.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use strongbox_foundation::{EntityId, Error, ErrorKind, Namespace, Point3, Region, Result};
use tracing::debug;

use crate::allocator::IdentityAllocator;
use crate::entity::{Entity, Totals};
use crate::ownership::OwnershipGraph;
use crate::registry::TypeRegistry;

/// The live entity table, its allocator, and its containment forest.
#[derive(Debug)]
pub struct World {
    registry: Arc<TypeRegistry>,
    allocator: IdentityAllocator,
    entities: BTreeMap<EntityId, Box<dyn Entity>>,
    graph: OwnershipGraph,
    changed: BTreeSet<EntityId>,
}

impl World {
    /// Creates an empty world over a frozen registry.
    #[must_use]
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_allocator(registry, IdentityAllocator::new())
    }

    /// Creates an empty world that resumes from a persisted allocator.
    #[must_use]
    pub fn with_allocator(registry: Arc<TypeRegistry>, allocator: IdentityAllocator) -> Self {
        Self {
            registry,
            allocator,
            entities: BTreeMap::new(),
            graph: OwnershipGraph::new(),
            changed: BTreeSet::new(),
        }
    }

    /// Returns the type registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Returns the identity allocator.
    #[must_use]
    pub fn allocator(&self) -> &IdentityAllocator {
        &self.allocator
    }

    /// Issues a fresh identifier without creating an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace is exhausted.
    pub fn allocate(&mut self, namespace: Namespace) -> Result<EntityId> {
        self.allocator.allocate(namespace)
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Constructs a new entity of type `tag` and adds it as a world root.
    ///
    /// The constructor is checked before an identifier is allocated, so a
    /// type without one burns nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is unknown, the type has no parameterless
    /// constructor, or its namespace is exhausted.
    pub fn spawn(&mut self, tag: &str) -> Result<EntityId> {
        let registry = Arc::clone(&self.registry);
        let info = registry.require(tag)?;
        if !info.has_constructor() {
            return Err(Error::no_constructor(tag));
        }
        let id = self.allocator.allocate(info.namespace())?;
        let entity = info.construct(id)?;
        debug!(%id, tag, "spawned");
        self.insert(entity)
    }

    /// Adds an already built entity as a world root.
    ///
    /// The allocator is advanced past the entity's identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is null or already present, or if
    /// the entity has been deleted.
    pub fn insert(&mut self, entity: Box<dyn Entity>) -> Result<EntityId> {
        let id = entity.id();
        if id.is_null() {
            return Err(Error::invalid_data("cannot insert an entity with the null id"));
        }
        if self.entities.contains_key(&id) {
            return Err(Error::invalid_data(format!("{id} is already in the world")));
        }
        if entity.core().is_deleted() {
            return Err(Error::invalid_data(format!("{id} was deleted")));
        }
        self.allocator.observe(id)?;
        self.entities.insert(id, entity);
        self.refresh(id);
        self.changed.insert(id);
        Ok(id)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Borrows an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities.get(&id).map(|entity| &**entity)
    }

    /// Mutably borrows an entity.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut dyn Entity> {
        let entity = self.entities.get_mut(&id)?;
        Some(&mut **entity)
    }

    /// Borrows an entity as its concrete type.
    #[must_use]
    pub fn get_as<T: Entity + Any>(&self, id: EntityId) -> Option<&T> {
        self.get(id)?.downcast_ref::<T>()
    }

    /// Mutably borrows an entity as its concrete type.
    pub fn get_as_mut<T: Entity + Any>(&mut self, id: EntityId) -> Option<&mut T> {
        let entity: &mut dyn Entity = &mut **self.entities.get_mut(&id)?;
        entity.downcast_mut::<T>()
    }

    /// Borrows an entity, failing if it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if no live entity has this identifier.
    pub fn require(&self, id: EntityId) -> Result<&dyn Entity> {
        self.get(id).ok_or_else(|| Error::entity_not_found(id))
    }

    /// Resolves a stored reference.
    ///
    /// The null identifier and identifiers of deleted entities resolve to
    /// `None`.
    #[must_use]
    pub fn resolve(&self, id: EntityId) -> Option<&dyn Entity> {
        if id.is_null() {
            return None;
        }
        self.get(id).filter(|e| !e.core().is_deleted())
    }

    /// Returns true if a live entity has this identifier.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the world holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates live identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Iterates live entities in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Entity> + '_ {
        self.entities.values().map(|entity| &**entity)
    }

    /// Iterates entities placed directly in the world.
    pub fn roots(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .keys()
            .copied()
            .filter(|id| self.graph.parent(*id).is_none())
    }

    // ========================================================================
    // Ownership
    // ========================================================================

    /// Returns the containment graph.
    #[must_use]
    pub fn graph(&self) -> &OwnershipGraph {
        &self.graph
    }

    /// Returns the parent of `id`.
    #[must_use]
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.graph.parent(id)
    }

    /// Iterates the children of `id` in order.
    pub fn children(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.graph.children(id)
    }

    /// Places `child` inside `parent`, moving it out of any previous parent.
    ///
    /// The child's location is kept as its placement inside the parent.
    ///
    /// # Errors
    ///
    /// Returns an error if either entity is missing, the parent cannot hold
    /// children, or the move would create a cycle. Nothing changes on error.
    pub fn attach(&mut self, child: EntityId, parent: EntityId) -> Result<()> {
        self.require(child)?;
        if !self.require(parent)?.accepts_children() {
            return Err(Error::new(ErrorKind::ChildrenNotSupported(parent)));
        }
        let previous = self.graph.parent(child);
        self.graph.attach(child, parent)?;
        debug!(%child, %parent, "attached");

        if let Some(old) = previous.filter(|old| *old != parent) {
            self.refresh_upwards(old);
        }
        self.refresh_upwards(parent);
        self.changed.insert(child);
        Ok(())
    }

    /// Removes `child` from its parent, leaving it unplaced.
    ///
    /// Returns the former parent. Callers either place the entity in the
    /// world with [`move_to_world`](Self::move_to_world) or delete it.
    pub fn detach(&mut self, child: EntityId) -> Option<EntityId> {
        let parent = self.graph.detach(child)?;
        debug!(%child, %parent, "detached");
        self.refresh_upwards(parent);
        self.changed.insert(child);
        Some(parent)
    }

    /// Detaches `id` from any parent and places it at a world position.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is missing.
    pub fn move_to_world(&mut self, id: EntityId, location: Point3, region: Region) -> Result<()> {
        self.require(id)?;
        self.detach(id);
        let entity = self.get_mut(id).ok_or_else(|| Error::entity_not_found(id))?;
        let core = entity.core_mut();
        core.location = location;
        core.region = region;
        self.changed.insert(id);
        Ok(())
    }

    /// Deletes `id` and everything it contains.
    ///
    /// The entities are detached and removed from the table. Their
    /// identifiers are retired. Returns the removed entities, marked
    /// deleted, root first.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is missing.
    pub fn delete(&mut self, id: EntityId) -> Result<Vec<Box<dyn Entity>>> {
        self.require(id)?;
        let mut doomed = vec![id];
        doomed.extend(self.graph.descendants(id));

        if let Some(parent) = self.graph.detach(id) {
            self.refresh_upwards(parent);
        }

        let mut removed = Vec::with_capacity(doomed.len());
        for victim in doomed.into_iter().rev() {
            self.graph.detach(victim);
            self.changed.remove(&victim);
            if let Some(mut entity) = self.entities.remove(&victim) {
                entity.core_mut().mark_deleted();
                removed.push(entity);
            }
        }
        removed.reverse();
        debug!(%id, count = removed.len(), "deleted");
        Ok(removed)
    }

    // ========================================================================
    // Derived state
    // ========================================================================

    /// Returns the cached totals of `id`.
    #[must_use]
    pub fn totals(&self, id: EntityId) -> Option<Totals> {
        self.get(id).map(|e| e.core().totals())
    }

    /// Recomputes the totals of `id`, its whole subtree, and its ancestors.
    pub fn update_totals(&mut self, id: EntityId) {
        let mut order = self.graph.descendants(id);
        order.reverse();
        for node in order {
            self.refresh(node);
        }
        self.refresh_upwards(id);
    }

    /// Recomputes the totals of every entity.
    pub fn update_all_totals(&mut self) {
        let roots: Vec<EntityId> = self.roots().collect();
        for root in roots {
            self.update_totals(root);
        }
    }

    fn refresh_upwards(&mut self, id: EntityId) {
        self.refresh(id);
        let ancestors: Vec<EntityId> = self.graph.ancestors(id).collect();
        for ancestor in ancestors {
            self.refresh(ancestor);
        }
    }

    /// Recomputes one entity's totals from its own weight and its children's
    /// cached totals.
    fn refresh(&mut self, id: EntityId) {
        let mut totals = Totals::default();
        for child in self.graph.children(id) {
            if let Some(entity) = self.entities.get(&child) {
                let inner = entity.core().totals();
                totals.items = totals.items.saturating_add(1).saturating_add(inner.items);
                totals.weight = totals.weight.saturating_add(inner.weight);
            }
        }
        if let Some(entity) = self.entities.get_mut(&id) {
            totals.weight = totals.weight.saturating_add(entity.weight());
            entity.core_mut().set_totals(totals);
        }
    }

    // ========================================================================
    // Change tracking
    // ========================================================================

    /// Flags `id` as changed since the last [`take_changed`](Self::take_changed).
    pub fn mark_changed(&mut self, id: EntityId) {
        if self.entities.contains_key(&id) {
            self.changed.insert(id);
        }
    }

    /// Returns true if `id` is flagged as changed.
    #[must_use]
    pub fn is_changed(&self, id: EntityId) -> bool {
        self.changed.contains(&id)
    }

    /// Drains the change set.
    pub fn take_changed(&mut self) -> BTreeSet<EntityId> {
        std::mem::take(&mut self.changed)
    }
}
