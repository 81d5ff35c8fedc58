//! The clone engine.
//!
//! Duplicating an entity runs in two steps. Planning walks the source
//! subtree without mutating anything: it checks the actor's privilege and
//! constructor availability for every node and resolves the placement. The
//! copy step then builds each copy through the type's parameterless
//! constructor, runs the generic property copy and the type's
//! `after_duplicate` hook, and attaches child copies beneath it in the
//! source's child order.
//!
//! The plan is taken once, so copies made earlier in the same call (with an
//! `amount` above one, or when the target is inside the source) are never
//! duplicated themselves.

use std::sync::Arc;

use strongbox_foundation::{EntityId, Error, ErrorContext, ErrorKind, Result};
use strongbox_storage::{TypeRegistry, World};
use tracing::{debug, warn};

use crate::audit::{AuditOutcome, AuditRecord, AuditSink};
use crate::options::{Actor, Atomicity, DuplicateOptions, Target};

/// Outcome of a successful duplicate call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Duplication {
    /// Top-level copies, one per requested copy.
    pub copies: Vec<EntityId>,
    /// Every `(original, copy)` pair, in creation order.
    pub created: Vec<(EntityId, EntityId)>,
    /// Descendants left out, together with their subtrees.
    pub skipped: Vec<EntityId>,
    /// False if anything was left out for a reason other than privilege.
    pub done: bool,
}

impl Duplication {
    /// Returns the first top-level copy.
    #[must_use]
    pub fn copy(&self) -> Option<EntityId> {
        self.copies.first().copied()
    }

    /// Iterates the copies made of `original`.
    pub fn copies_of(&self, original: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.created
            .iter()
            .filter(move |(from, _)| *from == original)
            .map(|(_, copy)| *copy)
    }

    /// Returns the number of entities created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.created.len()
    }

    /// Returns true if nothing was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

/// Duplicates `source` and everything it contains.
///
/// With an actor, the source's type must not require more privilege than
/// the actor holds; descendants that do are skipped. Without one, nothing
/// is gated. Every call, successful or not, produces one record on `sink`.
///
/// # Errors
///
/// Returns `AccessDenied` or `NoParameterlessConstructor` for the source
/// itself without mutating the world. Under [`Atomicity::AllOrNothing`]
/// any other failure also leaves the world as it was, apart from burned
/// identifiers.
pub fn duplicate(
    world: &mut World,
    source: EntityId,
    actor: Option<Actor>,
    options: &DuplicateOptions,
    sink: &mut dyn AuditSink,
) -> Result<Duplication> {
    let result = run(world, source, actor, options);
    let record = match &result {
        Ok(duplication) => AuditRecord {
            actor: actor.map(|a| a.id),
            source,
            copies: duplication.copies.clone(),
            created: duplication.len(),
            outcome: if duplication.done {
                AuditOutcome::Completed
            } else {
                AuditOutcome::Partial
            },
        },
        Err(e) => AuditRecord {
            actor: actor.map(|a| a.id),
            source,
            copies: Vec::new(),
            created: 0,
            outcome: match &e.kind {
                ErrorKind::AccessDenied { .. } => AuditOutcome::Denied,
                ErrorKind::NoParameterlessConstructor(_) => AuditOutcome::NoConstructor,
                _ => AuditOutcome::Failed(e.to_string()),
            },
        },
    };
    sink.record(record);
    result
}

fn run(
    world: &mut World,
    source: EntityId,
    actor: Option<Actor>,
    options: &DuplicateOptions,
) -> Result<Duplication> {
    let registry = Arc::clone(world.registry());
    let tag = world.require(source)?.tag();
    let info = registry.require(tag)?;
    if let Some(actor) = actor {
        if !actor.privilege.satisfies(info.min_privilege()) {
            return Err(Error::access_denied(info.min_privilege(), actor.privilege)
                .with_context(ErrorContext::new().with_entity(source)));
        }
    }
    if !info.has_constructor() {
        return Err(Error::no_constructor(tag).with_context(ErrorContext::new().with_entity(source)));
    }
    let target = options.placement.resolve(world, source)?;

    let mut planner = Planner {
        world: &*world,
        actor,
        atomicity: options.atomicity,
        skipped: Vec::new(),
        incomplete: false,
    };
    let plan = planner.node(source)?;
    let Planner {
        skipped,
        incomplete,
        ..
    } = planner;

    let mut copier = Copier {
        registry,
        atomicity: options.atomicity,
        created: Vec::new(),
        failed: Vec::new(),
    };
    let mut copies = Vec::with_capacity(usize::from(options.copies()));
    let mut stopped = false;
    for _ in 0..options.copies() {
        match copier.top(world, &plan, target) {
            Ok(copy) => copies.push(copy),
            Err(e) => match options.atomicity {
                Atomicity::AllOrNothing => {
                    copier.rollback(world);
                    return Err(e);
                }
                Atomicity::BestEffort if copies.is_empty() => return Err(e),
                Atomicity::BestEffort => {
                    warn!(%source, error = %e, "stopped before all copies were made");
                    stopped = true;
                    break;
                }
            },
        }
    }

    debug!(%source, copies = copies.len(), created = copier.created.len(), "duplicated");
    let done = !incomplete && !stopped && copier.failed.is_empty();
    let mut skipped = skipped;
    skipped.extend(copier.failed);
    Ok(Duplication {
        copies,
        created: copier.created,
        skipped,
        done,
    })
}

/// Snapshot of the subtree to copy.
#[derive(Debug)]
struct Plan {
    original: EntityId,
    children: Vec<Plan>,
}

struct Planner<'w> {
    world: &'w World,
    actor: Option<Actor>,
    atomicity: Atomicity,
    skipped: Vec<EntityId>,
    incomplete: bool,
}

impl Planner<'_> {
    fn node(&mut self, id: EntityId) -> Result<Plan> {
        let children: Vec<EntityId> = self.world.children(id).collect();
        let mut plan = Plan {
            original: id,
            children: Vec::with_capacity(children.len()),
        };
        for child in children {
            if let Some(node) = self.child(child)? {
                plan.children.push(node);
            }
        }
        Ok(plan)
    }

    fn child(&mut self, id: EntityId) -> Result<Option<Plan>> {
        let world = self.world;
        let tag = world.require(id)?.tag();
        let info = world.registry().require(tag)?;
        if let Some(actor) = self.actor {
            if !actor.privilege.satisfies(info.min_privilege()) {
                debug!(%id, tag, "descendant above actor privilege, skipped");
                self.skipped.push(id);
                return Ok(None);
            }
        }
        if !info.has_constructor() {
            if self.atomicity == Atomicity::AllOrNothing {
                return Err(
                    Error::no_constructor(tag).with_context(ErrorContext::new().with_entity(id))
                );
            }
            warn!(%id, tag, "descendant has no parameterless constructor, skipped");
            self.skipped.push(id);
            self.incomplete = true;
            return Ok(None);
        }
        self.node(id).map(Some)
    }
}

struct Copier {
    registry: Arc<TypeRegistry>,
    atomicity: Atomicity,
    created: Vec<(EntityId, EntityId)>,
    failed: Vec<EntityId>,
}

impl Copier {
    /// Copies the whole plan and places the result.
    fn top(&mut self, world: &mut World, plan: &Plan, target: Target) -> Result<EntityId> {
        let copy = self.instantiate(world, plan, None)?;
        if let Err(e) = target.place(world, copy) {
            self.discard(world, copy);
            return Err(e);
        }
        world.update_totals(copy);
        world.mark_changed(copy);
        Ok(copy)
    }

    /// Builds one copy, attaches it under `parent`, then copies its children.
    ///
    /// On error nothing of this node remains in the world.
    fn instantiate(
        &mut self,
        world: &mut World,
        node: &Plan,
        parent: Option<EntityId>,
    ) -> Result<EntityId> {
        let tag = world.require(node.original)?.tag();
        let info = self.registry.require(tag)?;
        let id = world.allocate(info.namespace())?;
        let mut copy = info.construct(id)?;

        let source = world.require(node.original)?;
        let core = copy.core_mut();
        core.location = source.core().location;
        core.region = source.core().region;
        for property in info.properties() {
            if let Err(e) = property.copy(source, &mut *copy) {
                warn!(
                    source = %node.original,
                    property = property.name(),
                    error = %e,
                    "property not copied"
                );
            }
        }
        source.after_duplicate(&mut *copy);

        world.insert(copy)?;
        self.created.push((node.original, id));
        if let Some(parent) = parent {
            if let Err(e) = world.attach(id, parent) {
                self.discard(world, id);
                return Err(e);
            }
        }

        for child in &node.children {
            if let Err(e) = self.instantiate(world, child, Some(id)) {
                if self.atomicity == Atomicity::AllOrNothing {
                    return Err(e);
                }
                warn!(source = %child.original, error = %e, "descendant not copied");
                self.failed.push(child.original);
            }
        }
        Ok(id)
    }

    /// Deletes `copy` and forgets everything removed with it.
    fn discard(&mut self, world: &mut World, copy: EntityId) {
        if let Ok(removed) = world.delete(copy) {
            self.created
                .retain(|(_, made)| !removed.iter().any(|entity| entity.id() == *made));
        }
    }

    /// Deletes every copy made so far.
    fn rollback(&mut self, world: &mut World) {
        let created = std::mem::take(&mut self.created);
        for (_, copy) in created {
            if world.contains(copy) {
                self.discard(world, copy);
            }
        }
        debug!("duplicate rolled back");
    }
}
