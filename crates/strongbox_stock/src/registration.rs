//! Registration of the stock kinds.

use std::sync::Arc;

use strongbox_foundation::{Namespace, Privilege, Result};
use strongbox_storage::{RegistryBuilder, TypeInfo, TypeRegistry};

use crate::character::{Character, character_properties};
use crate::container::{Container, Corpse, container_properties, corpse_properties};
use crate::item::{Item, item_properties};

/// Type tags of the stock kinds.
pub mod tags {
    /// Plain item.
    pub const ITEM: &str = "item";
    /// Staff-only item.
    pub const ARTIFACT: &str = "item.artifact";
    /// Container.
    pub const CONTAINER: &str = "container";
    /// Corpse.
    pub const CORPSE: &str = "corpse";
    /// Character.
    pub const CHARACTER: &str = "character";
}

/// Registers every stock kind.
///
/// # Errors
///
/// Returns an error if any stock tag is already registered.
pub fn register_stock(builder: &mut RegistryBuilder) -> Result<()> {
    builder
        .register(
            TypeInfo::new(tags::ITEM, Namespace::Item, Item::shell)
                .constructable(Privilege::Player, Item::construct)
                .with_properties(item_properties::<Item>()),
        )?
        .register(
            TypeInfo::new(tags::ARTIFACT, Namespace::Item, Item::shell)
                .constructable(Privilege::Administrator, Item::construct_artifact)
                .with_properties(item_properties::<Item>()),
        )?
        .register(
            TypeInfo::new(tags::CONTAINER, Namespace::Item, Container::shell)
                .constructable(Privilege::Player, Container::construct)
                .with_properties(item_properties::<Container>())
                .with_properties(container_properties::<Container>()),
        )?
        .register(
            TypeInfo::new(tags::CORPSE, Namespace::Item, Corpse::shell)
                .with_properties(item_properties::<Corpse>())
                .with_properties(container_properties::<Corpse>())
                .with_properties(corpse_properties()),
        )?
        .register(
            TypeInfo::new(tags::CHARACTER, Namespace::Character, Character::shell)
                .constructable(Privilege::GameMaster, Character::construct)
                .with_properties(character_properties()),
        )?;
    Ok(())
}

/// Builds a frozen registry holding only the stock kinds.
///
/// # Errors
///
/// Never fails in practice; registration errors are propagated.
pub fn stock_registry() -> Result<Arc<TypeRegistry>> {
    let mut builder = RegistryBuilder::new();
    register_stock(&mut builder)?;
    Ok(builder.freeze())
}
