//! Base entity kinds for Strongbox.
//!
//! This crate provides:
//! - [`Item`] - Named, weighted, stackable objects (tags `item` and `item.artifact`)
//! - [`Container`] - Items that hold other items
//! - [`Corpse`] - Containers left behind by characters; loadable but not constructable
//! - [`Character`] - Actors in the character namespace, with privilege and a backpack
//! - [`register_stock`] - Registers all of the above with a [`RegistryBuilder`]
//!
//! Every kind writes a schema version first and decodes each older layout
//! it has ever written.
//!
//! [`RegistryBuilder`]: strongbox_storage::RegistryBuilder

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod attributes;
pub mod character;
pub mod container;
pub mod item;
pub mod registration;

pub use attributes::Attributes;
pub use character::{Character, Stats};
pub use container::{AsContainer, Container, ContainerData, Corpse};
pub use item::{AsItem, Item, ItemData};
pub use registration::{register_stock, stock_registry, tags};
