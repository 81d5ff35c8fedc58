//! Containers and corpses.

use std::any::Any;

use strongbox_codec::{Decoder, Encoder};
use strongbox_foundation::{EntityId, Namespace, Result, Value};
use strongbox_storage::registry::{expect_bool, expect_entity, expect_narrow};
use strongbox_storage::{Entity, EntityCore, Property, PropertyKind, World};
use tracing::debug;

use crate::item::{AsItem, ItemData, copy_attributes};
use crate::registration::tags;

const CONTAINER_VERSION: u32 = 1;
const CORPSE_VERSION: u32 = 0;

/// Default number of items a container holds.
pub const DEFAULT_MAX_ITEMS: u16 = 125;

/// Container section. Version 0 wrote `max_items` and `gump`; version 1
/// added `locked`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerData {
    /// Capacity hint for clients.
    pub max_items: u16,
    /// Artwork shown when opened.
    pub gump: u16,
    /// Locked containers refuse to open.
    pub locked: bool,
}

impl Default for ContainerData {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            gump: 0x3C,
            locked: false,
        }
    }
}

impl ContainerData {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_version(CONTAINER_VERSION);
        enc.write_u16(self.max_items);
        enc.write_u16(self.gump);
        enc.write_bool(self.locked);
    }

    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        let version = dec.read_version(CONTAINER_VERSION, "container")?;
        self.max_items = dec.read_u16()?;
        self.gump = dec.read_u16()?;
        self.locked = version >= 1 && dec.read_bool()?;
        Ok(())
    }
}

/// Access to the container section.
pub trait AsContainer: AsItem {
    /// Borrows the container state.
    fn container(&self) -> &ContainerData;
    /// Mutably borrows the container state.
    fn container_mut(&mut self) -> &mut ContainerData;
}

/// Copyable properties of the container section, declared on `T`.
#[must_use]
pub fn container_properties<T: Entity + AsContainer + Any>() -> Vec<Property> {
    vec![
        Property::new::<T>(
            "max_items",
            PropertyKind::Value,
            |t| Value::Int(i64::from(t.container().max_items)),
            |t, v| {
                t.container_mut().max_items = expect_narrow("max_items", &v)?;
                Ok(())
            },
        ),
        Property::new::<T>(
            "gump",
            PropertyKind::Value,
            |t| Value::Int(i64::from(t.container().gump)),
            |t, v| {
                t.container_mut().gump = expect_narrow("gump", &v)?;
                Ok(())
            },
        ),
        Property::new::<T>(
            "locked",
            PropertyKind::Value,
            |t| Value::Bool(t.container().locked),
            |t, v| {
                t.container_mut().locked = expect_bool("locked", &v)?;
                Ok(())
            },
        ),
    ]
}

/// An item that holds other items.
#[derive(Debug)]
pub struct Container {
    core: EntityCore,
    /// Item state.
    pub item: ItemData,
    /// Container state.
    pub data: ContainerData,
}

impl Container {
    /// Loader shell.
    #[must_use]
    pub fn shell(core: EntityCore) -> Box<dyn Entity> {
        Box::new(Self {
            core,
            item: ItemData::default(),
            data: ContainerData::default(),
        })
    }

    /// Parameterless constructor.
    #[must_use]
    pub fn construct(core: EntityCore) -> Box<dyn Entity> {
        Box::new(Self {
            core,
            item: ItemData::named("container", 3),
            data: ContainerData::default(),
        })
    }
}

impl AsItem for Container {
    fn item(&self) -> &ItemData {
        &self.item
    }

    fn item_mut(&mut self) -> &mut ItemData {
        &mut self.item
    }
}

impl AsContainer for Container {
    fn container(&self) -> &ContainerData {
        &self.data
    }

    fn container_mut(&mut self) -> &mut ContainerData {
        &mut self.data
    }
}

impl Entity for Container {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn encode(&self, enc: &mut Encoder) {
        self.item.encode(enc);
        self.data.encode(enc);
    }

    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        self.item.decode(dec)?;
        self.data.decode(dec)
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn weight(&self) -> u32 {
        self.item.stack_weight()
    }

    fn after_duplicate(&self, copy: &mut dyn Entity) {
        copy_attributes(self, copy);
    }
}

/// Remains of a character.
///
/// Corpses only come into being through [`Corpse::create`], which needs the
/// dead character, so the type registers no parameterless constructor.
#[derive(Debug)]
pub struct Corpse {
    core: EntityCore,
    /// Item state. `owner` is the character that died.
    pub item: ItemData,
    /// Container state.
    pub data: ContainerData,
    /// Whoever dealt the killing blow, or null.
    pub killer: EntityId,
    /// Set once the corpse has been carved.
    pub carved: bool,
}

impl Corpse {
    /// Loader shell.
    #[must_use]
    pub fn shell(core: EntityCore) -> Box<dyn Entity> {
        Box::new(Self {
            core,
            item: ItemData::default(),
            data: ContainerData::default(),
            killer: EntityId::null(),
            carved: false,
        })
    }

    /// Creates the corpse of `owner` at the owner's position.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner is missing, `corpse` is not registered,
    /// or the item namespace is exhausted.
    pub fn create(world: &mut World, owner: EntityId, killer: EntityId) -> Result<EntityId> {
        world.registry().require(tags::CORPSE)?;
        let (name, location, region) = {
            let dead = world.require(owner)?;
            let name = match dead.downcast_ref::<crate::Character>() {
                Some(character) => format!("corpse of {}", character.name),
                None => "corpse".to_string(),
            };
            (name, dead.core().location, dead.core().region)
        };

        let id = world.allocate(Namespace::Item)?;
        let mut core = EntityCore::new(id, tags::CORPSE);
        core.location = location;
        core.region = region;
        let mut item = ItemData::named(&name, 0);
        item.owner = owner;
        let corpse = Box::new(Self {
            core,
            item,
            data: ContainerData::default(),
            killer,
            carved: false,
        });
        debug!(%id, %owner, "corpse created");
        world.insert(corpse)
    }
}

impl AsItem for Corpse {
    fn item(&self) -> &ItemData {
        &self.item
    }

    fn item_mut(&mut self) -> &mut ItemData {
        &mut self.item
    }
}

impl AsContainer for Corpse {
    fn container(&self) -> &ContainerData {
        &self.data
    }

    fn container_mut(&mut self) -> &mut ContainerData {
        &mut self.data
    }
}

/// Corpse-only properties.
#[must_use]
pub fn corpse_properties() -> Vec<Property> {
    vec![
        Property::new::<Corpse>(
            "killer",
            PropertyKind::Reference,
            |c| Value::Entity(c.killer),
            |c, v| {
                c.killer = expect_entity("killer", &v)?;
                Ok(())
            },
        ),
        Property::new::<Corpse>(
            "carved",
            PropertyKind::Value,
            |c| Value::Bool(c.carved),
            |c, v| {
                c.carved = expect_bool("carved", &v)?;
                Ok(())
            },
        ),
    ]
}

impl Entity for Corpse {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn encode(&self, enc: &mut Encoder) {
        enc.write_version(CORPSE_VERSION);
        self.item.encode(enc);
        self.data.encode(enc);
        enc.write_reference(self.killer);
        enc.write_bool(self.carved);
    }

    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        dec.read_version(CORPSE_VERSION, "corpse")?;
        self.item.decode(dec)?;
        self.data.decode(dec)?;
        self.killer = dec.read_entity()?;
        self.carved = dec.read_bool()?;
        Ok(())
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn weight(&self) -> u32 {
        self.item.stack_weight()
    }

    fn after_duplicate(&self, copy: &mut dyn Entity) {
        copy_attributes(self, copy);
    }
}
