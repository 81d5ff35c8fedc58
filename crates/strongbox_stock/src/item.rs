//! Items.
//!
//! `ItemData` is the item section shared by every item-like kind. Its
//! schema history:
//!
//! | version | adds                      |
//! |---------|---------------------------|
//! | 0       | name, hue, amount         |
//! | 1       | weight                    |
//! | 2       | owner, attributes         |

use std::any::Any;
use std::sync::Arc;

use strongbox_codec::{Decoder, Encoder};
use strongbox_foundation::{EntityId, Result, Value};
use strongbox_storage::registry::{expect_entity, expect_narrow, expect_text};
use strongbox_storage::{Entity, EntityCore, Property, PropertyKind};

use crate::attributes::Attributes;

const ITEM_VERSION: u32 = 2;

/// Weight assumed for items saved before weight was persisted.
const LEGACY_WEIGHT: u32 = 1;

/// State shared by all item kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemData {
    /// Display name.
    pub name: Arc<str>,
    /// Colour.
    pub hue: u16,
    /// Stack size.
    pub amount: u16,
    /// Weight of one unit.
    pub weight: u32,
    /// Owning character, or null.
    pub owner: EntityId,
    /// Modifiers. Not part of the generic copy pass.
    pub attributes: Attributes,
}

impl Default for ItemData {
    fn default() -> Self {
        Self {
            name: Arc::from(""),
            hue: 0,
            amount: 1,
            weight: 0,
            owner: EntityId::null(),
            attributes: Attributes::new(),
        }
    }
}

impl ItemData {
    /// Creates item state with a name and unit weight.
    #[must_use]
    pub fn named(name: &str, weight: u32) -> Self {
        Self {
            name: Arc::from(name),
            weight,
            ..Self::default()
        }
    }

    /// Weight of the whole stack.
    #[must_use]
    pub fn stack_weight(&self) -> u32 {
        self.weight.saturating_mul(u32::from(self.amount.max(1)))
    }

    pub(crate) fn encode(&self, enc: &mut Encoder) {
        enc.write_version(ITEM_VERSION);
        enc.write_str(&self.name);
        enc.write_u16(self.hue);
        enc.write_u16(self.amount);
        enc.write_u32(self.weight);
        enc.write_reference(self.owner);
        self.attributes.encode(enc);
    }

    pub(crate) fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        let version = dec.read_version(ITEM_VERSION, "item")?;
        self.name = Arc::from(dec.read_str()?);
        self.hue = dec.read_u16()?;
        self.amount = dec.read_u16()?;
        self.weight = if version >= 1 {
            dec.read_u32()?
        } else {
            LEGACY_WEIGHT
        };
        if version >= 2 {
            self.owner = dec.read_entity()?;
            self.attributes = Attributes::decode(dec)?;
        } else {
            self.owner = EntityId::null();
            self.attributes = Attributes::new();
        }
        Ok(())
    }
}

/// Access to the item section of an item-like entity.
pub trait AsItem {
    /// Borrows the item state.
    fn item(&self) -> &ItemData;
    /// Mutably borrows the item state.
    fn item_mut(&mut self) -> &mut ItemData;
}

/// Copyable properties of the item section, declared on `T`.
#[must_use]
pub fn item_properties<T: Entity + AsItem + Any>() -> Vec<Property> {
    vec![
        Property::new::<T>(
            "name",
            PropertyKind::Value,
            |t| Value::Text(Arc::clone(&t.item().name)),
            |t, v| {
                t.item_mut().name = expect_text("name", v)?;
                Ok(())
            },
        ),
        Property::new::<T>(
            "hue",
            PropertyKind::Value,
            |t| Value::Int(i64::from(t.item().hue)),
            |t, v| {
                t.item_mut().hue = expect_narrow("hue", &v)?;
                Ok(())
            },
        ),
        Property::new::<T>(
            "amount",
            PropertyKind::Value,
            |t| Value::Int(i64::from(t.item().amount)),
            |t, v| {
                t.item_mut().amount = expect_narrow("amount", &v)?;
                Ok(())
            },
        ),
        Property::new::<T>(
            "weight",
            PropertyKind::Value,
            |t| Value::Int(i64::from(t.item().weight)),
            |t, v| {
                t.item_mut().weight = expect_narrow("weight", &v)?;
                Ok(())
            },
        ),
        Property::new::<T>(
            "owner",
            PropertyKind::Reference,
            |t| Value::Entity(t.item().owner),
            |t, v| {
                t.item_mut().owner = expect_entity("owner", &v)?;
                Ok(())
            },
        ),
    ]
}

/// Deep-copies the attributes of `src` into `copy` if it has the same type.
pub(crate) fn copy_attributes<T: Entity + AsItem + Any>(src: &T, copy: &mut dyn Entity) {
    if let Some(copy) = copy.downcast_mut::<T>() {
        copy.item_mut().attributes = src.item().attributes.clone();
    }
}

/// A plain item. Registered as both `item` and `item.artifact`.
#[derive(Debug)]
pub struct Item {
    core: EntityCore,
    /// Item state.
    pub data: ItemData,
}

impl Item {
    /// Loader shell.
    #[must_use]
    pub fn shell(core: EntityCore) -> Box<dyn Entity> {
        Box::new(Self {
            core,
            data: ItemData::default(),
        })
    }

    /// Parameterless constructor for `item`.
    #[must_use]
    pub fn construct(core: EntityCore) -> Box<dyn Entity> {
        Box::new(Self {
            core,
            data: ItemData::named("item", 1),
        })
    }

    /// Parameterless constructor for `item.artifact`.
    #[must_use]
    pub fn construct_artifact(core: EntityCore) -> Box<dyn Entity> {
        Box::new(Self {
            core,
            data: ItemData::named("artifact", 1),
        })
    }
}

impl AsItem for Item {
    fn item(&self) -> &ItemData {
        &self.data
    }

    fn item_mut(&mut self) -> &mut ItemData {
        &mut self.data
    }
}

impl Entity for Item {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn encode(&self, enc: &mut Encoder) {
        self.data.encode(enc);
    }

    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        self.data.decode(dec)
    }

    fn weight(&self) -> u32 {
        self.data.stack_weight()
    }

    fn after_duplicate(&self, copy: &mut dyn Entity) {
        copy_attributes(self, copy);
    }
}
