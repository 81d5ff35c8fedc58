//! Characters.
//!
//! Schema history: version 0 wrote name, body, hue and privilege; version 1
//! added the backpack and master references; version 2 added stats.

use std::collections::BTreeMap;
use std::sync::Arc;

use strongbox_codec::{Decoder, Encoder};
use strongbox_foundation::{EntityId, Error, Privilege, Result, Value};
use strongbox_storage::registry::{expect_entity, expect_narrow, expect_text};
use strongbox_storage::{Entity, EntityCore, Property, PropertyKind, World};
use tracing::debug;

use crate::registration::tags;

const CHARACTER_VERSION: u32 = 2;

/// Default human body.
pub const HUMAN_BODY: u16 = 0x190;

/// Core attributes of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Strength.
    pub str: u16,
    /// Dexterity.
    pub dex: u16,
    /// Intelligence.
    pub int: u16,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            str: 10,
            dex: 10,
            int: 10,
        }
    }
}

impl Stats {
    fn to_value(self) -> Value {
        let mut map = BTreeMap::new();
        map.insert(Arc::from("str"), Value::Int(i64::from(self.str)));
        map.insert(Arc::from("dex"), Value::Int(i64::from(self.dex)));
        map.insert(Arc::from("int"), Value::Int(i64::from(self.int)));
        Value::Map(map)
    }

    fn from_value(value: &Value) -> Result<Self> {
        let field = |name: &str| -> Result<u16> {
            let v = value
                .field(name)
                .ok_or_else(|| Error::property_mismatch("stats", name, value.kind_name()))?;
            expect_narrow(name, v)
        };
        Ok(Self {
            str: field("str")?,
            dex: field("dex")?,
            int: field("int")?,
        })
    }
}

/// An actor: player or non-player.
#[derive(Debug)]
pub struct Character {
    core: EntityCore,
    /// Display name.
    pub name: Arc<str>,
    /// Body graphic.
    pub body: u16,
    /// Skin colour.
    pub hue: u16,
    /// Access level.
    pub privilege: Privilege,
    /// Pack carried by this character, or null.
    pub backpack: EntityId,
    /// Controlling character for pets and hirelings, or null.
    pub master: EntityId,
    /// Core attributes.
    pub stats: Stats,
}

impl Character {
    /// Loader shell.
    #[must_use]
    pub fn shell(core: EntityCore) -> Box<dyn Entity> {
        Box::new(Self {
            core,
            name: Arc::from(""),
            body: 0,
            hue: 0,
            privilege: Privilege::Player,
            backpack: EntityId::null(),
            master: EntityId::null(),
            stats: Stats::default(),
        })
    }

    /// Parameterless constructor. The character starts without a backpack.
    #[must_use]
    pub fn construct(core: EntityCore) -> Box<dyn Entity> {
        Box::new(Self {
            core,
            name: Arc::from("someone"),
            body: HUMAN_BODY,
            hue: 0,
            privilege: Privilege::Player,
            backpack: EntityId::null(),
            master: EntityId::null(),
            stats: Stats::default(),
        })
    }

    /// Spawns a container, places it on `character` and records it as the
    /// backpack.
    ///
    /// # Errors
    ///
    /// Returns an error if `character` is not a character or the container
    /// cannot be spawned.
    pub fn equip_backpack(world: &mut World, character: EntityId) -> Result<EntityId> {
        if world.get_as::<Character>(character).is_none() {
            return Err(Error::entity_not_found(character));
        }
        let pack = world.spawn(tags::CONTAINER)?;
        world.attach(pack, character)?;
        if let Some(owner) = world.get_as_mut::<Character>(character) {
            owner.backpack = pack;
        }
        debug!(%character, %pack, "backpack equipped");
        Ok(pack)
    }
}

/// Copyable character properties. The backpack is owned structure and is
/// not copied.
#[must_use]
pub fn character_properties() -> Vec<Property> {
    vec![
        Property::new::<Character>(
            "name",
            PropertyKind::Value,
            |c| Value::Text(Arc::clone(&c.name)),
            |c, v| {
                c.name = expect_text("name", v)?;
                Ok(())
            },
        ),
        Property::new::<Character>(
            "body",
            PropertyKind::Value,
            |c| Value::Int(i64::from(c.body)),
            |c, v| {
                c.body = expect_narrow("body", &v)?;
                Ok(())
            },
        ),
        Property::new::<Character>(
            "hue",
            PropertyKind::Value,
            |c| Value::Int(i64::from(c.hue)),
            |c, v| {
                c.hue = expect_narrow("hue", &v)?;
                Ok(())
            },
        ),
        Property::new::<Character>(
            "privilege",
            PropertyKind::Value,
            |c| Value::Int(i64::from(c.privilege.as_u8())),
            |c, v| {
                let raw: u8 = expect_narrow("privilege", &v)?;
                c.privilege = Privilege::from_u8(raw)
                    .ok_or_else(|| Error::property_mismatch("privilege", "privilege", "int"))?;
                Ok(())
            },
        ),
        Property::new::<Character>(
            "master",
            PropertyKind::Reference,
            |c| Value::Entity(c.master),
            |c, v| {
                c.master = expect_entity("master", &v)?;
                Ok(())
            },
        ),
        Property::new::<Character>(
            "stats",
            PropertyKind::Composite,
            |c| c.stats.to_value(),
            |c, v| {
                c.stats = Stats::from_value(&v)?;
                Ok(())
            },
        ),
    ]
}

impl Entity for Character {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn encode(&self, enc: &mut Encoder) {
        enc.write_version(CHARACTER_VERSION);
        enc.write_str(&self.name);
        enc.write_u16(self.body);
        enc.write_u16(self.hue);
        enc.write_u8(self.privilege.as_u8());
        enc.write_reference(self.backpack);
        enc.write_reference(self.master);
        enc.write_u16(self.stats.str);
        enc.write_u16(self.stats.dex);
        enc.write_u16(self.stats.int);
    }

    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        let version = dec.read_version(CHARACTER_VERSION, "character")?;
        self.name = Arc::from(dec.read_str()?);
        self.body = dec.read_u16()?;
        self.hue = dec.read_u16()?;
        let raw = dec.read_u8()?;
        self.privilege = Privilege::from_u8(raw)
            .ok_or_else(|| Error::invalid_data(format!("unknown privilege level {raw}")))?;
        if version >= 1 {
            self.backpack = dec.read_entity()?;
            self.master = dec.read_entity()?;
        }
        if version >= 2 {
            self.stats = Stats {
                str: dec.read_u16()?,
                dex: dec.read_u16()?,
                int: dec.read_u16()?,
            };
        }
        Ok(())
    }

    fn accepts_children(&self) -> bool {
        true
    }
}
