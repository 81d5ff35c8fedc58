//! Integration tests for subtree duplication

mod audit;
mod scenarios;

use std::sync::Arc;

use strongbox_clone::Actor;
use strongbox_foundation::{EntityId, Point3, Privilege, Region};
use strongbox_stock::{Character, Container, Item, ItemData, stock_registry, tags};
use strongbox_storage::World;

/// A world with a treasure chest: a coin, and a pouch holding a ruby and
/// a jade figurine. The ruby belongs to `owner`.
pub struct Vault {
    pub world: World,
    pub owner: EntityId,
    pub chest: EntityId,
    pub pouch: EntityId,
    pub ruby: EntityId,
}

fn item(world: &mut World, name: &str, weight: u32, parent: EntityId) -> EntityId {
    let id = world.spawn(tags::ITEM).unwrap();
    world.get_as_mut::<Item>(id).unwrap().data = ItemData::named(name, weight);
    world.update_totals(id);
    world.attach(id, parent).unwrap();
    id
}

pub fn vault() -> Vault {
    let mut world = World::new(stock_registry().unwrap());
    let owner = world.spawn(tags::CHARACTER).unwrap();
    world.get_as_mut::<Character>(owner).unwrap().name = Arc::from("Iolo");

    let chest = world.spawn(tags::CONTAINER).unwrap();
    world.get_as_mut::<Container>(chest).unwrap().item = ItemData::named("chest", 5);
    world
        .move_to_world(chest, Point3::new(10, 20, 0), Region(1))
        .unwrap();
    item(&mut world, "coin", 1, chest);
    let pouch = world.spawn(tags::CONTAINER).unwrap();
    world.attach(pouch, chest).unwrap();
    let ruby = item(&mut world, "ruby", 2, pouch);
    {
        let data = &mut world.get_as_mut::<Item>(ruby).unwrap().data;
        data.owner = owner;
        data.attributes.set("luster", 9);
    }
    item(&mut world, "jade", 3, pouch);
    world.update_all_totals();
    world.take_changed();

    Vault {
        world,
        owner,
        chest,
        pouch,
        ruby,
    }
}

/// A game master standing next to the vault.
pub fn game_master(world: &mut World) -> Actor {
    let gm = world.spawn(tags::CHARACTER).unwrap();
    world.get_as_mut::<Character>(gm).unwrap().privilege = Privilege::GameMaster;
    world
        .move_to_world(gm, Point3::new(11, 20, 0), Region(1))
        .unwrap();
    Character::equip_backpack(world, gm).unwrap();
    world.take_changed();
    Actor::character(world, gm).unwrap()
}
