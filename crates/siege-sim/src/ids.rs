//! Conversion between hecs entities and the stable ids stored in components.
//!
//! A stale id resolves to an entity the world no longer contains, and every
//! lookup through it fails; callers treat that as a no-op.

use hecs::Entity;

use siege_core::types::EntityId;

pub fn to_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

pub fn to_entity(id: EntityId) -> Option<Entity> {
    Entity::from_bits(id.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;

    #[test]
    fn test_id_round_trip() {
        let mut world = World::new();
        let e = world.spawn((1u32,));
        assert_eq!(to_entity(to_id(e)), Some(e));
    }

    #[test]
    fn test_stale_id_fails_lookup() {
        let mut world = World::new();
        let e = world.spawn((1u32,));
        let id = to_id(e);
        world.despawn(e).unwrap();
        let stale = to_entity(id).expect("bits stay well-formed");
        assert!(world.get::<&u32>(stale).is_err(), "despawned entity must not resolve");
    }

    #[test]
    fn test_zero_bits_is_none() {
        assert_eq!(to_entity(EntityId(0)), None);
    }
}
