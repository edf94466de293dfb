//! Payload disposition for units that leave simulation unplaced.

use seedfall_core::{ActorState, GridPos, Payload};
use seedfall_world::World;

use crate::Disposition;

/// How an unplaced payload should be given back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RefundMode {
    /// Payload was deducted up front: deposit into the inventory, or drop a
    /// pickup when the actor is gone or the inventory is full.
    Refund,
    /// Payload was deducted but the inventory must be bypassed; used for the
    /// floor-bound force-termination.
    ForceDrop,
    /// Nothing was deducted: the payload evaporates without side effects.
    Discard,
}

/// Resolves the payload of one unit leaving simulation unplaced.
///
/// Exactly-once accounting: each unit passes through here at most once, and
/// only when its payload was not placed. The returned disposition is
/// [`Disposition::Returned`] only when the payload actually reached the
/// owning actor's inventory; every other path either drops a pickup at the
/// failure location or, for undeducted payloads, discards silently.
pub(crate) fn resolve_unplaced(
    world: &mut World,
    actor: &mut ActorState,
    payload: &Payload,
    at: GridPos,
    mode: RefundMode,
) -> Disposition {
    let Some(item) = payload.picked_item() else {
        return Disposition::Dropped;
    };
    match mode {
        RefundMode::Discard => Disposition::Dropped,
        RefundMode::ForceDrop => {
            world.drop_pickup(at, item, actor.id);
            Disposition::Dropped
        }
        RefundMode::Refund => {
            if actor.connected && actor.inventory.add(item) {
                Disposition::Returned
            } else {
                world.drop_pickup(at, item, actor.id);
                Disposition::Dropped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedfall_core::{ActorId, Direction, ItemKind};

    fn actor_with_space() -> ActorState {
        ActorState::new(ActorId::new(1), Direction::North, 8)
    }

    #[test]
    fn refund_deposits_into_the_inventory() {
        let mut world = World::flat(4, 8, 4);
        let mut actor = actor_with_space();
        let payload = Payload::from_item(ItemKind::SproutSeed);
        let disposition = resolve_unplaced(
            &mut world,
            &mut actor,
            &payload,
            GridPos::new(1, 1, 1),
            RefundMode::Refund,
        );
        assert_eq!(disposition, Disposition::Returned);
        assert_eq!(actor.inventory.count_of(ItemKind::SproutSeed), 1);
        assert!(world.pickups().is_empty());
    }

    #[test]
    fn full_inventory_turns_refund_into_pickup() {
        let mut world = World::flat(4, 8, 4);
        let mut actor = ActorState::new(ActorId::new(1), Direction::North, 0);
        let payload = Payload::from_item(ItemKind::SproutSeed);
        let disposition = resolve_unplaced(
            &mut world,
            &mut actor,
            &payload,
            GridPos::new(1, 1, 1),
            RefundMode::Refund,
        );
        assert_eq!(disposition, Disposition::Dropped);
        assert_eq!(world.pickups().len(), 1);
        assert_eq!(world.pickups()[0].owner(), actor.id);
    }

    #[test]
    fn disconnected_actor_receives_a_pickup_instead() {
        let mut world = World::flat(4, 8, 4);
        let mut actor = actor_with_space();
        actor.connected = false;
        let payload = Payload::from_item(ItemKind::SproutSeed);
        let disposition = resolve_unplaced(
            &mut world,
            &mut actor,
            &payload,
            GridPos::new(1, 1, 1),
            RefundMode::Refund,
        );
        assert_eq!(disposition, Disposition::Dropped);
        assert!(actor.inventory.is_empty());
        assert_eq!(world.pickups().len(), 1);
    }

    #[test]
    fn discard_mode_leaves_no_trace() {
        let mut world = World::flat(4, 8, 4);
        let mut actor = actor_with_space();
        let payload = Payload::from_item(ItemKind::Fertilizer);
        let disposition = resolve_unplaced(
            &mut world,
            &mut actor,
            &payload,
            GridPos::new(1, 1, 1),
            RefundMode::Discard,
        );
        assert_eq!(disposition, Disposition::Dropped);
        assert!(actor.inventory.is_empty());
        assert!(world.pickups().is_empty());
    }

    #[test]
    fn force_drop_bypasses_a_roomy_inventory() {
        let mut world = World::flat(4, 8, 4);
        let mut actor = actor_with_space();
        let payload = Payload::from_item(ItemKind::SproutSeed);
        let disposition = resolve_unplaced(
            &mut world,
            &mut actor,
            &payload,
            GridPos::new(1, 0, 1),
            RefundMode::ForceDrop,
        );
        assert_eq!(disposition, Disposition::Dropped);
        assert!(actor.inventory.is_empty());
        assert_eq!(world.pickups().len(), 1);
    }
}
