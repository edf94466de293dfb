use seedfall_core::{
    ActorId, ActorState, BlockKind, Direction, GridPos, HeldStack, ItemKind, SowingConfig,
    SowingTrigger, UnitIdAllocator, ViewEvent, PICKUP_GRACE_TICKS,
};
use seedfall_system_sowing::{AllowAll, ConcurrencyLedger, Disposition, Session};
use seedfall_world::World;

fn seed_actor(held: u32) -> ActorState {
    let mut actor = ActorState::new(ActorId::new(9), Direction::North, 64);
    actor.held = Some(HeldStack::new(ItemKind::SproutSeed, held));
    actor
}

fn trigger() -> SowingTrigger {
    SowingTrigger::new(GridPos::new(4, 0, 4), SowingConfig::new(5, 32.0, true))
}

#[test]
fn cancel_refunds_every_airborne_unit_synchronously() {
    let ledger = ConcurrencyLedger::new();
    let mut world = World::flat(16, 256, 16);
    let mut actor = seed_actor(5);
    let mut ids = UnitIdAllocator::new();
    let mut events = Vec::new();

    let mut session = Session::start(
        &ledger,
        &world,
        &mut actor,
        trigger(),
        &mut AllowAll,
        &mut ids,
        &mut events,
    )
    .expect("start must succeed");

    // One airborne tick; with a 32-cell stagger nothing lands this early.
    let report = session.advance(&mut world, &mut actor, &mut AllowAll, &mut events);
    assert!(report.resolved.is_empty());
    assert_eq!(session.active_units(), 5);

    let report = session.cancel(&mut world, &mut actor, &mut events);

    assert!(report.finished);
    assert_eq!(report.resolved.len(), 5);
    assert!(report
        .resolved
        .iter()
        .all(|outcome| outcome.disposition == Disposition::Returned));
    assert_eq!(session.active_units(), 0);
    assert_eq!(actor.inventory.count_of(ItemKind::SproutSeed), 5);
    assert!(world.pickups().is_empty());
    assert_eq!(
        world.block_at(GridPos::new(4, 1, 3)),
        BlockKind::Empty,
        "cancellation must not commit anything into the grid",
    );
}

#[test]
fn ledger_count_drops_exactly_once_per_campaign() {
    let ledger = ConcurrencyLedger::new();
    let mut world = World::flat(16, 256, 16);
    let mut actor = seed_actor(5);
    let mut ids = UnitIdAllocator::new();
    let mut events = Vec::new();

    let mut session = Session::start(
        &ledger,
        &world,
        &mut actor,
        trigger(),
        &mut AllowAll,
        &mut ids,
        &mut events,
    )
    .expect("start must succeed");
    assert_eq!(ledger.active(actor.id), 1);

    let _ = session.cancel(&mut world, &mut actor, &mut events);
    assert_eq!(
        ledger.active(actor.id),
        1,
        "cancellation resolves units; the registration lives until the session drops",
    );

    drop(session);
    assert_eq!(ledger.active(actor.id), 0);
}

#[test]
fn disconnection_drops_pickups_instead_of_refunding() {
    let ledger = ConcurrencyLedger::new();
    let mut world = World::flat(16, 256, 16);
    let mut actor = seed_actor(3);
    let mut ids = UnitIdAllocator::new();
    let mut events = Vec::new();

    let mut session = Session::start(
        &ledger,
        &world,
        &mut actor,
        SowingTrigger::new(GridPos::new(4, 0, 4), SowingConfig::new(3, 32.0, true)),
        &mut AllowAll,
        &mut ids,
        &mut events,
    )
    .expect("start must succeed");

    let _ = session.advance(&mut world, &mut actor, &mut AllowAll, &mut events);
    actor.connected = false;
    let report = session.advance(&mut world, &mut actor, &mut AllowAll, &mut events);

    assert!(report.finished);
    assert_eq!(report.resolved.len(), 3);
    assert!(report
        .resolved
        .iter()
        .all(|outcome| outcome.disposition == Disposition::Dropped));
    assert!(actor.inventory.is_empty());
    assert_eq!(world.pickups().len(), 3);
    for pickup in world.pickups() {
        assert_eq!(pickup.owner(), actor.id);
        assert_eq!(pickup.grace_ticks(), PICKUP_GRACE_TICKS);
    }
}

#[test]
fn cancelled_units_despawn_for_observers() {
    let ledger = ConcurrencyLedger::new();
    let mut world = World::flat(16, 256, 16);
    let mut actor = seed_actor(5);
    let mut ids = UnitIdAllocator::new();
    let mut events = Vec::new();

    let mut session = Session::start(
        &ledger,
        &world,
        &mut actor,
        trigger(),
        &mut AllowAll,
        &mut ids,
        &mut events,
    )
    .expect("start must succeed");
    let _ = session.cancel(&mut world, &mut actor, &mut events);

    let spawned = events
        .iter()
        .filter(|event| matches!(event, ViewEvent::UnitSpawned { .. }))
        .count();
    let despawned = events
        .iter()
        .filter(|event| matches!(event, ViewEvent::UnitDespawned { .. }))
        .count();
    assert_eq!(spawned, 5);
    assert_eq!(despawned, 5);
}
