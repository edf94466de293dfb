#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sowing campaign engine: falling units, landing, and compensation.
//!
//! One [`Session`] owns every falling unit launched by a single trigger. The
//! caller drives it with one [`Session::advance`] per global tick; the
//! session integrates each unit's descent, probes the live grid for a
//! landing, commits placements through the landing resolver, and routes every
//! unit that leaves simulation unplaced through the compensation engine so
//! that no payload is ever lost or duplicated — under cancellation, actor
//! disconnection, and grid unavailability alike.

mod compensation;
mod landing;
mod ledger;
mod policy;

pub use ledger::{CampaignGuard, ConcurrencyLedger};
pub use policy::{AllowAll, SowingPolicy};

use seedfall_core::{
    ActorId, ActorState, FallPos, GridPos, Payload, SowingTrigger, UnitId, UnitIdAllocator,
    ViewEvent,
};
use seedfall_system_spiral::SpiralPath;
use seedfall_world::World;

use crate::compensation::RefundMode;

/// Downward acceleration applied to a falling unit each tick.
const GRAVITY_PER_TICK: f64 = 0.04;

/// Clamp on downward velocity.
const TERMINAL_VELOCITY: f64 = -0.9;

/// Height above the campaign's base target below which landing probes run.
///
/// Units launch staggered far above the target column; while a unit is more
/// than this margin above the base target height it passes solid cells
/// without landing, so terrain above the target plane cannot intercept a
/// high-flying unit meant for a lower cell.
const LANDING_PROBE_MARGIN: f64 = 2.0;

/// Reasons a campaign trigger is refused before any unit launches.
///
/// These are caller preconditions in the sense that a refused start has no
/// observable effect: nothing was deducted, nothing spawned, nothing counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartRejection {
    /// The actor already has a campaign in flight.
    CampaignInFlight,
    /// The actor is no longer connected.
    ActorDisconnected,
    /// The actor holds nothing, or a finite-resource actor holds zero units.
    EmptyHand,
    /// The targeted origin cell lies outside the world volume.
    OriginOutsideWorld,
    /// The configuration produced no units to launch.
    EmptyCampaign,
    /// An external policy vetoed the campaign start.
    Vetoed,
}

/// Terminal outcome of one unit's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// The payload was committed into the grid.
    Placed,
    /// The payload returned to the owning actor's inventory.
    Returned,
    /// The payload materialized as a pickup, or evaporated for an
    /// unlimited-resource actor.
    Dropped,
}

/// Terminal outcome of a single unit, reported by [`Session::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitOutcome {
    /// Unit that left simulation this tick.
    pub unit: UnitId,
    /// What happened to its payload.
    pub disposition: Disposition,
}

/// Result of advancing or cancelling a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Units that reached a terminal outcome during the call, in spawn order.
    pub resolved: Vec<UnitOutcome>,
    /// Whether the session's active set is now empty.
    pub finished: bool,
}

/// Immutable representation of one falling unit, for queries and adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Identifier of the unit.
    pub id: UnitId,
    /// Continuous position of the unit.
    pub pos: FallPos,
    /// Payload the unit carries.
    pub payload: Payload,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UnitStatus {
    Falling,
    Landed,
    Cancelled,
    Placed,
    Returned,
    Dropped,
}

#[derive(Clone, Debug)]
struct FallUnit {
    id: UnitId,
    x: i32,
    z: i32,
    current_y: f64,
    velocity_y: f64,
    payload: Payload,
    status: UnitStatus,
}

impl FallUnit {
    fn cell(&self) -> GridPos {
        GridPos::new(self.x, self.current_y.floor() as i32, self.z)
    }

    fn fall_pos(&self) -> FallPos {
        FallPos::new(self.x, self.current_y, self.z)
    }

    /// One step of descent: accelerate toward terminal velocity, then move.
    fn integrate(&mut self) {
        if self.velocity_y > TERMINAL_VELOCITY {
            self.velocity_y = (self.velocity_y - GRAVITY_PER_TICK).max(TERMINAL_VELOCITY);
        }
        self.current_y += self.velocity_y;
    }
}

/// One sowing campaign: the active unit set and its bookkeeping.
///
/// The session exclusively owns its units; the world, the actor, and the
/// policy are borrowed per call so that many sessions can interleave across
/// ticks. Dropping the session releases its campaign guard.
#[derive(Debug)]
pub struct Session {
    actor: ActorId,
    units: Vec<FallUnit>,
    refund_on_failure: bool,
    base_target_y: f64,
    #[allow(dead_code)]
    guard: CampaignGuard,
}

impl Session {
    /// Starts a campaign for the provided trigger.
    ///
    /// Validates the caller preconditions, consults the start policy hook,
    /// deducts one held unit per launched unit for finite-resource actors
    /// (stopping early when the stack runs out), spawns every unit staggered
    /// by the configured rise, and registers the campaign in the ledger
    /// atomically with unit construction. A rejected start has no observable
    /// effect.
    pub fn start<P>(
        ledger: &ConcurrencyLedger,
        world: &World,
        actor: &mut ActorState,
        trigger: SowingTrigger,
        policy: &mut P,
        ids: &mut UnitIdAllocator,
        out: &mut Vec<ViewEvent>,
    ) -> Result<Self, StartRejection>
    where
        P: SowingPolicy,
    {
        if ledger.active(actor.id) > 0 {
            return Err(StartRejection::CampaignInFlight);
        }
        if !actor.connected {
            return Err(StartRejection::ActorDisconnected);
        }
        if !world.contains(trigger.origin) {
            return Err(StartRejection::OriginOutsideWorld);
        }
        let finite = !actor.unlimited_resources;
        let Some(held) = actor.held.as_mut() else {
            return Err(StartRejection::EmptyHand);
        };
        if finite && held.count == 0 {
            return Err(StartRejection::EmptyHand);
        }
        if !policy.allow_start(actor.id, trigger.origin, &trigger.config) {
            return Err(StartRejection::Vetoed);
        }

        let payload = Payload::from_item(held.item);
        let column_base = trigger.origin.up();
        let base_y = f64::from(column_base.y());
        let config = trigger.config;
        let walk = SpiralPath::new(actor.facing, config.clockwise, config.max_steps);

        let mut units = Vec::new();
        for (index, offset) in walk.enumerate() {
            if finite {
                if held.count == 0 {
                    break;
                }
                held.count -= 1;
            }
            let id = ids.allocate();
            let column = column_base.offset_by(offset);
            let launch_y = base_y + index as f64 * config.rise_per_step;
            let unit = FallUnit {
                id,
                x: column.x(),
                z: column.z(),
                current_y: launch_y,
                velocity_y: 0.0,
                payload,
                status: UnitStatus::Falling,
            };
            out.push(ViewEvent::UnitSpawned {
                unit: id,
                pos: unit.fall_pos(),
                descriptor: payload,
            });
            units.push(unit);
        }

        if units.is_empty() {
            // Only reachable with max_steps = 0: the deduction loop never ran.
            return Err(StartRejection::EmptyCampaign);
        }

        let guard = ledger.acquire(actor.id);
        Ok(Self {
            actor: actor.id,
            units,
            refund_on_failure: finite,
            base_target_y: f64::from(trigger.origin.y()),
            guard,
        })
    }

    /// Actor that initiated the campaign.
    #[must_use]
    pub const fn actor(&self) -> ActorId {
        self.actor
    }

    /// Number of units still falling.
    #[must_use]
    pub fn active_units(&self) -> usize {
        self.units.len()
    }

    /// Reports whether the active set is empty and the session may be dropped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.units.is_empty()
    }

    /// Captures a read-only view of the units still falling, in spawn order.
    #[must_use]
    pub fn unit_view(&self) -> Vec<UnitSnapshot> {
        self.units
            .iter()
            .map(|unit| UnitSnapshot {
                id: unit.id,
                pos: unit.fall_pos(),
                payload: unit.payload,
            })
            .collect()
    }

    /// Advances every falling unit by one tick.
    ///
    /// A disconnected actor cancels the whole session synchronously. Units
    /// below the world floor bound force-terminate without a placement
    /// attempt; units over an inaccessible region, or still above the landing
    /// probe margin, keep falling; units inside a solid cell land and resolve
    /// exactly once through placement or compensation.
    pub fn advance<P>(
        &mut self,
        world: &mut World,
        actor: &mut ActorState,
        policy: &mut P,
        out: &mut Vec<ViewEvent>,
    ) -> TickReport
    where
        P: SowingPolicy,
    {
        if !actor.connected {
            return self.resolve_remaining(world, actor, out);
        }

        let floor_y = world.bounds().min().y();
        let refund = self.refund_on_failure;
        let mut resolved = Vec::new();

        for unit in &mut self.units {
            let cell = unit.cell();
            if unit.current_y < f64::from(floor_y) {
                unit.status = UnitStatus::Dropped;
                let mode = if refund {
                    RefundMode::ForceDrop
                } else {
                    RefundMode::Discard
                };
                let drop_cell = GridPos::new(unit.x, floor_y, unit.z);
                let disposition =
                    compensation::resolve_unplaced(world, actor, &unit.payload, drop_cell, mode);
                resolved.push(UnitOutcome {
                    unit: unit.id,
                    disposition,
                });
                out.push(ViewEvent::UnitDespawned { unit: unit.id });
            } else if unit.current_y - self.base_target_y > LANDING_PROBE_MARGIN
                || !world.region_accessible(cell)
            {
                unit.integrate();
                out.push(ViewEvent::UnitMoved {
                    unit: unit.id,
                    pos: unit.fall_pos(),
                });
            } else if world.block_at(cell).is_solid() {
                unit.status = UnitStatus::Landed;
                let disposition =
                    if landing::try_place(world, actor.id, policy, &unit.payload, cell) {
                        Disposition::Placed
                    } else {
                        let mode = if refund {
                            RefundMode::Refund
                        } else {
                            RefundMode::Discard
                        };
                        compensation::resolve_unplaced(world, actor, &unit.payload, cell.up(), mode)
                    };
                unit.status = match disposition {
                    Disposition::Placed => UnitStatus::Placed,
                    Disposition::Returned => UnitStatus::Returned,
                    Disposition::Dropped => UnitStatus::Dropped,
                };
                resolved.push(UnitOutcome {
                    unit: unit.id,
                    disposition,
                });
                out.push(ViewEvent::UnitDespawned { unit: unit.id });
            } else {
                unit.integrate();
                out.push(ViewEvent::UnitMoved {
                    unit: unit.id,
                    pos: unit.fall_pos(),
                });
            }
        }

        self.units
            .retain(|unit| matches!(unit.status, UnitStatus::Falling));
        TickReport {
            finished: self.units.is_empty(),
            resolved,
        }
    }

    /// Cancels the campaign, resolving every remaining unit synchronously.
    ///
    /// All-or-nothing per session: when this returns, the active set is empty
    /// and every payload has been refunded or dropped.
    pub fn cancel(
        &mut self,
        world: &mut World,
        actor: &mut ActorState,
        out: &mut Vec<ViewEvent>,
    ) -> TickReport {
        self.resolve_remaining(world, actor, out)
    }

    fn resolve_remaining(
        &mut self,
        world: &mut World,
        actor: &mut ActorState,
        out: &mut Vec<ViewEvent>,
    ) -> TickReport {
        let refund = self.refund_on_failure;
        let mut resolved = Vec::new();
        for unit in &mut self.units {
            unit.status = UnitStatus::Cancelled;
            let mode = if refund {
                RefundMode::Refund
            } else {
                RefundMode::Discard
            };
            let disposition =
                compensation::resolve_unplaced(world, actor, &unit.payload, unit.cell(), mode);
            unit.status = match disposition {
                Disposition::Returned => UnitStatus::Returned,
                _ => UnitStatus::Dropped,
            };
            resolved.push(UnitOutcome {
                unit: unit.id,
                disposition,
            });
            out.push(ViewEvent::UnitDespawned { unit: unit.id });
        }
        self.units.clear();
        TickReport {
            resolved,
            finished: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedfall_core::{Direction, HeldStack, ItemKind, SowingConfig};

    #[test]
    fn guard_accessor_reports_the_owning_actor() {
        let ledger = ConcurrencyLedger::new();
        let world = World::flat(8, 8, 8);
        let mut actor = ActorState::new(ActorId::new(4), Direction::North, 8);
        actor.held = Some(HeldStack::new(ItemKind::SproutSeed, 4));
        let mut ids = UnitIdAllocator::new();
        let mut events = Vec::new();
        let trigger = SowingTrigger::new(
            GridPos::new(4, 0, 4),
            SowingConfig::new(4, 1.0, true),
        );
        let session = Session::start(
            &ledger,
            &world,
            &mut actor,
            trigger,
            &mut AllowAll,
            &mut ids,
            &mut events,
        )
        .expect("start must succeed");
        assert_eq!(session.guard.actor(), session.actor());
    }

    #[test]
    fn integrate_clamps_at_terminal_velocity() {
        let mut unit = FallUnit {
            id: UnitId::new(0),
            x: 0,
            z: 0,
            current_y: 100.0,
            velocity_y: 0.0,
            payload: Payload::from_item(ItemKind::SproutSeed),
            status: UnitStatus::Falling,
        };
        for _ in 0..100 {
            unit.integrate();
        }
        assert!((unit.velocity_y - TERMINAL_VELOCITY).abs() < f64::EPSILON);
    }
}
