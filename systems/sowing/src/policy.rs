//! Synchronous veto hooks consulted before campaign start and placement.

use seedfall_core::{ActorId, GridPos, Payload, SowingConfig};

/// External policy consulted before irreversible campaign actions.
///
/// Both hooks are synchronous: every observer answers before the triggering
/// call returns, and a denial rolls the action back with no visible effect.
pub trait SowingPolicy {
    /// Decides whether a campaign may start at all.
    fn allow_start(&mut self, actor: ActorId, origin: GridPos, config: &SowingConfig) -> bool;

    /// Decides whether a validated placement may commit into the target cell.
    fn allow_place(&mut self, actor: ActorId, payload: &Payload, target: GridPos) -> bool;
}

/// Policy that permits every campaign and every placement.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl SowingPolicy for AllowAll {
    fn allow_start(&mut self, _actor: ActorId, _origin: GridPos, _config: &SowingConfig) -> bool {
        true
    }

    fn allow_place(&mut self, _actor: ActorId, _payload: &Payload, _target: GridPos) -> bool {
        true
    }
}
