//! Landing resolution: validate a support cell and commit the placement.

use seedfall_core::{ActorId, GridPos, Payload};
use seedfall_world::World;

use crate::policy::SowingPolicy;

/// Attempts to place the payload on top of the provided support cell.
///
/// Validation runs against the grid as it is *now*, never against an earlier
/// snapshot, because unrelated activity may have mutated the cell since the
/// unit launched. Order: target within bounds, owning region accessible,
/// payload placement rule, then the cancellable pre-commit policy hook.
/// Returns `false` on any validation failure or veto; failure is an expected
/// branch that feeds compensation, not an error.
pub(crate) fn try_place<P>(
    world: &mut World,
    actor: ActorId,
    policy: &mut P,
    payload: &Payload,
    support: GridPos,
) -> bool
where
    P: SowingPolicy,
{
    let target = support.up();
    if !world.contains(target) {
        return false;
    }
    if !world.region_accessible(target) {
        return false;
    }
    if !payload.validate(world.block_at(support), world.block_at(target)) {
        return false;
    }
    if !policy.allow_place(actor, payload, target) {
        return false;
    }
    world.commit_placement(support, target, payload).is_ok()
}
