#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative in-memory world grid for Seedfall.
//!
//! The world owns the block volume campaigns land into, the accessibility
//! state of its regions, and the pickup objects materialized by payload
//! compensation. Campaigns never cache block state across ticks: the grid may
//! be mutated by unrelated activity between ticks, so every query here
//! reflects the current instant.

use std::collections::HashMap;

use seedfall_core::{ActorId, BlockKind, GridPos, ItemKind, Payload, PICKUP_GRACE_TICKS};
use thiserror::Error;

const SCATTER_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Axis-aligned bounds of the world volume.
///
/// Minimum corner inclusive, maximum corner exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldBounds {
    min: GridPos,
    max: GridPos,
}

impl WorldBounds {
    /// Creates new bounds from an inclusive minimum and exclusive maximum.
    #[must_use]
    pub const fn new(min: GridPos, max: GridPos) -> Self {
        Self { min, max }
    }

    /// Inclusive minimum corner of the volume.
    #[must_use]
    pub const fn min(&self) -> GridPos {
        self.min
    }

    /// Exclusive maximum corner of the volume.
    #[must_use]
    pub const fn max(&self) -> GridPos {
        self.max
    }

    /// Reports whether the provided cell lies inside the volume.
    #[must_use]
    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.x() >= self.min.x()
            && pos.x() < self.max.x()
            && pos.y() >= self.min.y()
            && pos.y() < self.max.y()
            && pos.z() >= self.min.z()
            && pos.z() < self.max.z()
    }
}

/// Horizontal coordinate of a 16×16-column region of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionCoord {
    x: i32,
    z: i32,
}

impl RegionCoord {
    /// Creates a region coordinate from explicit region indices.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Region that contains the provided cell.
    #[must_use]
    pub const fn containing(pos: GridPos) -> Self {
        Self {
            x: pos.x() >> 4,
            z: pos.z() >> 4,
        }
    }

    /// Region index along the x axis.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Region index along the z axis.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }
}

/// Accessibility state of one region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionState {
    /// Whether the region is resident in memory.
    pub loaded: bool,
    /// Whether the region's terrain has been generated.
    pub generated: bool,
    /// Whether the region is locked by a concurrent mutation.
    pub locked: bool,
}

impl RegionState {
    /// State of a region that placements may touch.
    #[must_use]
    pub const fn accessible() -> Self {
        Self {
            loaded: true,
            generated: true,
            locked: false,
        }
    }

    /// Reports whether placements may touch cells of this region.
    #[must_use]
    pub const fn is_accessible(&self) -> bool {
        self.loaded && self.generated && !self.locked
    }
}

impl Default for RegionState {
    fn default() -> Self {
        Self::accessible()
    }
}

/// Item object lying in the world, awaiting collection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pickup {
    pos: GridPos,
    item: ItemKind,
    owner: ActorId,
    grace_ticks: u32,
    motion: (f64, f64, f64),
}

impl Pickup {
    /// Cell the pickup materialized at.
    #[must_use]
    pub const fn pos(&self) -> GridPos {
        self.pos
    }

    /// Item the pickup carries.
    #[must_use]
    pub const fn item(&self) -> ItemKind {
        self.item
    }

    /// Actor the pickup belongs to.
    #[must_use]
    pub const fn owner(&self) -> ActorId {
        self.owner
    }

    /// Remaining ticks before the pickup may be collected.
    #[must_use]
    pub const fn grace_ticks(&self) -> u32 {
        self.grace_ticks
    }

    /// Initial scatter motion applied for presentation.
    #[must_use]
    pub const fn motion(&self) -> (f64, f64, f64) {
        self.motion
    }
}

/// Reasons an already-validated placement commit can be refused.
///
/// The landing resolver validates before committing, so within one tick these
/// only fire if the resolver and the world disagree; the resolver folds them
/// into the ordinary failure branch so the payload is still compensated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CommitError {
    /// The target cell lies outside the world volume.
    #[error("target cell lies outside the world bounds")]
    OutOfBounds,
    /// The target cell's region is unloaded, ungenerated, or locked.
    #[error("target region is not accessible")]
    RegionUnavailable,
    /// The payload's placement rule rejects the current cell contents.
    #[error("placement rule rejects the target cell")]
    RuleViolation,
}

/// Authoritative world state: block volume, regions, and loose pickups.
#[derive(Clone, Debug)]
pub struct World {
    bounds: WorldBounds,
    blocks: HashMap<GridPos, BlockKind>,
    regions: HashMap<RegionCoord, RegionState>,
    pickups: Vec<Pickup>,
    scatter_state: u64,
}

impl World {
    /// Creates an empty world spanning the provided bounds.
    #[must_use]
    pub fn with_bounds(bounds: WorldBounds) -> Self {
        Self {
            bounds,
            blocks: HashMap::new(),
            regions: HashMap::new(),
            pickups: Vec::new(),
            scatter_state: SCATTER_SEED,
        }
    }

    /// Creates a world with a flat soil floor at its minimum height.
    ///
    /// The volume spans `[0, width) × [0, height) × [0, depth)` with every
    /// column's y = 0 cell filled with [`BlockKind::Soil`].
    #[must_use]
    pub fn flat(width: i32, height: i32, depth: i32) -> Self {
        let bounds = WorldBounds::new(GridPos::new(0, 0, 0), GridPos::new(width, height, depth));
        let mut world = Self::with_bounds(bounds);
        for x in 0..width {
            for z in 0..depth {
                world.set_block(GridPos::new(x, 0, z), BlockKind::Soil);
            }
        }
        world
    }

    /// Bounds of the world volume.
    #[must_use]
    pub const fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Reports whether the provided cell lies inside the world volume.
    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        self.bounds.contains(pos)
    }

    /// Content of the provided cell; cells never written read as empty.
    #[must_use]
    pub fn block_at(&self, pos: GridPos) -> BlockKind {
        self.blocks.get(&pos).copied().unwrap_or(BlockKind::Empty)
    }

    /// Writes the provided block, ignoring cells outside the volume.
    pub fn set_block(&mut self, pos: GridPos, kind: BlockKind) {
        if !self.bounds.contains(pos) {
            return;
        }
        if kind == BlockKind::Empty {
            let _ = self.blocks.remove(&pos);
        } else {
            let _ = self.blocks.insert(pos, kind);
        }
    }

    /// Current state of the provided region; untouched regions are accessible.
    #[must_use]
    pub fn region_state(&self, region: RegionCoord) -> RegionState {
        self.regions.get(&region).copied().unwrap_or_default()
    }

    /// Overrides the state of the provided region.
    pub fn set_region_state(&mut self, region: RegionCoord, state: RegionState) {
        let _ = self.regions.insert(region, state);
    }

    /// Reports whether the region owning the provided cell may be touched.
    #[must_use]
    pub fn region_accessible(&self, pos: GridPos) -> bool {
        self.region_state(RegionCoord::containing(pos)).is_accessible()
    }

    /// Commits a validated placement as one atomic, fully-applied mutation.
    ///
    /// Re-validates against the current grid at the moment of the commit;
    /// nothing is written when any check fails.
    pub fn commit_placement(
        &mut self,
        support: GridPos,
        target: GridPos,
        payload: &Payload,
    ) -> Result<(), CommitError> {
        if !self.bounds.contains(target) {
            return Err(CommitError::OutOfBounds);
        }
        if !self.region_accessible(target) {
            return Err(CommitError::RegionUnavailable);
        }
        if !payload.validate(self.block_at(support), self.block_at(target)) {
            return Err(CommitError::RuleViolation);
        }
        self.set_block(target, payload.placed_block());
        Ok(())
    }

    /// Materializes a pickup owned by the provided actor at the given cell.
    ///
    /// The pickup carries the standard collection grace and a deterministic
    /// scatter motion for presentation.
    pub fn drop_pickup(&mut self, pos: GridPos, item: ItemKind, owner: ActorId) {
        let motion_x = self.next_scatter() * 0.2 - 0.1;
        let motion_z = self.next_scatter() * 0.2 - 0.1;
        self.pickups.push(Pickup {
            pos,
            item,
            owner,
            grace_ticks: PICKUP_GRACE_TICKS,
            motion: (motion_x, 0.2, motion_z),
        });
    }

    /// Pickups currently lying in the world, in drop order.
    #[must_use]
    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    fn next_scatter(&mut self) -> f64 {
        self.scatter_state = next_random(self.scatter_state);
        (self.scatter_state >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn next_random(state: u64) -> u64 {
    state.wrapping_mul(636_413_622_384_679_3005).wrapping_add(1)
}
