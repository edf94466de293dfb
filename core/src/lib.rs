#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Seedfall engine.
//!
//! This crate defines the vocabulary that connects the trigger surface, the
//! authoritative world grid, and the pure systems: grid coordinates and
//! facings, payload kinds and their placement rules, actor state consumed by
//! campaigns, configuration, and the fire-and-forget [`ViewEvent`] stream that
//! presentation adapters subscribe to. Nothing in this crate mutates a world;
//! it only names things precisely.

use serde::{Deserialize, Serialize};

/// Number of ticks a dropped pickup ignores collection attempts.
///
/// Keeps a returned payload from re-entering the owning actor's interaction
/// window in the same instant it materialized.
pub const PICKUP_GRACE_TICKS: u32 = 10;

/// Horizontal displacement between two grid columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridOffset {
    x: i32,
    z: i32,
}

impl GridOffset {
    /// Creates a new horizontal offset.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Displacement along the x axis.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Displacement along the z axis.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Returns the offset shifted one cell along the provided facing.
    #[must_use]
    pub const fn stepped(self, direction: Direction) -> Self {
        let step = direction.unit_offset();
        Self {
            x: self.x + step.x,
            z: self.z + step.z,
        }
    }

    /// Chebyshev distance of the offset from the origin column.
    #[must_use]
    pub const fn chebyshev_radius(&self) -> i32 {
        let x = self.x.abs();
        let z = self.z.abs();
        if x > z {
            x
        } else {
            z
        }
    }
}

/// Location of a single cell in the world grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    x: i32,
    y: i32,
    z: i32,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Cell index along the x axis.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Cell index along the vertical axis.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Cell index along the z axis.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Returns the cell directly above this one.
    #[must_use]
    pub const fn up(&self) -> Self {
        Self {
            x: self.x,
            y: self.y + 1,
            z: self.z,
        }
    }

    /// Returns the cell displaced horizontally by the provided offset.
    #[must_use]
    pub const fn offset_by(&self, offset: GridOffset) -> Self {
        Self {
            x: self.x + offset.x(),
            y: self.y,
            z: self.z + offset.z(),
        }
    }
}

/// Cardinal horizontal facings available to actors and spiral walks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Facing toward decreasing z indices.
    North,
    /// Facing toward increasing x indices.
    East,
    /// Facing toward increasing z indices.
    South,
    /// Facing toward decreasing x indices.
    West,
}

impl Direction {
    /// Unit horizontal displacement along this facing.
    #[must_use]
    pub const fn unit_offset(self) -> GridOffset {
        match self {
            Self::North => GridOffset::new(0, -1),
            Self::East => GridOffset::new(1, 0),
            Self::South => GridOffset::new(0, 1),
            Self::West => GridOffset::new(-1, 0),
        }
    }

    /// Returns the facing rotated 90 degrees around the vertical axis.
    ///
    /// Clockwise rotation cycles North → East → South → West; passing
    /// `clockwise = false` cycles the opposite way.
    #[must_use]
    pub const fn rotated_y(self, clockwise: bool) -> Self {
        match (self, clockwise) {
            (Self::North, true) | (Self::South, false) => Self::East,
            (Self::East, true) | (Self::West, false) => Self::South,
            (Self::South, true) | (Self::North, false) => Self::West,
            (Self::West, true) | (Self::East, false) => Self::North,
        }
    }
}

/// Content occupying a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Nothing occupies the cell.
    Empty,
    /// Tilled ground that accepts sown sprouts.
    Soil,
    /// Inert solid ground.
    Stone,
    /// A freshly sown, still growing plant.
    Sprout,
    /// A fully grown plant.
    Crop,
}

impl BlockKind {
    /// Reports whether a falling unit comes to rest inside this cell.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Soil | Self::Stone)
    }

    /// Reports whether this block may sit on top of the provided support.
    #[must_use]
    pub const fn can_rest_on(self, support: BlockKind) -> bool {
        match self {
            Self::Sprout | Self::Crop => matches!(support, Self::Soil),
            Self::Soil | Self::Stone => support.is_solid(),
            Self::Empty => false,
        }
    }
}

/// Portable item forms that payloads deduct from and refund to inventories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Seed item that sows a [`BlockKind::Sprout`].
    SproutSeed,
    /// Growth accelerant applied to an existing sprout.
    Fertilizer,
}

/// Content carried by one falling unit, chosen from the actor's held item.
///
/// Exactly one concrete kind exists per unit. The per-kind semantics —
/// placement rule, committed block, refundable item — live on this type so
/// the simulation never branches on payload subclasses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Payload {
    /// Placeable block content committed into the grid on landing.
    Block {
        /// Block written into the target cell when placement succeeds.
        block: BlockKind,
    },
    /// Portable item applied to the landing cell rather than stacked into it.
    Item {
        /// Item consumed by a successful application.
        item: ItemKind,
    },
}

impl Payload {
    /// Chooses the payload kind matching a held item.
    #[must_use]
    pub const fn from_item(item: ItemKind) -> Self {
        match item {
            ItemKind::SproutSeed => Self::Block {
                block: BlockKind::Sprout,
            },
            ItemKind::Fertilizer => Self::Item {
                item: ItemKind::Fertilizer,
            },
        }
    }

    /// Placement rule evaluated against the supporting cell and the target
    /// cell directly above it.
    #[must_use]
    pub const fn validate(&self, support: BlockKind, target: BlockKind) -> bool {
        match self {
            Self::Block { block } => {
                matches!(target, BlockKind::Empty) && block.can_rest_on(support)
            }
            Self::Item {
                item: ItemKind::Fertilizer,
            } => support.is_solid() && matches!(target, BlockKind::Sprout),
            Self::Item { .. } => false,
        }
    }

    /// Block written into the target cell by a successful placement.
    #[must_use]
    pub const fn placed_block(&self) -> BlockKind {
        match self {
            Self::Block { block } => *block,
            Self::Item {
                item: ItemKind::Fertilizer,
            } => BlockKind::Crop,
            Self::Item {
                item: ItemKind::SproutSeed,
            } => BlockKind::Sprout,
        }
    }

    /// Item form refunded or dropped when the payload leaves simulation
    /// unplaced, if one exists.
    #[must_use]
    pub const fn picked_item(&self) -> Option<ItemKind> {
        match self {
            Self::Block { block } => match block {
                BlockKind::Sprout | BlockKind::Crop => Some(ItemKind::SproutSeed),
                BlockKind::Empty | BlockKind::Soil | BlockKind::Stone => None,
            },
            Self::Item { item } => Some(*item),
        }
    }
}

/// Unique identifier assigned to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a falling unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u64);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Monotonic allocator handing out [`UnitId`] values across campaigns.
///
/// Presentation adapters key spawned visuals by unit id, so ids must stay
/// unique for the lifetime of the process, not merely per session.
#[derive(Clone, Debug, Default)]
pub struct UnitIdAllocator {
    next: u64,
}

impl UnitIdAllocator {
    /// Creates an allocator starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocates the next unused unit identifier.
    pub fn allocate(&mut self) -> UnitId {
        let id = UnitId::new(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Stack of identical items held in an actor's hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeldStack {
    /// Item kind contained in the stack.
    pub item: ItemKind,
    /// Remaining units in the stack.
    pub count: u32,
}

impl HeldStack {
    /// Creates a new held stack.
    #[must_use]
    pub const fn new(item: ItemKind, count: u32) -> Self {
        Self { item, count }
    }
}

/// Bounded item storage owned by an actor.
///
/// Refunded payloads deposit here first; a full inventory turns the refund
/// into a dropped pickup instead.
#[derive(Clone, Debug)]
pub struct Inventory {
    capacity: usize,
    items: Vec<ItemKind>,
}

impl Inventory {
    /// Creates an empty inventory with the provided slot capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    /// Attempts to store one item, reporting whether it fit.
    #[must_use]
    pub fn add(&mut self, item: ItemKind) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Number of stored items of the provided kind.
    #[must_use]
    pub fn count_of(&self, item: ItemKind) -> usize {
        self.items.iter().filter(|stored| **stored == item).count()
    }

    /// Total number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Reports whether the inventory holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reports whether no further item fits.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }
}

/// Mutable actor state consumed and compensated by sowing campaigns.
///
/// Owned by the caller, never by a session: a session borrows the actor for
/// the duration of a single tick only.
#[derive(Clone, Debug)]
pub struct ActorState {
    /// Identifier of the actor.
    pub id: ActorId,
    /// Whether the actor is still connected; disconnection cancels campaigns.
    pub connected: bool,
    /// Whether the actor draws from an unlimited resource pool.
    pub unlimited_resources: bool,
    /// Horizontal facing used as the spiral's base direction.
    pub facing: Direction,
    /// Stack currently held in the actor's hand, if any.
    pub held: Option<HeldStack>,
    /// Inventory receiving refunded payloads.
    pub inventory: Inventory,
}

impl ActorState {
    /// Creates a connected, finite-resource actor with an empty hand.
    #[must_use]
    pub fn new(id: ActorId, facing: Direction, inventory_capacity: usize) -> Self {
        Self {
            id,
            connected: true,
            unlimited_resources: false,
            facing,
            held: None,
            inventory: Inventory::with_capacity(inventory_capacity),
        }
    }
}

/// Configuration surface for sowing campaigns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SowingConfig {
    /// Maximum number of spiral steps, and therefore launched units.
    pub max_steps: u32,
    /// Additional launch height granted to each successive unit.
    pub rise_per_step: f64,
    /// Whether the spiral winds clockwise around the origin.
    pub clockwise: bool,
}

impl SowingConfig {
    /// Creates a configuration with explicit values.
    #[must_use]
    pub const fn new(max_steps: u32, rise_per_step: f64, clockwise: bool) -> Self {
        Self {
            max_steps,
            rise_per_step,
            clockwise,
        }
    }
}

impl Default for SowingConfig {
    fn default() -> Self {
        Self {
            max_steps: 32,
            rise_per_step: 32.0,
            clockwise: true,
        }
    }
}

/// Trigger input that requests a new sowing campaign.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SowingTrigger {
    /// Cell the actor targeted; units land in the column above it and its
    /// spiral neighbours.
    pub origin: GridPos,
    /// Campaign parameters supplied by the trigger surface.
    pub config: SowingConfig,
}

impl SowingTrigger {
    /// Creates a new trigger descriptor.
    #[must_use]
    pub const fn new(origin: GridPos, config: SowingConfig) -> Self {
        Self { origin, config }
    }
}

/// Continuous position of a falling unit, for presentation only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallPos {
    /// Grid column of the unit along the x axis.
    pub x: i32,
    /// Continuous height of the unit.
    pub y: f64,
    /// Grid column of the unit along the z axis.
    pub z: i32,
}

impl FallPos {
    /// Creates a new continuous position.
    #[must_use]
    pub const fn new(x: i32, y: f64, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Fire-and-forget observer events describing falling visuals.
///
/// Presentation and network adapters consume these; the simulation never
/// reads them back, so dropping the stream cannot affect correctness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewEvent {
    /// A falling unit entered the world.
    UnitSpawned {
        /// Identifier of the spawned unit.
        unit: UnitId,
        /// Launch position of the unit.
        pos: FallPos,
        /// Payload the unit carries, for choosing a visual.
        descriptor: Payload,
    },
    /// A falling unit moved.
    UnitMoved {
        /// Identifier of the moving unit.
        unit: UnitId,
        /// Position after the move.
        pos: FallPos,
    },
    /// A falling unit left the world.
    UnitDespawned {
        /// Identifier of the removed unit.
        unit: UnitId,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        ActorId, BlockKind, Direction, GridOffset, GridPos, ItemKind, Payload, SowingConfig,
        UnitIdAllocator,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn clockwise_rotation_cycles_through_all_facings() {
        let mut facing = Direction::North;
        let mut visited = Vec::new();
        for _ in 0..4 {
            facing = facing.rotated_y(true);
            visited.push(facing);
        }
        assert_eq!(
            visited,
            vec![
                Direction::East,
                Direction::South,
                Direction::West,
                Direction::North
            ]
        );
    }

    #[test]
    fn counter_clockwise_rotation_inverts_clockwise() {
        for facing in [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ] {
            assert_eq!(facing.rotated_y(true).rotated_y(false), facing);
        }
    }

    #[test]
    fn sprout_payload_requires_soil_support_and_empty_target() {
        let payload = Payload::from_item(ItemKind::SproutSeed);
        assert!(payload.validate(BlockKind::Soil, BlockKind::Empty));
        assert!(!payload.validate(BlockKind::Stone, BlockKind::Empty));
        assert!(!payload.validate(BlockKind::Soil, BlockKind::Sprout));
    }

    #[test]
    fn fertilizer_payload_requires_sprout_target() {
        let payload = Payload::from_item(ItemKind::Fertilizer);
        assert!(payload.validate(BlockKind::Soil, BlockKind::Sprout));
        assert!(!payload.validate(BlockKind::Soil, BlockKind::Empty));
        assert!(!payload.validate(BlockKind::Soil, BlockKind::Crop));
    }

    #[test]
    fn payload_refund_forms_match_their_kinds() {
        assert_eq!(
            Payload::from_item(ItemKind::SproutSeed).picked_item(),
            Some(ItemKind::SproutSeed)
        );
        assert_eq!(
            Payload::from_item(ItemKind::Fertilizer).picked_item(),
            Some(ItemKind::Fertilizer)
        );
        assert_eq!(
            Payload::Block {
                block: BlockKind::Stone
            }
            .picked_item(),
            None
        );
    }

    #[test]
    fn offset_step_matches_facing_axes() {
        let origin = GridOffset::new(0, 0);
        assert_eq!(origin.stepped(Direction::North), GridOffset::new(0, -1));
        assert_eq!(origin.stepped(Direction::East), GridOffset::new(1, 0));
        assert_eq!(origin.stepped(Direction::South), GridOffset::new(0, 1));
        assert_eq!(origin.stepped(Direction::West), GridOffset::new(-1, 0));
    }

    #[test]
    fn unit_id_allocation_is_monotonic() {
        let mut allocator = UnitIdAllocator::new();
        let first = allocator.allocate();
        let second = allocator.allocate();
        assert!(second > first);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_pos_round_trips_through_bincode() {
        assert_round_trip(&GridPos::new(-3, 64, 17));
    }

    #[test]
    fn payload_round_trips_through_bincode() {
        assert_round_trip(&Payload::from_item(ItemKind::Fertilizer));
    }

    #[test]
    fn actor_id_round_trips_through_bincode() {
        assert_round_trip(&ActorId::new(7));
    }

    #[test]
    fn config_defaults_match_documented_surface() {
        let config = SowingConfig::default();
        assert_eq!(config.max_steps, 32);
        assert!((config.rise_per_step - 32.0).abs() < f64::EPSILON);
        assert!(config.clockwise);
    }
}
