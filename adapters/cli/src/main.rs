#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs one sowing campaign to completion.
//!
//! Builds a flat soil world, launches a campaign from its centre, drives the
//! session tick by tick, and prints the outcome tallies plus a top-down view
//! of the plane one cell above the soil.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use seedfall_core::{
    ActorId, ActorState, BlockKind, Direction, GridPos, HeldStack, ItemKind, SowingConfig,
    SowingTrigger, UnitIdAllocator,
};
use seedfall_system_sowing::{AllowAll, ConcurrencyLedger, Disposition, Session};
use seedfall_world::World;

const TICK_BUDGET: u32 = 100_000;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Facing {
    North,
    East,
    South,
    West,
}

impl From<Facing> for Direction {
    fn from(facing: Facing) -> Self {
        match facing {
            Facing::North => Self::North,
            Facing::East => Self::East,
            Facing::South => Self::South,
            Facing::West => Self::West,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeldItem {
    Seed,
    Fertilizer,
}

impl From<HeldItem> for ItemKind {
    fn from(item: HeldItem) -> Self {
        match item {
            HeldItem::Seed => Self::SproutSeed,
            HeldItem::Fertilizer => Self::Fertilizer,
        }
    }
}

/// Run a single sowing campaign over a flat soil field.
#[derive(Debug, Parser)]
#[command(name = "seedfall", version)]
struct Args {
    /// Field width in cells.
    #[arg(long, default_value_t = 16)]
    width: i32,
    /// Field depth in cells.
    #[arg(long, default_value_t = 16)]
    depth: i32,
    /// Maximum spiral steps, and therefore launched units.
    #[arg(long, default_value_t = 16)]
    steps: u32,
    /// Additional launch height per successive unit.
    #[arg(long, default_value_t = 4.0)]
    rise: f64,
    /// Wind the spiral counter-clockwise instead of clockwise.
    #[arg(long)]
    counter_clockwise: bool,
    /// Facing used as the spiral's base direction.
    #[arg(long, value_enum, default_value = "north")]
    facing: Facing,
    /// Item the actor holds.
    #[arg(long, value_enum, default_value = "seed")]
    item: HeldItem,
    /// Units in the actor's held stack.
    #[arg(long, default_value_t = 64)]
    held: u32,
    /// Draw from an unlimited resource pool instead of the held stack.
    #[arg(long)]
    unlimited: bool,
}

/// Entry point for the Seedfall command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    if args.width < 1 || args.depth < 1 {
        bail!("the field must be at least one cell wide and deep");
    }

    let mut world = World::flat(args.width, 256, args.depth);
    let origin = GridPos::new(args.width / 2, 0, args.depth / 2);
    let mut actor = ActorState::new(ActorId::new(1), args.facing.into(), 64);
    actor.unlimited_resources = args.unlimited;
    actor.held = Some(HeldStack::new(args.item.into(), args.held));

    let trigger = SowingTrigger::new(
        origin,
        SowingConfig::new(args.steps, args.rise, !args.counter_clockwise),
    );
    let ledger = ConcurrencyLedger::new();
    let mut ids = UnitIdAllocator::new();
    let mut events = Vec::new();

    let mut session = match Session::start(
        &ledger,
        &world,
        &mut actor,
        trigger,
        &mut AllowAll,
        &mut ids,
        &mut events,
    ) {
        Ok(session) => session,
        Err(rejection) => bail!("campaign refused: {rejection:?}"),
    };
    println!("launched {} units from {origin:?}", session.active_units());

    let mut placed = 0_u32;
    let mut returned = 0_u32;
    let mut dropped = 0_u32;
    let mut ticks = 0_u32;
    loop {
        events.clear();
        let report = session.advance(&mut world, &mut actor, &mut AllowAll, &mut events);
        ticks += 1;
        for outcome in &report.resolved {
            match outcome.disposition {
                Disposition::Placed => placed += 1,
                Disposition::Returned => returned += 1,
                Disposition::Dropped => dropped += 1,
            }
        }
        if report.finished {
            break;
        }
        if ticks >= TICK_BUDGET {
            bail!("campaign did not finish within {TICK_BUDGET} ticks");
        }
    }

    println!("finished after {ticks} ticks");
    println!("placed {placed}, returned {returned}, dropped {dropped}");
    if !world.pickups().is_empty() {
        println!("{} pickups left in the field", world.pickups().len());
    }
    print_field(&world, args.width, args.depth);
    Ok(())
}

/// Prints the plane one cell above the soil, one row per z index.
fn print_field(world: &World, width: i32, depth: i32) {
    for z in 0..depth {
        let row: String = (0..width)
            .map(|x| match world.block_at(GridPos::new(x, 1, z)) {
                BlockKind::Empty => '.',
                BlockKind::Sprout => '*',
                BlockKind::Crop => '#',
                BlockKind::Soil | BlockKind::Stone => '=',
            })
            .collect();
        println!("{row}");
    }
}
