use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use room_planner_core::{GridSize, Plan, PlanOutcome, Stage, Tile, TileRole};
use room_planner_system_layout::Planner;
use room_planner_world::{ExitSide, RoomSnapshot};

#[test]
fn deterministic_replay_produces_identical_plans() {
    let first = replay(&scripted_room());
    let second = replay(&scripted_room());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(
        first.fingerprint(),
        second.fingerprint(),
        "fingerprint mismatch: {:#x}",
        first.fingerprint()
    );
    assert_eq!(first.stages.len(), Stage::ORDER.len());

    let placed = first
        .stages
        .iter()
        .map(|snapshot| snapshot.claimed.len())
        .collect::<Vec<_>>();
    assert!(
        placed.windows(2).all(|pair| pair[0] <= pair[1]),
        "stages only ever add tiles: {placed:?}"
    );
}

#[test]
fn replay_is_independent_of_previous_runs() {
    let planner = Planner::default();
    let host = scripted_room();
    let barren = RoomSnapshot::open(GridSize::new(20)).with_spawn("Spawn9", Tile::new(3, 3));
    let warm_up = planner.plan(&barren);
    assert!(warm_up.is_err(), "warm-up room has no controller");

    let reused = planner.plan(&host).expect("room plans");
    let fresh = Planner::default().plan(&host).expect("room plans");
    assert_eq!(reused, fresh);
}

#[derive(Debug, PartialEq, Eq)]
struct StageSnapshot {
    stage: Stage,
    claimed: Vec<Tile>,
    roads: Vec<(Tile, TileRole)>,
    reserved: Vec<Tile>,
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    stages: Vec<StageSnapshot>,
    outcome: PlanOutcome,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for snapshot in &self.stages {
            snapshot.stage.hash(&mut hasher);
            snapshot.claimed.hash(&mut hasher);
            snapshot.roads.hash(&mut hasher);
            snapshot.reserved.hash(&mut hasher);
        }
        plan_fingerprint(&self.outcome.plan).hash(&mut hasher);
        hasher.finish()
    }
}

fn plan_fingerprint(plan: &Plan) -> u64 {
    let mut hasher = DefaultHasher::new();
    plan.tiles_with_roles().hash(&mut hasher);
    plan.anchor_link.hash(&mut hasher);
    hasher.finish()
}

fn replay(host: &RoomSnapshot) -> ReplayOutcome {
    let mut stages = Vec::new();
    let outcome = Planner::default()
        .plan_observed(host, |stage, plan| {
            let roads = plan
                .roads()
                .iter()
                .map(|road| (road.position, TileRole::Road(road.priority)))
                .collect();
            stages.push(StageSnapshot {
                stage,
                claimed: plan.claimed_tiles(),
                roads,
                reserved: plan.reserved().to_vec(),
            });
        })
        .expect("scripted room plans");

    ReplayOutcome { stages, outcome }
}

fn scripted_room() -> RoomSnapshot {
    let rows: Vec<String> = (0..50)
        .map(|y| {
            (0..50)
                .map(|x| {
                    let outcrop = (30..34).contains(&x) && (20..26).contains(&y);
                    let spur = y == 44 && (5..15).contains(&x);
                    if outcrop || spur {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect();

    RoomSnapshot::from_terrain_rows(&rows)
        .expect("terrain is square")
        .with_spawn("Spawn1", Tile::new(22, 27))
        .with_source("source-a", Tile::new(8, 9))
        .with_source("source-b", Tile::new(41, 35))
        .with_controller("controller", Tile::new(18, 40))
        .with_mineral("mineral", Tile::new(36, 8))
        .with_exit(ExitSide::Left, "W2N1")
        .with_exit(ExitSide::Bottom, "W1S1")
}
