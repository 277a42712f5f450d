#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure planning system that lays out a room in a fixed sequence of stages.
//!
//! The [`Planner`] queries a [`RoomHost`] for terrain, entities and paths and
//! fills a [`PlanBuilder`] stage by stage: perimeter walls, the anchor and its
//! core structures, controller and source layouts, mineral docks, the road
//! network, exit roads with their gates, and finally the extension field.
//! Each stage reads only what earlier stages wrote. The run is deterministic
//! for a given host.

mod base;
mod builder;
mod exit_roads;
mod exits;
mod extensions;
mod features;
pub mod geometry;
mod minerals;
pub mod path;
mod roads;

pub use builder::PlanBuilder;
pub use extensions::is_road_eligible;

use room_planner_core::{PlanError, PlanOutcome, PlannerConfig, RoomHost, Stage};

/// Planning system that turns a room snapshot into a finished layout.
#[derive(Clone, Debug, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Creates a planner with the provided tunables.
    #[must_use]
    pub const fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Tunables the planner runs with.
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Runs every stage against the host and returns the finished plan.
    pub fn plan<H: RoomHost>(&self, host: &H) -> Result<PlanOutcome, PlanError> {
        self.plan_observed(host, |_, _| {})
    }

    /// Runs every stage, handing the partial plan to `observer` after each.
    ///
    /// The observer sees stages in [`Stage::ORDER`]. A fatal error ends the
    /// run before the failing stage is observed.
    pub fn plan_observed<H, O>(&self, host: &H, mut observer: O) -> Result<PlanOutcome, PlanError>
    where
        H: RoomHost,
        O: FnMut(Stage, &PlanBuilder),
    {
        let mut builder = PlanBuilder::default();
        for stage in Stage::ORDER {
            if let Err(error) = self.run_stage(stage, host, &mut builder) {
                log::error!("{stage} stage failed: {error}");
                return Err(error);
            }
            log::debug!(
                "{stage} stage done: {} roads, {} walls, {} reserved",
                builder.roads().len(),
                builder.walls().len(),
                builder.reserved().len()
            );
            observer(stage, &builder);
        }

        let outcome = builder.finish()?;
        log::info!(
            "planned room around {}: {} extensions, {} roads, {} issues",
            outcome.plan.anchor,
            outcome.plan.extensions.len(),
            outcome.plan.roads.len(),
            outcome.issues.len()
        );
        Ok(outcome)
    }

    fn run_stage<H: RoomHost>(
        &self,
        stage: Stage,
        host: &H,
        builder: &mut PlanBuilder,
    ) -> Result<(), PlanError> {
        match stage {
            Stage::Exits => exits::plan_exits(host, builder),
            Stage::Base => base::plan_base(host, builder),
            Stage::Controller => features::plan_controller(host, builder),
            Stage::Sources => features::plan_sources(host, builder),
            Stage::Minerals => minerals::plan_minerals(host, builder),
            Stage::Roads => roads::plan_roads(host, builder),
            Stage::ExitRoads => exit_roads::plan_exit_roads(host, builder),
            Stage::Extensions => {
                extensions::plan_extensions(host, builder, self.config.extension_target)
            }
        }
    }
}
