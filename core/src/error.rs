//! Typed failures and non-fatal findings of a planning run.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{FeatureId, Tile};

/// Planning stages in the order the orchestrator runs them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// Defensive wall ring along every exit.
    Exits,
    /// Anchor tile and its surrounding ring of structures.
    Base,
    /// Controller docking and link tiles.
    Controller,
    /// Docking and link tiles for every energy source.
    Sources,
    /// Docking tiles for every mineral deposit.
    Minerals,
    /// Roads between the anchor, the controller and the sources.
    Roads,
    /// Roads from the anchor through the perimeter to each exit.
    ExitRoads,
    /// Extension structures and their access roads.
    Extensions,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ORDER: [Stage; 8] = [
        Stage::Exits,
        Stage::Base,
        Stage::Controller,
        Stage::Sources,
        Stage::Minerals,
        Stage::Roads,
        Stage::ExitRoads,
        Stage::Extensions,
    ];

    /// Short lowercase name used in logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exits => "exits",
            Self::Base => "base",
            Self::Controller => "controller",
            Self::Sources => "sources",
            Self::Minerals => "minerals",
            Self::Roads => "roads",
            Self::ExitRoads => "exit-roads",
            Self::Extensions => "extensions",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fatal reasons a planning run stops before completing.
///
/// Each is raised before the failing stage mutates the plan.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The room has no spawn to anchor the base on.
    #[error("room has no spawn to anchor the base on")]
    MissingAnchor,
    /// The tile north of the spawn cannot hold the anchor.
    #[error("anchor tile north of the spawn at {spawn} is off-grid or a wall")]
    AnchorBlocked {
        /// Position of the spawn the anchor is derived from.
        spawn: Tile,
    },
    /// None of the hub slots around the anchor can hold the anchor link.
    #[error("no hub slot around the anchor at {anchor} can hold a link")]
    AnchorLinkBlocked {
        /// Anchor whose ring was inspected.
        anchor: Tile,
    },
    /// The room has no controller.
    #[error("room has no controller")]
    MissingController,
    /// The room has no energy sources.
    #[error("room has no energy sources")]
    NoSources,
    /// No transport tile around the feature is free and reachable from the anchor link.
    #[error("no reachable link site around {feature}")]
    NoLinkSite {
        /// Feature that could not be connected.
        feature: FeatureId,
    },
    /// No walkable tile touches the feature.
    #[error("no docking tile around {feature}")]
    NoDockingSite {
        /// Feature that cannot be worked.
        feature: FeatureId,
    },
    /// The plan lacks the output of an earlier stage.
    #[error("plan is missing the output of the {missing} stage")]
    Incomplete {
        /// Earlier stage whose output was absent.
        missing: Stage,
    },
}

/// Recoverable findings recorded next to a finished plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanIssue {
    /// A path query found no route, so the stage skipped that contribution.
    Unreachable {
        /// Stage that issued the query.
        stage: Stage,
        /// Start of the query.
        from: Tile,
        /// Destination of the query.
        to: Tile,
    },
    /// The extension field ran out of rings before reaching its target.
    BoundExceeded {
        /// Extensions placed before the loop stopped.
        placed: usize,
        /// Extensions the configuration asked for.
        target: usize,
        /// Rings processed before the loop stopped.
        rings: usize,
    },
}

impl fmt::Display for PlanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable { stage, from, to } => {
                write!(f, "{stage}: no path from {from} to {to}")
            }
            Self::BoundExceeded {
                placed,
                target,
                rings,
            } => write!(
                f,
                "extensions: placed {placed} of {target} after {rings} rings"
            ),
        }
    }
}
