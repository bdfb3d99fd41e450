//! External (JSON) representation of jobs and solutions. All field names
//! are camelCase on the wire.

use cutstock_rs::entities::Placement;
use cutstock_rs::stats::CutStats;
use serde::{Deserialize, Serialize};

use crate::config::GACConfig;

/// A cutting job as submitted by the caller.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtJob {
    pub sheet_width: i64,
    pub sheet_height: i64,
    pub details: Vec<ExtDetail>,
    /// Partial overrides of the optimizer defaults
    #[serde(default)]
    pub algorithm_settings: Option<GACConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtDetail {
    pub width: i64,
    pub height: i64,
}

/// A single placed part in the solution.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtPlacement {
    pub id: usize,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub rotation: bool,
    pub sheet: usize,
    pub original_width: i64,
    pub original_height: i64,
}

impl From<&Placement> for ExtPlacement {
    fn from(p: &Placement) -> Self {
        ExtPlacement {
            id: p.id,
            x: p.x,
            y: p.y,
            width: p.width,
            height: p.height,
            rotation: p.rotation,
            sheet: p.sheet,
            original_width: p.original_width,
            original_height: p.original_height,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtStats {
    pub sheets_count: usize,
    pub total_area: i64,
    pub used_area: i64,
    pub waste_area: i64,
    pub efficiency: f64,
    pub usable_scrap: i64,
    /// Wall-clock duration of the whole run in seconds, rounded to 2 decimals
    pub execution_time: f64,
}

impl ExtStats {
    pub fn new(stats: &CutStats, execution_time: f64) -> Self {
        ExtStats {
            sheets_count: stats.sheets_count,
            total_area: stats.total_area,
            used_area: stats.used_area,
            waste_area: stats.waste_area,
            efficiency: stats.efficiency,
            usable_scrap: stats.usable_scrap,
            execution_time: (execution_time * 100.0).round() / 100.0,
        }
    }
}

/// Successful solution envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtSolution {
    pub success: bool,
    pub data: Vec<ExtPlacement>,
    pub stats: ExtStats,
}

impl ExtSolution {
    pub fn new(placements: &[Placement], stats: ExtStats) -> Self {
        ExtSolution {
            success: true,
            data: placements.iter().map(ExtPlacement::from).collect(),
            stats,
        }
    }
}

/// Failure envelope with a human-readable reason.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtFailure {
    pub success: bool,
    pub message: String,
}

impl ExtFailure {
    pub fn new(message: String) -> Self {
        ExtFailure {
            success: false,
            message,
        }
    }
}
