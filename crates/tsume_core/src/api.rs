//! JSON API for front ends.
//!
//! One request carries a unit snapshot and a tagged query; the response mirrors it.
//!
//! ```json
//! { "schema_version": 1, "units": [...], "request": { "type": "CanScore", "unit": {"team":"offense","number":1} } }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::court::Cell;
use crate::defense::{plan_defense_turn, DefenderMove};
use crate::rules::{can_pass_to_teammate, can_score, is_valid_move, open_passing_targets, ShotOutcome};
use crate::scenario::generate_seeded;
use crate::unit::{Unit, UnitId};

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Deserialize)]
pub struct RulesRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub units: Vec<Unit>,
    pub request: RulesRequestType,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum RulesRequestType {
    GenerateScenario { seed: u64 },
    IsValidMove { unit: UnitId, target: Cell },
    CanPassToTeammate { from: UnitId, to: UnitId },
    OpenPassingTargets,
    CanScore { unit: UnitId },
    ApplyDefenseTurn { streak: u32 },
}

#[derive(Debug, Serialize)]
pub struct RulesResponse {
    pub schema_version: u8,
    pub success: bool,
    pub response: Option<RulesResponseType>,
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum RulesResponseType {
    Units { units: Vec<Unit> },
    Verdict { legal: bool },
    Targets { targets: Vec<UnitId> },
    Shot { success: bool, points: u32, kind: Option<String>, reason: Option<String> },
    Defense { units: Vec<Unit>, moves: Vec<DefenderMove> },
}

fn find(units: &[Unit], id: UnitId) -> Result<&Unit, String> {
    units.iter().find(|u| u.id == id).ok_or_else(|| format!("Unknown unit: {}", id))
}

fn evaluate(request: RulesRequest, config: &GameConfig) -> Result<RulesResponseType, String> {
    let units = request.units;
    let court = &config.court;

    let response = match request.request {
        RulesRequestType::GenerateScenario { seed } => {
            RulesResponseType::Units { units: generate_seeded(seed, court).into_units() }
        }
        RulesRequestType::IsValidMove { unit, target } => {
            RulesResponseType::Verdict { legal: is_valid_move(find(&units, unit)?, target, &units, court) }
        }
        RulesRequestType::CanPassToTeammate { from, to } => {
            let (from, to) = (find(&units, from)?, find(&units, to)?);
            RulesResponseType::Verdict { legal: can_pass_to_teammate(from, to, &units) }
        }
        RulesRequestType::OpenPassingTargets => RulesResponseType::Targets { targets: open_passing_targets(&units) },
        RulesRequestType::CanScore { unit } => match can_score(find(&units, unit)?, &units, court) {
            ShotOutcome::Made(kind) => RulesResponseType::Shot {
                success: true,
                points: kind.points(),
                kind: Some(kind.label().to_string()),
                reason: None,
            },
            ShotOutcome::Missed(reason) => RulesResponseType::Shot {
                success: false,
                points: 0,
                kind: None,
                reason: Some(reason.message().to_string()),
            },
        },
        RulesRequestType::ApplyDefenseTurn { streak } => {
            let (roster, moves) = plan_defense_turn(&units, streak, config);
            RulesResponseType::Defense { units: roster.into_units(), moves }
        }
    };
    Ok(response)
}

/// Answer one rules query. `Err` only for malformed input JSON.
pub fn evaluate_json(request_json: &str, config: &GameConfig) -> Result<String, String> {
    let request: RulesRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {}", request.schema_version));
    }

    let response = match evaluate(request, config) {
        Ok(body) => RulesResponse { schema_version: SCHEMA_VERSION, success: true, response: Some(body), error_message: None },
        Err(message) => {
            log::debug!("Rules query rejected: {}", message);
            RulesResponse { schema_version: SCHEMA_VERSION, success: false, response: None, error_message: Some(message) }
        }
    };

    serde_json::to_string(&response).map_err(|e| format!("Failed to serialize response: {}", e))
}
