#![deny(warnings)]

//! Core domain records for the factory simulation.
//!
//! This crate defines the serializable types shared by every level
//! pipeline with validation helpers to guarantee basic invariants.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a participating player.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the classroom session a submission belongs to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// The five production-theory levels, in curriculum order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Level 1: single-input production with diminishing returns.
    SingleInput,
    /// Level 2: Cobb-Douglas input mix and the MRTS condition.
    InputMix,
    /// Level 3: returns-to-scale classification.
    ReturnsToScale,
    /// Level 4: short-run cost analysis and the shutdown decision.
    Shutdown,
    /// Level 5: long-run plant-size choice.
    PlantChoice,
}

impl Level {
    /// All levels in curriculum order.
    pub const ALL: [Level; 5] = [
        Level::SingleInput,
        Level::InputMix,
        Level::ReturnsToScale,
        Level::Shutdown,
        Level::PlantChoice,
    ];

    /// Map the 1-based level number used by submissions.
    pub fn from_number(n: u8) -> Option<Level> {
        match n {
            1 => Some(Level::SingleInput),
            2 => Some(Level::InputMix),
            3 => Some(Level::ReturnsToScale),
            4 => Some(Level::Shutdown),
            5 => Some(Level::PlantChoice),
            _ => None,
        }
    }

    /// The 1-based level number.
    pub fn number(self) -> u8 {
        match self {
            Level::SingleInput => 1,
            Level::InputMix => 2,
            Level::ReturnsToScale => 3,
            Level::Shutdown => 4,
            Level::PlantChoice => 5,
        }
    }
}

/// Fixed plant configurations available in the long-run level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlantSize {
    Small,
    Medium,
    Large,
}

/// Capital stock and committed fixed cost of a plant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantSpec {
    /// Capital units the plant is built with.
    pub capital: f64,
    /// Fixed cost committed by building the plant.
    pub fixed_cost: f64,
}

impl PlantSize {
    /// Plants in ascending size order (the tie-break order for plant choice).
    pub const ALL: [PlantSize; 3] = [PlantSize::Small, PlantSize::Medium, PlantSize::Large];

    /// The fixed `(capital, fixed_cost)` pair the plant commits to.
    pub fn spec(self) -> PlantSpec {
        match self {
            PlantSize::Small => PlantSpec {
                capital: 10.0,
                fixed_cost: 1_000_000.0,
            },
            PlantSize::Medium => PlantSpec {
                capital: 25.0,
                fixed_cost: 2_500_000.0,
            },
            PlantSize::Large => PlantSpec {
                capital: 50.0,
                fixed_cost: 5_000_000.0,
            },
        }
    }

    /// Parse a submission code, either the one-letter form or the full name.
    pub fn from_code(code: &str) -> Option<PlantSize> {
        match code.trim().to_ascii_uppercase().as_str() {
            "S" | "SMALL" => Some(PlantSize::Small),
            "M" | "MEDIUM" => Some(PlantSize::Medium),
            "L" | "LARGE" => Some(PlantSize::Large),
            _ => None,
        }
    }
}

/// Cobb-Douglas technology constants for `Q = A·L^α·K^β`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CobbDouglasTech {
    /// Total factor productivity `A`.
    pub a: f64,
    /// Labor output elasticity `α`.
    pub alpha: f64,
    /// Capital output elasticity `β`.
    pub beta: f64,
}

/// Per-level market configuration supplied by the calling layer.
///
/// Which optional fields must be present depends on the level; see
/// [`validate_params`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    /// Output price per unit.
    pub output_price: f64,
    /// Wage per worker.
    pub wage_rate: f64,
    /// Rental rate per unit of capital (levels 2-4).
    #[serde(default)]
    pub rental_rate: Option<f64>,
    /// Exogenously fixed capital stock (levels 1 and 4).
    #[serde(default)]
    pub fixed_capital: Option<f64>,
    /// Cobb-Douglas technology (levels 2-5).
    #[serde(default)]
    pub technology: Option<CobbDouglasTech>,
}

/// A student's chosen inputs for one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Workers hired. Required in every level.
    pub labor: f64,
    /// Capital rented (levels 2-3).
    #[serde(default)]
    pub capital: Option<f64>,
    /// Plant built (level 5).
    #[serde(default)]
    pub plant_size: Option<PlantSize>,
}

/// One decision submission: who, which session, which level, what inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub player: PlayerId,
    pub session: SessionId,
    pub level: Level,
    pub decision: Decision,
}

/// Returns-to-scale classification of a Cobb-Douglas technology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScaleType {
    Irs,
    Crs,
    Drs,
}

impl ScaleType {
    /// Classroom interpretation shown alongside the classification.
    pub fn interpretation(self) -> &'static str {
        match self {
            ScaleType::Irs => "Increasing Returns to Scale (Economies of Scale)",
            ScaleType::Crs => "Constant Returns to Scale",
            ScaleType::Drs => "Decreasing Returns to Scale (Diseconomies of Scale)",
        }
    }
}

/// Textbook price-vs-AVC shutdown rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShutdownRule {
    Operate,
    Shutdown,
}

/// Loss-minimizing short-run decision, which can disagree with the
/// price-vs-AVC rule when the operating loss stays below the sunk fixed cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BestDecision {
    Operate,
    OperateSmallerLoss,
    Shutdown,
}

impl BestDecision {
    pub fn describe(self) -> &'static str {
        match self {
            BestDecision::Operate => "Continue Operating",
            BestDecision::OperateSmallerLoss => "Continue Operating (smaller loss)",
            BestDecision::Shutdown => "Shutdown",
        }
    }
}

/// Output bucket used to recommend a plant size in the long-run level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputRange {
    Under150,
    Mid150To400,
    Over400,
}

impl OutputRange {
    /// Bucket an output quantity.
    pub fn classify(output: f64) -> OutputRange {
        if output < 150.0 {
            OutputRange::Under150
        } else if output <= 400.0 {
            OutputRange::Mid150To400
        } else {
            OutputRange::Over400
        }
    }

    /// The bucket a plant is sized for.
    pub fn for_plant(plant: PlantSize) -> OutputRange {
        match plant {
            PlantSize::Small => OutputRange::Under150,
            PlantSize::Medium => OutputRange::Mid150To400,
            PlantSize::Large => OutputRange::Over400,
        }
    }

    /// Plant size recommended for this bucket.
    pub fn recommended_plant(self) -> PlantSize {
        match self {
            OutputRange::Under150 => PlantSize::Small,
            OutputRange::Mid150To400 => PlantSize::Medium,
            OutputRange::Over400 => PlantSize::Large,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputRange::Under150 => "< 150 units",
            OutputRange::Mid150To400 => "150-400 units",
            OutputRange::Over400 => "> 400 units",
        }
    }
}

/// Whether the chosen plant attains the long-run average cost envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleStatus {
    AtMes,
    NotAtMes,
}

impl ScaleStatus {
    pub fn label(self) -> &'static str {
        match self {
            ScaleStatus::AtMes => "At MES (Efficient Scale)",
            ScaleStatus::NotAtMes => "Not at Minimum Efficient Scale (MES)",
        }
    }
}

/// Level-1 verdict against the value-of-marginal-product rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaborVerdict {
    /// Profit-maximizing labor solving `P·MPL = w`.
    pub optimal_labor: f64,
    /// Absolute tolerance, in worker units.
    pub tolerance: f64,
    pub is_optimal: bool,
    /// 100 at the optimum, decaying 2 points per worker of deviation.
    pub efficiency_score: f64,
    /// First-order condition the benchmark solves.
    pub condition: String,
    pub feedback: String,
}

/// Level-2 verdict against the MRTS = input-price-ratio condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MrtsVerdict {
    /// Cost-minimizing MRTS, `w/r`.
    pub optimal_mrts: f64,
    pub tolerance: f64,
    pub is_optimal: bool,
}

/// Level-5 verdict against the SRAC-minimizing plant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantVerdict {
    /// Plant attaining the long-run average cost at the submitted labor.
    pub optimal_plant: PlantSize,
    pub is_optimal: bool,
}

/// Level-1 detail payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SingleInputDetails {
    pub fixed_capital: f64,
    pub marginal_product_labor: f64,
    pub average_product_labor: f64,
    pub average_variable_cost: f64,
    pub marginal_cost: f64,
    pub verdict: LaborVerdict,
}

/// Level-2 detail payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputMixDetails {
    pub capital: f64,
    pub technology: CobbDouglasTech,
    pub marginal_product_labor: f64,
    pub marginal_product_capital: f64,
    pub mrts: f64,
    /// Capital per worker, `K/L`.
    pub input_ratio: f64,
    pub labor_cost: f64,
    pub capital_cost: f64,
    pub average_total_cost: f64,
    /// Slope of the isocost line, `-w/r`.
    pub isocost_slope: f64,
    pub verdict: MrtsVerdict,
}

/// Level-3 detail payload. Purely descriptive; there is no pass/fail here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleDetails {
    pub capital: f64,
    pub technology: CobbDouglasTech,
    pub marginal_product_labor: f64,
    pub marginal_product_capital: f64,
    pub mrts: f64,
    pub input_ratio: f64,
    pub labor_cost: f64,
    pub capital_cost: f64,
    pub average_total_cost: f64,
    /// Degree of homogeneity, `α + β`.
    pub returns_to_scale: f64,
    pub scale_type: ScaleType,
    pub interpretation: String,
}

/// Level-4 detail payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShutdownDetails {
    pub fixed_capital: f64,
    pub technology: CobbDouglasTech,
    pub marginal_product_labor: f64,
    pub average_product_labor: f64,
    pub total_fixed_cost: f64,
    pub total_variable_cost: f64,
    pub average_fixed_cost: f64,
    pub average_variable_cost: f64,
    pub average_total_cost: f64,
    pub marginal_cost: f64,
    pub shutdown_rule: ShutdownRule,
    pub loss_if_operate: f64,
    /// The sunk fixed cost, paid whether or not the plant runs.
    pub loss_if_shutdown: f64,
    pub best_decision: BestDecision,
}

/// Level-5 detail payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantChoiceDetails {
    pub plant: PlantSize,
    pub capital: f64,
    pub technology: CobbDouglasTech,
    pub total_fixed_cost: f64,
    pub total_variable_cost: f64,
    /// Short-run average cost of the chosen plant.
    pub srac: f64,
    pub srac_small: f64,
    pub srac_medium: f64,
    pub srac_large: f64,
    /// Envelope value: the cheapest of the three SRACs at this labor.
    pub lrac: f64,
    pub cost_diff: f64,
    pub output_range: OutputRange,
    pub recommended_plant: PlantSize,
    pub mes_range: OutputRange,
    pub scale_status: ScaleStatus,
    /// Profit had the optimal plant been built at the same labor.
    pub optimal_profit: f64,
    pub profit_lost: f64,
    pub verdict: PlantVerdict,
}

/// Level-specific portion of a result record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LevelDetails {
    SingleInput(SingleInputDetails),
    InputMix(InputMixDetails),
    ReturnsToScale(ScaleDetails),
    Shutdown(ShutdownDetails),
    PlantChoice(PlantChoiceDetails),
}

/// The computed outcome of one decision under one set of market parameters.
///
/// Append-only history: the surrounding store keeps at most one of these
/// per (player, level).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub player: PlayerId,
    pub session: SessionId,
    pub level: Level,
    /// Workers hired.
    pub labor: f64,
    /// Units produced.
    pub output: f64,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub profit: f64,
    pub details: LevelDetails,
}

impl LevelResult {
    /// The optimality flag of the embedded verdict, if the level has one.
    pub fn is_optimal(&self) -> Option<bool> {
        match &self.details {
            LevelDetails::SingleInput(d) => Some(d.verdict.is_optimal),
            LevelDetails::InputMix(d) => Some(d.verdict.is_optimal),
            LevelDetails::ReturnsToScale(_) => None,
            LevelDetails::Shutdown(_) => None,
            LevelDetails::PlantChoice(d) => Some(d.verdict.is_optimal),
        }
    }
}

/// Validation errors for submission and parameter shapes.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A level-required field is absent.
    #[error("level {0} requires field `{1}`")]
    MissingField(u8, &'static str),
    /// NaN or infinity where a finite number is required.
    #[error("field `{0}` must be a finite number")]
    NonFiniteField(&'static str),
    /// Negative value where a non-negative one is required.
    #[error("field `{0}` must not be negative")]
    NegativeField(&'static str),
    /// Zero or negative value where positivity is required.
    #[error("field `{0}` must be strictly positive")]
    NonPositiveField(&'static str),
}

fn require_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteField(field))
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveField(field))
    }
}

/// Validate the structural shape of a decision for its level.
///
/// Zero labor is structurally valid here; the production model rejects it
/// as a domain violation when the math is evaluated.
pub fn validate_decision(level: Level, decision: &Decision) -> Result<(), ValidationError> {
    require_finite("labor", decision.labor)?;
    if decision.labor < 0.0 {
        return Err(ValidationError::NegativeField("labor"));
    }
    match level {
        Level::InputMix | Level::ReturnsToScale => {
            let capital = decision
                .capital
                .ok_or(ValidationError::MissingField(level.number(), "capital"))?;
            require_finite("capital", capital)?;
            if capital < 0.0 {
                return Err(ValidationError::NegativeField("capital"));
            }
        }
        Level::PlantChoice => {
            if decision.plant_size.is_none() {
                return Err(ValidationError::MissingField(level.number(), "plant_size"));
            }
        }
        Level::SingleInput | Level::Shutdown => {}
    }
    Ok(())
}

/// Validate that market parameters carry what the level needs.
pub fn validate_params(level: Level, params: &MarketParams) -> Result<(), ValidationError> {
    require_positive("output_price", params.output_price)?;
    require_positive("wage_rate", params.wage_rate)?;
    let n = level.number();
    match level {
        Level::SingleInput => {
            let k = params
                .fixed_capital
                .ok_or(ValidationError::MissingField(n, "fixed_capital"))?;
            require_positive("fixed_capital", k)?;
        }
        Level::InputMix | Level::ReturnsToScale => {
            let r = params
                .rental_rate
                .ok_or(ValidationError::MissingField(n, "rental_rate"))?;
            require_positive("rental_rate", r)?;
            if params.technology.is_none() {
                return Err(ValidationError::MissingField(n, "technology"));
            }
        }
        Level::Shutdown => {
            let r = params
                .rental_rate
                .ok_or(ValidationError::MissingField(n, "rental_rate"))?;
            require_positive("rental_rate", r)?;
            let k = params
                .fixed_capital
                .ok_or(ValidationError::MissingField(n, "fixed_capital"))?;
            require_positive("fixed_capital", k)?;
            if params.technology.is_none() {
                return Err(ValidationError::MissingField(n, "technology"));
            }
        }
        Level::PlantChoice => {
            if params.technology.is_none() {
                return Err(ValidationError::MissingField(n, "technology"));
            }
        }
    }
    Ok(())
}
