//! Cost-model constants - all unit rates in one place
//!
//! Monetary rates are signed negative (they are costs). Carbon quantities are
//! GHG-equivalent units, multiplied by the year's social cost of carbon by the
//! environment, never here.

// Flood damage -> GHG
pub const FLOOD_GHG_INTENSITY: f64 = 445.1;
pub const FLOOD_COST_2007_DEFLATOR: f64 = 0.77;

// Floodwall
pub const FLOODWALL_COST_PER_1_5M: f64 = -1.38e4;
pub const FLOODWALL_REFERENCE_HEIGHT_M: f64 = 1.5;
pub const FLOODWALL_MAINTENANCE: f64 = -100.0;
pub const FLOODWALL_CARBON_COST_PER_M: f64 = 8000.0;
pub const CONSTRUCTION_COST_2007_DEFLATOR: f64 = 0.89;
pub const CONSTRUCTION_GHG_INTENSITY: f64 = 243.0;
pub const MAINTENANCE_GHG_INTENSITY: f64 = 385.0;

// Green space (per meter of slope length)
pub const GREEN_BUILD_COST_PER_M: f64 = -25.0;
pub const GREEN_MAINTENANCE_PER_M: f64 = -2.7;
pub const GREEN_CONSTRUCTION_CARBON_PER_M: f64 = -(1.6 / 1000.0);
pub const GREEN_MAINTENANCE_CARBON_PER_M: f64 = -(0.09 / 1000.0);
pub const GREEN_CARBON_UPTAKE_PER_M: f64 = 0.17 / 1000.0;
/// Damage factor inside the graded green-space band
pub const GREEN_DAMAGE_FACTOR: f64 = 0.80;

// Salt marsh (per meter of width)
pub const MARSH_BUILD_COST_PER_M: f64 = -1000.0;
pub const MARSH_CONSTRUCTION_CARBON_PER_M: f64 = -(1.0 / 1000.0);
pub const MARSH_CARBON_UPTAKE_PER_M: f64 = 0.44 / 1000.0;

// Oyster reef (per meter of reef length)
pub const REEF_BUILD_COST_PER_M: f64 = -400.0;
pub const REEF_MAINTENANCE_PER_M: f64 = -1.5;
pub const REEF_CONSTRUCTION_CARBON_PER_M: f64 = -(0.5 / 1000.0);
/// Damage factor inside the reef's critical band
pub const REEF_DAMAGE_FACTOR: f64 = 0.75;

/// Cost per meter of floodwall height
pub fn floodwall_cost_per_meter() -> f64 {
    FLOODWALL_COST_PER_1_5M / FLOODWALL_REFERENCE_HEIGHT_M
}

/// GHG-equivalent units attributed to a flood loss (negative with the loss)
pub fn flood_carbon(flood_monetary: f64) -> f64 {
    let flood_cost_2007 = (flood_monetary / 1_000_000.0) * FLOOD_COST_2007_DEFLATOR;
    FLOOD_GHG_INTENSITY * flood_cost_2007
}

/// GHG-equivalent units for building a floodwall of `height` meters
///
/// Negated from the published magnitude so it carries the same sign as every
/// other cost field.
pub fn floodwall_construction_carbon(height: f64) -> f64 {
    let cost_2007 = (FLOODWALL_CARBON_COST_PER_M * height) * CONSTRUCTION_COST_2007_DEFLATOR;
    let cost_million = cost_2007 / 1_000_000.0;
    -(cost_million * CONSTRUCTION_GHG_INTENSITY)
}

/// GHG-equivalent units for one year of floodwall upkeep, negated like
/// [`floodwall_construction_carbon`]
pub fn floodwall_maintenance_carbon() -> f64 {
    let cost_2007 = -FLOODWALL_MAINTENANCE * CONSTRUCTION_COST_2007_DEFLATOR;
    let cost_million = cost_2007 / 1_000_000.0;
    -(cost_million * MAINTENANCE_GHG_INTENSITY)
}
