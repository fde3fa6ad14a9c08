//! Geometric flood-damage model
//!
//! Converts a water height and an active protection configuration into a
//! flooded cross-sectional area.

pub mod attenuation;
pub mod profile;

pub use attenuation::{attenuated_height, height_reduction, wave_attenuation};
pub use profile::{unobstructed_area, Element, ElementKind, FloodProfile};
