//! Flooded cross-section of a uniformly sloped floodplain.
//!
//! Unobstructed flooding to depth `x` covers the right triangle `0.5 * x² / s`.
//! Protection elements occupy height bands of that profile and change how the
//! area grows while the water is inside them:
//!
//! - a wall holds the shoreline at its base, so area grows linearly with
//!   `base / s` per meter of rise until the wall is overtopped
//! - an attenuating band (green space, reef) floods like open ground but the
//!   incremental area is weighted by a damage factor
//!
//! Bands are integrated in ascending elevation order. Each one contributes only
//! the area between its own base and `min(top, depth)`, and the open stretches
//! between bands contribute the plain triangle increment, so the result is
//! continuous and non-decreasing in depth.

use crate::core::error::{Result, TidewaterError};
use crate::core::types::Band;

/// Area of unobstructed flooding to depth `depth` on slope `slope`
pub fn unobstructed_area(depth: f64, slope: f64) -> f64 {
    if depth <= 0.0 {
        return 0.0;
    }
    0.5 * depth * depth / slope
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementKind {
    Wall,
    Attenuating { factor: f64 },
}

/// One protection element occupying an absolute elevation band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub band: Band,
    pub kind: ElementKind,
}

impl Element {
    pub fn wall(band: Band) -> Self {
        Self {
            band,
            kind: ElementKind::Wall,
        }
    }

    pub fn attenuating(band: Band, factor: f64) -> Self {
        Self {
            band,
            kind: ElementKind::Attenuating { factor },
        }
    }
}

/// A floodplain profile with a fixed datum (seawall crest, or 0 when there is
/// no seawall) and an ordered set of active protection elements.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodProfile {
    slope: f64,
    datum: f64,
    elements: Vec<Element>,
}

impl FloodProfile {
    pub fn new(slope: f64, datum: f64) -> Self {
        Self {
            slope,
            datum,
            elements: Vec::new(),
        }
    }

    /// Add an element. Elements must be pushed in ascending, non-overlapping
    /// order and lie above the datum.
    pub fn with(mut self, element: Element) -> Result<Self> {
        let band = element.band;
        if !band.is_ordered() {
            return Err(TidewaterError::InvalidConfig(format!(
                "band [{}, {}] must have base < top",
                band.base, band.top
            )));
        }
        if band.base < self.datum {
            return Err(TidewaterError::InvalidConfig(format!(
                "band base {} lies below the profile datum {}",
                band.base, self.datum
            )));
        }
        if let Some(prev) = self.elements.last() {
            if band.base < prev.band.top {
                return Err(TidewaterError::InvalidConfig(format!(
                    "band [{}, {}] overlaps the band below it [{}, {}]",
                    band.base, band.top, prev.band.base, prev.band.top
                )));
            }
        }
        if let ElementKind::Attenuating { factor } = element.kind {
            if !(0.0..=1.0).contains(&factor) {
                return Err(TidewaterError::InvalidConfig(format!(
                    "damage factor {} must lie in [0, 1]",
                    factor
                )));
            }
        }
        self.elements.push(element);
        Ok(self)
    }

    /// Add an element only when `active`
    pub fn with_if(self, active: bool, element: Element) -> Result<Self> {
        if active {
            self.with(element)
        } else {
            Ok(self)
        }
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn datum(&self) -> f64 {
        self.datum
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Flooded cross-sectional area for absolute water height `height`
    pub fn area(&self, height: f64) -> f64 {
        let depth = height - self.datum;
        if depth <= 0.0 {
            return 0.0;
        }

        let tri = |x: f64| unobstructed_area(x, self.slope);
        let mut area = 0.0;
        let mut cursor = 0.0;

        for element in &self.elements {
            let lo = element.band.base - self.datum;
            let hi = element.band.top - self.datum;

            // Open ground below this element
            let open_top = lo.min(depth);
            if open_top > cursor {
                area += tri(open_top) - tri(cursor);
            }
            if depth <= lo {
                return area;
            }

            let seg_top = hi.min(depth);
            area += match element.kind {
                ElementKind::Wall => (seg_top - lo) * lo / self.slope,
                ElementKind::Attenuating { factor } => factor * (tri(seg_top) - tri(lo)),
            };
            cursor = hi;
            if depth <= hi {
                return area;
            }
        }

        area + tri(depth) - tri(cursor)
    }
}
