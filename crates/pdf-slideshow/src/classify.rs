//! Orientation classification from physical page size

use crate::constants::pt_to_mm;
use crate::types::{Orientation, PageSize};

impl PageSize {
    /// Build a page size from PDF points (72 per inch)
    pub fn from_points(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_mm: pt_to_mm(width_pt),
            height_mm: pt_to_mm(height_pt),
        }
    }

    /// Apply a page rotation in degrees; quarter turns swap the sides
    pub fn rotated(self, degrees: i32) -> Self {
        if degrees.rem_euclid(180) == 90 {
            Self {
                width_mm: self.height_mm,
                height_mm: self.width_mm,
            }
        } else {
            self
        }
    }

    pub fn orientation(self) -> Orientation {
        classify_orientation(self.width_mm, self.height_mm)
    }
}

/// Portrait when strictly taller than wide, landscape otherwise (square included)
pub fn classify_orientation(width_mm: f32, height_mm: f32) -> Orientation {
    if width_mm < height_mm {
        Orientation::Portrait
    } else {
        Orientation::Landscape
    }
}
