//! Core type definitions for image records and detector output.
//!
//! Status values are stored as lowercase text in the `image.status` column.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Lifecycle state of an image record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    /// Stored, no detector result attached yet.
    #[default]
    Pending,
    /// A detector result (confidence, optional box) is attached.
    Predicted,
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Predicted => write!(f, "predicted"),
        }
    }
}

impl std::str::FromStr for ImageStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "predicted" => Ok(Self::Predicted),
            _ => Err(format!("Invalid image status: {}", s)),
        }
    }
}

/// Normalized bounding box, every coordinate in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Check that all coordinates are normalized and the box is not inverted.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("xmin", self.xmin),
            ("ymin", self.ymin),
            ("xmax", self.xmax),
            ("ymax", self.ymax),
        ] {
            if !is_unit(value) {
                return Err(Error::invalid_input(format!(
                    "bbox {} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.xmin > self.xmax || self.ymin > self.ymax {
            return Err(Error::invalid_input(format!(
                "bbox is inverted: ({}, {}, {}, {})",
                self.xmin, self.ymin, self.xmax, self.ymax
            )));
        }
        Ok(())
    }
}

/// Detector result attached to a record when it becomes `predicted`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Class confidence in `[0, 1]`.
    pub confidence: f64,
    /// Bounding box, absent when the detector did not compute one.
    pub bbox: Option<BoundingBox>,
}

impl Prediction {
    pub fn new(confidence: f64, bbox: Option<BoundingBox>) -> Self {
        Self { confidence, bbox }
    }

    /// Validate the confidence range and, when present, the box.
    pub fn validate(&self) -> Result<()> {
        if !is_unit(self.confidence) {
            return Err(Error::invalid_input(format!(
                "confidence must be within [0, 1], got {}",
                self.confidence
            )));
        }
        match &self.bbox {
            Some(bbox) => bbox.validate(),
            None => Ok(()),
        }
    }
}

fn is_unit(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}
