//! Tracker configuration
//!
//! A single [`TrackerConfig`] value is passed to the matcher and tracker
//! constructors. Mode names are parsed (and validated) when the configuration
//! is built, so an unknown modality or solver fails before any frame is read.

use crate::error::{Result, TrackError};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which similarity drives the cost matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Modality {
    /// Sum of per-keypoint distances
    Joints,
    /// `1 - IoU` of the boxes
    BoundingBoxesIou,
    /// Distance between box centers
    #[default]
    BoundingBoxesDistance,
}

/// Assignment algorithm used per frame pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SolverMode {
    /// Optimal Kuhn-Munkres assignment
    Exact,
    /// Cheapest-first greedy approximation
    #[default]
    Greedy,
}

/// Post-assignment veto applied to each proposed pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum RefinementMode {
    #[default]
    Off,
    Iou,
    Distance,
}

impl FromStr for Modality {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "joints" => Ok(Self::Joints),
            "iou" | "bounding_boxes_iou" => Ok(Self::BoundingBoxesIou),
            "distance" | "bounding_boxes_distance" => Ok(Self::BoundingBoxesDistance),
            _ => Err(TrackError::UnrecognizedModality(s.to_string())),
        }
    }
}

impl FromStr for SolverMode {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" | "hungarian" | "munkres" => Ok(Self::Exact),
            "greedy" => Ok(Self::Greedy),
            _ => Err(TrackError::UnrecognizedSolver(s.to_string())),
        }
    }
}

impl FromStr for RefinementMode {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "iou" => Ok(Self::Iou),
            "distance" => Ok(Self::Distance),
            _ => Err(TrackError::UnrecognizedRefinement(s.to_string())),
        }
    }
}

macro_rules! impl_try_from_string {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = TrackError;

                fn try_from(value: String) -> Result<Self> {
                    value.parse()
                }
            }
        )*
    };
}

impl_try_from_string!(Modality, SolverMode, RefinementMode);

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Joints => write!(f, "joints"),
            Self::BoundingBoxesIou => write!(f, "iou"),
            Self::BoundingBoxesDistance => write!(f, "distance"),
        }
    }
}

impl fmt::Display for SolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Greedy => write!(f, "greedy"),
        }
    }
}

impl fmt::Display for RefinementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Iou => write!(f, "iou"),
            Self::Distance => write!(f, "distance"),
        }
    }
}

/// Configuration for identity tracking
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Similarity used to build the cost matrix
    pub modality: Modality,
    /// Identities seen in fewer frames are dropped from the output
    pub min_trajectory_length: u32,
    /// Exact or greedy assignment
    pub solver: SolverMode,
    /// Secondary check applied to every proposed pair
    pub refinement: RefinementMode,
    /// Frames an unmatched identity stays available for re-identification
    pub memory_ttl: u32,
    /// Cost penalty per skipped frame, as a fraction of the base cost
    pub memory_decay: f64,
    /// Fill skipped frames between matched detections
    pub interpolation: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            modality: Modality::BoundingBoxesDistance,
            min_trajectory_length: 7,
            solver: SolverMode::Greedy,
            refinement: RefinementMode::Off,
            memory_ttl: 10,
            memory_decay: 0.5,
            interpolation: true,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.memory_decay.is_finite() || self.memory_decay < 0.0 {
            return Err(TrackError::config(format!(
                "memory_decay must be a non-negative finite number, got {}",
                self.memory_decay
            )));
        }
        Ok(())
    }
}
