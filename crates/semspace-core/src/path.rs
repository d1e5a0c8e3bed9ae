//! Walk and scatter path tracking
//!
//! Turns independently reduced vectors into a trajectory. In walk mode each
//! vector is chained head-to-tail from the previous end point; in scatter mode
//! every vector is a ray from the origin and the path is left untouched.
//!
//! The path always starts with the origin and only ever grows.

use serde::Serialize;
use std::str::FromStr;

use crate::error::ReduceError;
use crate::vector::Vec3;

/// How a recorded vector is placed in space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Chain from the current point
    #[default]
    Walk,
    /// Anchor at the origin
    Scatter,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Scatter => "scatter",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ReduceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walk" => Ok(Self::Walk),
            "scatter" => Ok(Self::Scatter),
            other => Err(ReduceError::InvalidInput(format!(
                "unknown mode '{}', expected walk or scatter",
                other
            ))),
        }
    }
}

/// A placed vector: drawn from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    /// The displacement this segment covers.
    pub fn direction(&self) -> Vec3 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.direction().magnitude()
    }
}

/// Session path state.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTracker {
    current_point: Vec3,
    path_points: Vec<Vec3>,
}

impl PathTracker {
    /// A fresh path at the origin.
    pub fn new() -> Self {
        Self {
            current_point: Vec3::ZERO,
            path_points: vec![Vec3::ZERO],
        }
    }

    /// Place `vector` according to `mode`.
    ///
    /// Only walk mode mutates the tracker. Callers are expected to pass
    /// finite vectors, which every successful reduction guarantees.
    pub fn record(&mut self, vector: Vec3, mode: Mode) -> Segment {
        match mode {
            Mode::Scatter => Segment {
                start: Vec3::ZERO,
                end: vector,
            },
            Mode::Walk => {
                let start = self.current_point;
                let end = start + vector;
                self.path_points.push(end);
                self.current_point = end;
                Segment { start, end }
            }
        }
    }

    /// Arithmetic mean of every point on the path.
    pub fn centroid(&self) -> Vec3 {
        let mut sum = Vec3::ZERO;
        for p in &self.path_points {
            sum += *p;
        }
        sum / self.path_points.len() as f64
    }

    /// Where a viewer should look after a record.
    ///
    /// Scatter mode looks at the origin. Walk mode eases `current_target`
    /// toward the centroid by `factor`.
    pub fn focus_target(&self, mode: Mode, current_target: Vec3, factor: f64) -> Vec3 {
        match mode {
            Mode::Scatter => Vec3::ZERO,
            Mode::Walk => current_target.lerp(self.centroid(), factor),
        }
    }

    pub fn current_point(&self) -> Vec3 {
        self.current_point
    }

    pub fn path_points(&self) -> &[Vec3] {
        &self.path_points
    }

    /// Number of walk-mode records so far.
    pub fn steps(&self) -> usize {
        self.path_points.len() - 1
    }

    /// Total length of the walked path.
    pub fn total_distance(&self) -> f64 {
        self.path_points
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }
}

impl Default for PathTracker {
    fn default() -> Self {
        Self::new()
    }
}
