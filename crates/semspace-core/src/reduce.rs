//! Embedding reduction to 3D
//!
//! Two interchangeable methods map an N-dimensional embedding to a point on a
//! sphere of fixed radius:
//!
//! - **projection** (default): dot product with each row of a seeded random
//!   projection matrix. Every input dimension contributes to every axis.
//! - **simple** (legacy): mean of three contiguous chunks. Cheap and lossy,
//!   kept for comparison with earlier visualizations.
//!
//! Both share the same normalize-and-scale step. A zero-magnitude result is
//! the origin, never NaN.
//!
//! # Example
//!
//! ```rust
//! use semspace_core::{Method, Reducer};
//!
//! let reducer = Reducer::default();
//! let point = reducer.reduce(&vec![1.0; 3072], Method::Projection).unwrap();
//! assert!((point.magnitude() - 5.0).abs() < 1e-9);
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ReduceConfig;
use crate::error::{ReduceError, Result};
use crate::projection::{ProjectionMatrix, OUTPUT_DIMENSIONS};
use crate::vector::Vec3;

/// Reduction algorithm selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    /// Seeded random projection
    #[default]
    Projection,
    /// Chunked averaging
    Simple,
}

impl Method {
    /// Lenient parse: `"simple"` selects chunked averaging, anything else projection.
    pub fn parse(name: Option<&str>) -> Self {
        match name {
            Some(n) if n.trim().eq_ignore_ascii_case("simple") => Self::Simple,
            _ => Self::Projection,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Projection => "projection",
            Self::Simple => "simple",
        }
    }

    /// Human-readable name reported to clients.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Projection => "Random Projection",
            Self::Simple => "Simple Averaging",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reduce via random projection against `matrix`, scaled to `scale`.
///
/// Reads past the end of `embedding` count as zero; elements beyond the
/// matrix width are ignored.
pub fn reduce_projection(embedding: &[f64], matrix: &ProjectionMatrix, scale: f64) -> Result<Vec3> {
    validate(embedding)?;
    if matrix.rows() != OUTPUT_DIMENSIONS {
        return Err(ReduceError::InvalidShape {
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }

    let rows = matrix.row(0).iter().zip(matrix.row(1)).zip(matrix.row(2));
    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for (i, ((&mx, &my), &mz)) in rows.enumerate() {
        let val = embedding.get(i).copied().unwrap_or(0.0);
        x += val * mx;
        y += val * my;
        z += val * mz;
    }

    normalize_and_scale(x, y, z, scale)
}

/// Reduce by averaging three contiguous chunks of `floor(len / 3)` elements.
///
/// Trailing elements past `3 * chunk` are dropped. Inputs shorter than 3 are rejected.
pub fn reduce_average(embedding: &[f64], scale: f64) -> Result<Vec3> {
    validate(embedding)?;
    let chunk = embedding.len() / 3;
    if chunk == 0 {
        return Err(ReduceError::InvalidInput(format!(
            "simple reduction needs at least 3 elements, got {}",
            embedding.len()
        )));
    }

    let mean = |part: &[f64]| part.iter().sum::<f64>() / chunk as f64;
    let x = mean(&embedding[..chunk]);
    let y = mean(&embedding[chunk..2 * chunk]);
    let z = mean(&embedding[2 * chunk..3 * chunk]);

    normalize_and_scale(x, y, z, scale)
}

/// Alias of [`reduce_average`] under the method's wire name.
pub fn reduce_simple(embedding: &[f64], scale: f64) -> Result<Vec3> {
    reduce_average(embedding, scale)
}

fn validate(embedding: &[f64]) -> Result<()> {
    if embedding.is_empty() {
        return Err(ReduceError::InvalidInput("embedding is empty".to_string()));
    }
    if let Some(i) = embedding.iter().position(|v| !v.is_finite()) {
        return Err(ReduceError::InvalidInput(format!(
            "embedding[{}] is not a finite number",
            i
        )));
    }
    Ok(())
}

/// Unit direction of `(x, y, z)` times `scale`.
///
/// A zero computed magnitude yields the origin, including non-zero components
/// whose squares underflow. A magnitude that overflows for finite components
/// is recovered by rescaling the components first.
fn normalize_and_scale(x: f64, y: f64, z: f64, scale: f64) -> Result<Vec3> {
    let v = Vec3::new(x, y, z);
    if !v.is_finite() {
        return Err(ReduceError::InvalidInput(
            "embedding values overflow during reduction".to_string(),
        ));
    }
    let magnitude = v.magnitude();
    if magnitude == 0.0 {
        return Ok(Vec3::ZERO);
    }
    if magnitude.is_finite() {
        return Ok(Vec3::new(
            x / magnitude * scale,
            y / magnitude * scale,
            z / magnitude * scale,
        ));
    }

    // squares overflowed; bring components near 1 first
    let unit = v / v.max_abs();
    Ok(unit / unit.magnitude() * scale)
}

/// Reducer bound to one projection matrix and one configuration.
///
/// Cheap to clone; the matrix is shared.
#[derive(Debug, Clone)]
pub struct Reducer {
    matrix: Arc<ProjectionMatrix>,
    config: ReduceConfig,
}

impl Reducer {
    /// Build a reducer for `config`, reusing the shared matrix when the seed
    /// and width are the defaults.
    pub fn new(config: ReduceConfig) -> Result<Self> {
        config.validate()?;
        let matrix = if config.uses_shared_matrix() {
            ProjectionMatrix::shared()
        } else {
            Arc::new(ProjectionMatrix::new(config.seed, config.dimensions)?)
        };
        Self::with_matrix(matrix, config)
    }

    /// Build a reducer around an existing matrix. The matrix must have 3 rows.
    pub fn with_matrix(matrix: Arc<ProjectionMatrix>, config: ReduceConfig) -> Result<Self> {
        config.validate()?;
        if matrix.rows() != OUTPUT_DIMENSIONS {
            return Err(ReduceError::InvalidShape {
                rows: matrix.rows(),
                cols: matrix.cols(),
            });
        }
        Ok(Self { matrix, config })
    }

    /// Reduce `embedding` with `method`.
    pub fn reduce(&self, embedding: &[f64], method: Method) -> Result<Vec3> {
        let point = match method {
            Method::Projection => self.reduce_projection(embedding)?,
            Method::Simple => self.reduce_average(embedding)?,
        };
        debug!(%method, dims = embedding.len(), %point, "reduced embedding");
        Ok(point)
    }

    pub fn reduce_projection(&self, embedding: &[f64]) -> Result<Vec3> {
        if embedding.len() != self.matrix.cols() {
            warn!(
                "Expected {} dimensions but got {}",
                self.matrix.cols(),
                embedding.len()
            );
        }
        reduce_projection(embedding, &self.matrix, self.config.projection_scale)
    }

    pub fn reduce_average(&self, embedding: &[f64]) -> Result<Vec3> {
        reduce_average(embedding, self.config.simple_scale)
    }

    pub fn matrix(&self) -> &Arc<ProjectionMatrix> {
        &self.matrix
    }

    pub fn config(&self) -> &ReduceConfig {
        &self.config
    }
}

impl Default for Reducer {
    fn default() -> Self {
        Self {
            matrix: ProjectionMatrix::shared(),
            config: ReduceConfig::default(),
        }
    }
}
