//! Seeded projection matrix
//!
//! Builds a fixed matrix of approximately standard-normal values used as
//! random projection directions. Values come from a sine-hash uniform
//! generator fed through the Box-Muller transform, so the same seed always
//! yields the same matrix on platforms with IEEE-754 `f64` semantics.
//!
//! Cells are filled row-major. Each cell consumes two consecutive seeds, so
//! the seed counter advances by 2 per cell.

use std::f64::consts::PI;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::error::{ReduceError, Result};

/// Seed of the process-wide matrix.
pub const DEFAULT_SEED: u64 = 42;

/// Embedding width of `text-embedding-3-large`.
pub const EMBEDDING_DIMENSIONS: usize = 3072;

/// Number of rows (output axes).
pub const OUTPUT_DIMENSIONS: usize = 3;

/// Uniform value in [0, 1) derived from `seed`.
///
/// `frac(sin(seed) * 10000)`. Reproducible, not statistically strong.
pub fn seeded_uniform(seed: u64) -> f64 {
    let x = (seed as f64).sin() * 10000.0;
    x - x.floor()
}

/// One standard-normal sample from the uniform pair at `seed` and `seed + 1`.
pub fn random_normal(seed: u64) -> f64 {
    let mut u = 1.0 - seeded_uniform(seed);
    let v = 1.0 - seeded_uniform(seed.wrapping_add(1));

    // frac() of a tiny negative product rounds up to 1.0, which would make u zero
    if u <= 0.0 {
        u = f64::MIN_POSITIVE;
    }

    (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
}

/// Immutable row-major matrix of projection directions.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionMatrix {
    seed: u64,
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ProjectionMatrix {
    /// Generate a `rows` x `cols` matrix starting the seed counter at `seed`.
    pub fn generate(seed: u64, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || rows.checked_mul(cols).is_none() {
            return Err(ReduceError::InvalidShape { rows, cols });
        }
        Ok(Self::build(seed, rows, cols))
    }

    /// Generate a 3-row matrix for embeddings of width `cols`.
    pub fn new(seed: u64, cols: usize) -> Result<Self> {
        Self::generate(seed, OUTPUT_DIMENSIONS, cols)
    }

    /// The process-wide 3 x 3072 matrix with seed 42.
    ///
    /// Built on first use; every caller afterwards shares the same instance.
    pub fn shared() -> Arc<ProjectionMatrix> {
        static SHARED: OnceLock<Arc<ProjectionMatrix>> = OnceLock::new();
        SHARED
            .get_or_init(|| {
                Arc::new(Self::build(
                    DEFAULT_SEED,
                    OUTPUT_DIMENSIONS,
                    EMBEDDING_DIMENSIONS,
                ))
            })
            .clone()
    }

    fn build(seed: u64, rows: usize, cols: usize) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        let mut counter = seed;
        for _ in 0..rows {
            for _ in 0..cols {
                data.push(random_normal(counter));
                counter = counter.wrapping_add(2);
            }
        }

        debug!(seed, rows, cols, "generated projection matrix");

        Self {
            seed,
            rows,
            cols,
            data,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row `index` as a slice. Panics if `index >= rows`.
    pub fn row(&self, index: usize) -> &[f64] {
        let start = index * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// True when every cell is a finite number.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}
