//! semspace Core Engine
//!
//! Deterministic reduction of high-dimensional text embeddings to 3D points
//! for spatial visualization.
//!
//! - [`projection`] - seeded random projection matrix (sine hash + Box-Muller)
//! - [`reduce`] - projection and chunked-average reducers with a shared
//!   normalize-and-scale step
//! - [`path`] - walk/scatter path tracking over reduced vectors
//!
//! Everything here is pure and synchronous. The only shared state is the
//! write-once default matrix returned by [`ProjectionMatrix::shared`].
//!
//! # Example
//!
//! ```rust
//! use semspace_core::{Method, Mode, PathTracker, Reducer, Vec3};
//!
//! let reducer = Reducer::default();
//! let step = reducer.reduce(&vec![0.01; 3072], Method::Projection).unwrap();
//!
//! let mut path = PathTracker::new();
//! let segment = path.record(step, Mode::Walk);
//! assert_eq!(segment.start, Vec3::ZERO);
//! assert_eq!(path.current_point(), step);
//! ```

pub mod config;
pub mod error;
pub mod path;
pub mod projection;
pub mod reduce;
pub mod vector;

// Re-export main types at crate root
pub use config::{ReduceConfig, DEFAULT_FOCUS_LERP, DEFAULT_SCALE, MAX_DIMENSIONS};
pub use error::{ReduceError, Result};
pub use path::{Mode, PathTracker, Segment};
pub use projection::{
    random_normal, seeded_uniform, ProjectionMatrix, DEFAULT_SEED, EMBEDDING_DIMENSIONS,
    OUTPUT_DIMENSIONS,
};
pub use reduce::{reduce_average, reduce_projection, reduce_simple, Method, Reducer};
pub use vector::Vec3;
