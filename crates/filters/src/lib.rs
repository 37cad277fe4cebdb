//! # Filters Crate
//!
//! Declarative constraint model for narrowing catalog discovery queries.
//!
//! ## Main Components
//!
//! - **spec**: The FilterSpec value object (genres, runtime ceiling,
//!   release-year bounds, distribution services)
//! - **query**: Deterministic serialization of a FilterSpec into query
//!   parameters (unconstrained fields are omitted entirely)
//!
//! A FilterSpec is pure data: any combination of fields is valid, including
//! fully unconstrained. Reversed year bounds are not rejected here; the
//! catalog simply returns no results and the session's relaxation path
//! handles it.
//!
//! ## Example Usage
//!
//! ```ignore
//! use filters::FilterSpec;
//!
//! let filter = FilterSpec::default()
//!     .with_genres(vec![28, 12])
//!     .with_max_runtime(120);
//!
//! let params = filter.to_query();
//! assert!(params.iter().any(|(k, _)| k == "with_genres"));
//! ```

pub mod query;
pub mod spec;

// Re-export commonly used types for convenience
pub use spec::FilterSpec;
