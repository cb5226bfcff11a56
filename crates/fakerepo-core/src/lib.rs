//! fakerepo-core library.
//!
//! Generates the package graph of a fake monorepo: packages spread over
//! dependency levels, with random but seed-reproducible edges that only point
//! to lower levels.
//!
//! ```
//! use fakerepo_core::{GenerationRequest, generate};
//!
//! let set = generate(&GenerationRequest::new(8, 2, "abc")).expect("valid request");
//! assert_eq!(set.len(), 8);
//! assert_eq!(set.level_sizes(), vec![6, 2]);
//! ```
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums in [`error`]; no panics on bad input.
//! - **Logging**: Use `tracing` macros (`info!`, `debug!`, `trace!`).

pub mod build_time;
pub mod deps;
pub mod error;
pub mod levels;
pub mod naming;
pub mod package;
pub mod rng;
pub mod tree;

pub use build_time::{BuildTime, sample_build_millis};
pub use deps::{SelectionStrategy, assign_dependencies, dependency_ceiling};
pub use error::{ConfigurationError, ErrorKind, GenerateError, InvariantError};
pub use levels::{LEVEL_RATIO_DENOMINATOR, LevelSlot, partition_levels};
pub use naming::package_name;
pub use package::{Package, PackageSet};
pub use rng::SeededRng;
pub use tree::{GenerationRequest, generate};
