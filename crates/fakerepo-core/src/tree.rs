//! Tree generation: the single entry point composing partitioning, naming,
//! dependency assignment and build-time sampling.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::build_time::{BuildTime, sample_build_millis};
use crate::deps::{SelectionStrategy, assign_dependencies};
use crate::error::GenerateError;
use crate::levels::partition_levels;
use crate::naming::package_name;
use crate::package::{Package, PackageSet};
use crate::rng::SeededRng;

/// Everything that determines one generated tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Total number of packages, must be greater than 2.
    pub package_count: usize,
    /// Number of dependency levels, at least 1.
    pub package_levels: usize,
    /// Seed for the pseudorandom stream.
    pub seed: String,
    /// Build duration applied to every package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_time: Option<BuildTime>,
    /// How dependency subsets are drawn.
    #[serde(default)]
    pub selection: SelectionStrategy,
}

impl GenerationRequest {
    /// Request with default selection and no build time.
    #[must_use]
    pub fn new(package_count: usize, package_levels: usize, seed: impl Into<String>) -> Self {
        Self {
            package_count,
            package_levels,
            seed: seed.into(),
            build_time: None,
            selection: SelectionStrategy::default(),
        }
    }

    #[must_use]
    pub const fn with_build_time(mut self, build_time: BuildTime) -> Self {
        self.build_time = Some(build_time);
        self
    }

    #[must_use]
    pub const fn with_selection(mut self, selection: SelectionStrategy) -> Self {
        self.selection = selection;
        self
    }
}

/// Generate the full package set for `request`.
///
/// A fresh RNG is seeded per call, so the same request always yields the
/// same set. Draws happen in a fixed order: one dependency-count draw plus
/// the index draws for each package above level 0 (in set order), then one
/// build-time draw per package (in set order).
///
/// # Errors
///
/// Returns a configuration error for invalid parameters and an invariant
/// error if generation breaks one of its guarantees. Nothing is returned on
/// failure.
pub fn generate(request: &GenerationRequest) -> Result<PackageSet, GenerateError> {
    if let Some(build_time) = &request.build_time {
        build_time.validate()?;
    }

    let slots = partition_levels(request.package_count, request.package_levels)?;
    let max_level = request.package_levels - 1;
    let mut rng = SeededRng::from_seed(&request.seed);

    let mut packages: Vec<Package> = Vec::with_capacity(request.package_count);
    for slot in &slots {
        debug!(level = slot.level, count = slot.count, "sized level");
        packages.extend((0..slot.count).map(|index| {
            Package::new(
                slot.level,
                package_name(slot.level, index, max_level),
                request.build_time,
            )
        }));
    }

    let edges = assign_dependencies(&mut packages, request.selection, &mut rng)?;

    for package in &mut packages {
        package.build_millis = sample_build_millis(package.build_time.as_ref(), &mut rng)?;
    }

    info!(
        seed = %request.seed,
        packages = packages.len(),
        levels = slots.len(),
        edges,
        "generated dependency tree"
    );

    Ok(PackageSet::new(packages))
}
