//! Dependency assignment between levels.
//!
//! Every package above level 0 depends on a random, non-empty subset of the
//! packages strictly below it. Because edges only ever point downwards, the
//! graph is acyclic by construction and ascending level is a valid build
//! order.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ConfigurationError, GenerateError, InvariantError};
use crate::package::Package;
use crate::rng::SeededRng;

/// Smallest upper bound on the dependency count draw. Small candidate pools
/// still allow up to this many dependencies.
pub const MIN_DEPENDENCY_CEILING: usize = 4;

/// Rejection sampling gives up after `wanted * REJECTION_ATTEMPT_FACTOR`
/// draws.
pub const REJECTION_ATTEMPT_FACTOR: usize = 64;

/// How distinct candidate indices are picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    /// Fisher-Yates prefix over the candidate indices. Always terminates
    /// after exactly `wanted` draws.
    #[default]
    PartialShuffle,
    /// Draw indices until `wanted` distinct ones are collected, bounded by
    /// [`REJECTION_ATTEMPT_FACTOR`].
    Rejection,
}

/// Upper bound of the dependency count draw for a pool of `candidates`.
#[must_use]
pub fn dependency_ceiling(candidates: usize) -> usize {
    candidates.div_ceil(2).max(MIN_DEPENDENCY_CEILING)
}

/// Fill in `dependencies` for every package above level 0.
///
/// Packages are visited in slice order, and candidates are listed in slice
/// order, so the result depends on the package order as well as the seed.
///
/// # Errors
///
/// - [`InvariantError::EmptyCandidatePool`] when a package has nothing below it.
/// - [`InvariantError::SamplingExhausted`] when rejection sampling hits its cap.
pub fn assign_dependencies(
    packages: &mut [Package],
    strategy: SelectionStrategy,
    rng: &mut SeededRng,
) -> Result<usize, GenerateError> {
    let mut edges = 0_usize;

    for position in 0..packages.len() {
        let level = packages[position].level;
        if level == 0 {
            continue;
        }

        let candidates: Vec<&str> = packages
            .iter()
            .filter(|p| p.level < level)
            .map(|p| p.name.as_str())
            .collect();

        if candidates.is_empty() {
            return Err(InvariantError::EmptyCandidatePool {
                package: packages[position].name.clone(),
                level,
            }
            .into());
        }

        let ceiling = dependency_ceiling(candidates.len());
        let wanted = rng.index_in_range(1, ceiling)?.min(candidates.len());

        let chosen = match strategy {
            SelectionStrategy::PartialShuffle => shuffle_pick(rng, candidates.len(), wanted)?,
            SelectionStrategy::Rejection => rejection_pick(rng, candidates.len(), wanted)?
                .ok_or_else(|| InvariantError::SamplingExhausted {
                    package: packages[position].name.clone(),
                    wanted,
                    available: candidates.len(),
                    attempts: wanted.saturating_mul(REJECTION_ATTEMPT_FACTOR),
                })?,
        };

        let dependencies: Vec<String> = chosen
            .into_iter()
            .map(|idx| candidates[idx].to_string())
            .collect();

        trace!(
            package = %packages[position].name,
            pool = candidates.len(),
            count = dependencies.len(),
            "assigned dependencies"
        );

        edges += dependencies.len();
        packages[position].dependencies = dependencies;
    }

    Ok(edges)
}

/// `wanted` distinct indices from `[0, available)`, sorted ascending, via a
/// Fisher-Yates prefix.
fn shuffle_pick(
    rng: &mut SeededRng,
    available: usize,
    wanted: usize,
) -> Result<Vec<usize>, ConfigurationError> {
    let mut pool: Vec<usize> = (0..available).collect();
    let take = wanted.min(available);
    for i in 0..take {
        let j = rng.index_in_range(i, available - 1)?;
        pool.swap(i, j);
    }
    pool.truncate(take);
    pool.sort_unstable();
    Ok(pool)
}

/// `wanted` distinct indices from `[0, available)`, sorted ascending, by
/// redrawing duplicates. `Ok(None)` when the attempt cap is reached.
fn rejection_pick(
    rng: &mut SeededRng,
    available: usize,
    wanted: usize,
) -> Result<Option<Vec<usize>>, ConfigurationError> {
    if available == 0 {
        return Ok((wanted == 0).then(Vec::new));
    }

    let max_attempts = wanted.saturating_mul(REJECTION_ATTEMPT_FACTOR);
    let mut chosen: Vec<usize> = Vec::with_capacity(wanted);
    let mut attempts = 0_usize;

    while chosen.len() < wanted {
        if attempts >= max_attempts {
            return Ok(None);
        }
        attempts += 1;
        let candidate = rng.index_in_range(0, available - 1)?;
        if !chosen.contains(&candidate) {
            chosen.push(candidate);
        }
    }

    chosen.sort_unstable();
    Ok(Some(chosen))
}
