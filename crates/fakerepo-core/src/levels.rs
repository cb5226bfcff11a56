//! Level partitioning: how many packages sit on each dependency level.
//!
//! Level 0 holds leaf libraries; the highest level holds applications.
//! Levels are sized from the top down. Every non-zero level takes one in
//! [`LEVEL_RATIO_DENOMINATOR`] of the packages still unallocated (rounded
//! up), and level 0 absorbs whatever remains.

use crate::error::ConfigurationError;

/// Share of the remaining packages allocated to each non-zero level,
/// expressed as "one in N".
///
/// With 4, a 32-package, 3-level tree gets 8 apps, 6 mid-level libraries and
/// 18 leaf libraries. Raising it makes upper levels thinner and the leaf
/// level wider.
pub const LEVEL_RATIO_DENOMINATOR: usize = 4;

/// Smallest package count the partitioner accepts.
pub const MIN_PACKAGE_COUNT: usize = 3;

/// Package allocation for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSlot {
    /// Level number, 0 = leaf.
    pub level: usize,
    /// Number of packages on this level.
    pub count: usize,
}

/// Split `package_count` packages over `package_levels` levels.
///
/// Slots are returned highest level first, which is also the order packages
/// are generated in.
///
/// # Errors
///
/// - [`ConfigurationError::TooFewPackages`] when `package_count <= 2`.
/// - [`ConfigurationError::NoLevels`] when `package_levels == 0`.
/// - [`ConfigurationError::TooManyLevels`] when some level would be empty.
pub fn partition_levels(
    package_count: usize,
    package_levels: usize,
) -> Result<Vec<LevelSlot>, ConfigurationError> {
    if package_count < MIN_PACKAGE_COUNT {
        return Err(ConfigurationError::TooFewPackages {
            count: package_count,
        });
    }
    if package_levels == 0 {
        return Err(ConfigurationError::NoLevels);
    }

    // Every level needs at least one package, so at most `package_count`
    // slots are ever pushed before an empty level is found.
    let mut remaining = package_count;
    let mut slots = Vec::with_capacity(package_levels.min(package_count));
    for level in (0..package_levels).rev() {
        let count = if level == 0 {
            remaining
        } else {
            remaining.div_ceil(LEVEL_RATIO_DENOMINATOR)
        };
        if count == 0 {
            return Err(ConfigurationError::TooManyLevels {
                count: package_count,
                levels: package_levels,
                empty_level: level,
            });
        }
        remaining -= count;
        slots.push(LevelSlot { level, count });
    }

    Ok(slots)
}
