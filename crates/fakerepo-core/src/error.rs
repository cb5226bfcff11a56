//! Error taxonomy for dependency-tree generation.
//!
//! Two families exist:
//!
//! - [`ConfigurationError`]: the caller asked for something the generator
//!   cannot honour. Surfaced immediately, never recovered.
//! - [`InvariantError`]: the generator broke one of its own guarantees. These
//!   indicate a logic defect and are always fatal.
//!
//! Generation is pure, so retrying with the same request reproduces the same
//! error. No partial package set is ever returned alongside an error.

use std::fmt;

/// Rejected generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Fewer than three packages were requested.
    #[error("package count must be greater than 2, got {count}")]
    TooFewPackages { count: usize },

    /// Zero levels were requested.
    #[error("package level count must be at least 1")]
    NoLevels,

    /// The level count leaves at least one level without packages.
    #[error("{levels} levels cannot all be populated with {count} packages (level {empty_level} is empty)")]
    TooManyLevels {
        count: usize,
        levels: usize,
        empty_level: usize,
    },

    /// A build time was negative, non-finite, or had `min > max`.
    #[error("invalid build time: {reason}")]
    InvalidBuildTime { reason: String },

    /// A bounded draw was requested with `min > max`.
    #[error("invalid draw range [{min}, {max}]")]
    InvalidRange { min: u64, max: u64 },
}

/// Broken internal guarantees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    /// A package above level 0 found no packages below it.
    #[error("package {package} at level {level} has no lower-level dependency candidates")]
    EmptyCandidatePool { package: String, level: usize },

    /// Rejection sampling gave up before collecting enough distinct indices.
    #[error("gave up after {attempts} draws collecting {wanted} of {available} candidates for {package}")]
    SamplingExhausted {
        package: String,
        wanted: usize,
        available: usize,
        attempts: usize,
    },

    /// A dependency name does not resolve to a package in the set.
    #[error("package {package} depends on unknown package {dependency}")]
    UnknownDependency { package: String, dependency: String },

    /// The dependency graph contains a cycle through `package`.
    #[error("dependency cycle through package {package}")]
    DependencyCycle { package: String },
}

/// Any failure of [`crate::generate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

impl GenerateError {
    /// Machine-readable classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(inner) => match inner {
                ConfigurationError::TooFewPackages { .. } => ErrorKind::TooFewPackages,
                ConfigurationError::NoLevels | ConfigurationError::TooManyLevels { .. } => {
                    ErrorKind::InvalidLevels
                }
                ConfigurationError::InvalidBuildTime { .. } => ErrorKind::InvalidBuildTime,
                ConfigurationError::InvalidRange { .. } => ErrorKind::InvalidRange,
            },
            Self::Invariant(inner) => match inner {
                InvariantError::EmptyCandidatePool { .. } => ErrorKind::EmptyCandidatePool,
                InvariantError::SamplingExhausted { .. } => ErrorKind::SamplingExhausted,
                InvariantError::UnknownDependency { .. } => ErrorKind::UnknownDependency,
                InvariantError::DependencyCycle { .. } => ErrorKind::DependencyCycle,
            },
        }
    }

    /// True for caller-side mistakes, false for generator defects.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TooFewPackages,
    InvalidLevels,
    InvalidBuildTime,
    InvalidRange,
    EmptyCandidatePool,
    SamplingExhausted,
    UnknownDependency,
    DependencyCycle,
}

impl ErrorKind {
    /// Stable code identifier (`E####`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TooFewPackages => "E1001",
            Self::InvalidLevels => "E1002",
            Self::InvalidBuildTime => "E1003",
            Self::InvalidRange => "E1004",
            Self::EmptyCandidatePool => "E9001",
            Self::SamplingExhausted => "E9002",
            Self::UnknownDependency => "E9003",
            Self::DependencyCycle => "E9004",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::TooFewPackages => Some("Request at least 3 packages."),
            Self::InvalidLevels => {
                Some("Use fewer levels or more packages so every level gets a package.")
            }
            Self::InvalidBuildTime => {
                Some("Use non-negative seconds, either `N` or `MIN,MAX` with MIN <= MAX.")
            }
            Self::InvalidRange => None,
            Self::EmptyCandidatePool
            | Self::SamplingExhausted
            | Self::UnknownDependency
            | Self::DependencyCycle => {
                Some("This is a generator bug. Report it with the seed and parameters used.")
            }
        }
    }

    /// True for codes in the configuration family.
    #[must_use]
    pub const fn is_configuration(self) -> bool {
        matches!(
            self,
            Self::TooFewPackages | Self::InvalidLevels | Self::InvalidBuildTime | Self::InvalidRange
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
