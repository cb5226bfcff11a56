//! Per-package build durations.
//!
//! A [`BuildTime`] is configured in seconds and sampled into whole
//! milliseconds from the shared generation stream.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::rng::SeededRng;

/// Configured build duration in seconds.
///
/// Serialized as a bare number (`3`) or a two-element array (`[2, 5]`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildTime {
    /// Always this many seconds.
    Fixed(f64),
    /// Inclusive range of seconds, `min <= max`.
    Range(f64, f64),
}

/// Largest accepted bound in seconds. Keeps every bound exactly
/// representable as whole milliseconds in a `u64`.
pub const MAX_BUILD_SECS: f64 = 1.0e15;

impl BuildTime {
    /// Check that all bounds are finite, non-negative, at most
    /// [`MAX_BUILD_SECS`] and ordered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidBuildTime`] describing the first
    /// problem found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let (min, max) = self.bounds_secs();
        for value in [min, max] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidBuildTime {
                    reason: format!("{value} is not a non-negative number of seconds"),
                });
            }
            if value > MAX_BUILD_SECS {
                return Err(ConfigurationError::InvalidBuildTime {
                    reason: format!("{value} seconds exceeds the limit of {MAX_BUILD_SECS}"),
                });
            }
        }
        if min > max {
            return Err(ConfigurationError::InvalidBuildTime {
                reason: format!("minimum {min} exceeds maximum {max}"),
            });
        }
        Ok(())
    }

    /// Lower and upper bound in seconds.
    #[must_use]
    pub const fn bounds_secs(&self) -> (f64, f64) {
        match *self {
            Self::Fixed(secs) => (secs, secs),
            Self::Range(min, max) => (min, max),
        }
    }

    /// Lower and upper bound in whole milliseconds.
    #[must_use]
    pub fn bounds_millis(&self) -> (u64, u64) {
        let (min, max) = self.bounds_secs();
        (secs_to_millis(min), secs_to_millis(max))
    }
}

impl fmt::Display for BuildTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(secs) => write!(f, "{secs}"),
            Self::Range(min, max) => write!(f, "{min},{max}"),
        }
    }
}

impl FromStr for BuildTime {
    type Err = ConfigurationError;

    /// Parse `N` or `MIN,MAX`, where each value is digits with an optional
    /// decimal part.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parse_part = |part: &str| -> Result<f64, ConfigurationError> {
            let well_formed = match part.split_once('.') {
                Some((whole, frac)) => is_digits(whole) && is_digits(frac),
                None => is_digits(part),
            };
            if !well_formed {
                return Err(ConfigurationError::InvalidBuildTime {
                    reason: format!("`{raw}` is not a number or number range"),
                });
            }
            part.parse::<f64>()
                .map_err(|e| ConfigurationError::InvalidBuildTime {
                    reason: format!("`{part}`: {e}"),
                })
        };

        let parsed = match raw.split_once(',') {
            Some((min, max)) => Self::Range(parse_part(min)?, parse_part(max)?),
            None => Self::Fixed(parse_part(raw)?),
        };
        parsed.validate()?;
        Ok(parsed)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn secs_to_millis(secs: f64) -> u64 {
    (secs * 1000.0).round() as u64
}

/// Sample one build duration in milliseconds.
///
/// Absent build times sample from `[0, 0]`. Every call consumes exactly one
/// draw from `rng`, whatever the configuration.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidBuildTime`] for an invalid
/// configuration.
pub fn sample_build_millis(
    build_time: Option<&BuildTime>,
    rng: &mut SeededRng,
) -> Result<u64, ConfigurationError> {
    let (min, max) = match build_time {
        Some(bt) => {
            bt.validate()?;
            bt.bounds_millis()
        }
        None => (0, 0),
    };
    rng.int_in_range(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_build_time_is_zero() {
        let mut rng = SeededRng::from_seed("bt");
        assert_eq!(sample_build_millis(None, &mut rng).expect("valid"), 0);
    }

    #[test]
    fn fixed_build_time_is_exact() {
        let mut rng = SeededRng::from_seed("bt");
        for _ in 0..50 {
            let ms = sample_build_millis(Some(&BuildTime::Fixed(3.0)), &mut rng).expect("valid");
            assert_eq!(ms, 3000);
        }
    }

    #[test]
    fn ranged_build_time_stays_in_bounds() {
        let mut rng = SeededRng::from_seed("bt");
        for _ in 0..500 {
            let ms =
                sample_build_millis(Some(&BuildTime::Range(2.0, 5.0)), &mut rng).expect("valid");
            assert!((2000..=5000).contains(&ms), "{ms} out of range");
        }
    }

    #[test]
    fn fractional_seconds_round_to_millis() {
        assert_eq!(BuildTime::Range(0.5, 1.25).bounds_millis(), (500, 1250));
    }

    #[test]
    fn every_sample_consumes_one_draw() {
        let mut a = SeededRng::from_seed("bt");
        let mut b = SeededRng::from_seed("bt");
        let _ = sample_build_millis(None, &mut a).expect("valid");
        let _ = b.next_u64();
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn inverted_range_rejected() {
        let err = BuildTime::Range(5.0, 2.0).validate().expect_err("min > max");
        assert!(matches!(err, ConfigurationError::InvalidBuildTime { .. }));
    }

    #[test]
    fn negative_rejected() {
        assert!(BuildTime::Fixed(-1.0).validate().is_err());
        assert!(BuildTime::Range(f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn oversized_bound_rejected_instead_of_saturating() {
        assert!(BuildTime::Fixed(MAX_BUILD_SECS).validate().is_ok());
        let err = "99999999999999999999999"
            .parse::<BuildTime>()
            .expect_err("too large for u64 millis");
        assert!(matches!(err, ConfigurationError::InvalidBuildTime { .. }));
        assert!(BuildTime::Range(1.0, 1.0e16).validate().is_err());
    }

    #[test]
    fn parses_fixed_and_range() {
        assert_eq!("3".parse::<BuildTime>(), Ok(BuildTime::Fixed(3.0)));
        assert_eq!("2,5".parse::<BuildTime>(), Ok(BuildTime::Range(2.0, 5.0)));
        assert_eq!("0.5,1.5".parse::<BuildTime>(), Ok(BuildTime::Range(0.5, 1.5)));
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in ["", "abc", "1,", ",2", "1,2,3", "-1", "1.", " 1", "1e3", "5,2"] {
            assert!(raw.parse::<BuildTime>().is_err(), "{raw:?} should fail");
        }
    }

    #[test]
    fn serde_wire_form() {
        let fixed: BuildTime = serde_json::from_str("3").expect("number");
        assert_eq!(fixed, BuildTime::Fixed(3.0));
        let range: BuildTime = serde_json::from_str("[2, 5]").expect("pair");
        assert_eq!(range, BuildTime::Range(2.0, 5.0));
        assert_eq!(serde_json::to_string(&range).expect("serialize"), "[2.0,5.0]");
    }

    #[test]
    fn display_round_trips_through_parse() {
        let bt = BuildTime::Range(2.0, 5.5);
        assert_eq!(bt.to_string().parse::<BuildTime>(), Ok(bt));
    }
}
