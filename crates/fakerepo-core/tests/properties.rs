use std::collections::{HashMap, HashSet};

use fakerepo_core::{
    BuildTime, ConfigurationError, GenerateError, GenerationRequest, PackageSet, SelectionStrategy,
    dependency_ceiling, generate, partition_levels,
};
use proptest::prelude::*;

fn arb_selection() -> impl Strategy<Value = SelectionStrategy> {
    prop_oneof![
        Just(SelectionStrategy::PartialShuffle),
        Just(SelectionStrategy::Rejection),
    ]
}

fn arb_build_time() -> impl Strategy<Value = Option<BuildTime>> {
    prop_oneof![
        Just(None),
        (0_u32..20).prop_map(|s| Some(BuildTime::Fixed(f64::from(s)))),
        (0_u32..10, 0_u32..10).prop_map(|(lo, extra)| {
            Some(BuildTime::Range(f64::from(lo), f64::from(lo + extra)))
        }),
    ]
}

fn arb_request() -> impl Strategy<Value = GenerationRequest> {
    (
        3_usize..240,
        1_usize..7,
        "[a-z0-9]{0,12}",
        arb_build_time(),
        arb_selection(),
    )
        .prop_map(|(count, levels, seed, build_time, selection)| GenerationRequest {
            package_count: count,
            package_levels: levels,
            seed,
            build_time,
            selection,
        })
}

fn check_set(request: &GenerationRequest, set: &PackageSet) -> Result<(), TestCaseError> {
    prop_assert_eq!(set.len(), request.package_count);

    let sizes = set.level_sizes();
    prop_assert_eq!(sizes.len(), request.package_levels);
    prop_assert!(sizes.iter().all(|&n| n > 0), "empty level in {:?}", sizes);

    let names: HashSet<&str> = set.iter().map(|p| p.name.as_str()).collect();
    prop_assert_eq!(names.len(), set.len(), "duplicate names");

    let level_of: HashMap<&str, usize> = set.iter().map(|p| (p.name.as_str(), p.level)).collect();
    for p in set {
        for dep in &p.dependencies {
            let dep_level = level_of.get(dep.as_str()).copied();
            prop_assert!(dep_level.is_some(), "{} depends on missing {}", p.name, dep);
            prop_assert!(dep_level < Some(p.level), "{} -> {} is not downward", p.name, dep);
        }

        if p.level == 0 {
            prop_assert!(p.dependencies.is_empty());
        } else {
            let lower = set.iter().filter(|q| q.level < p.level).count();
            let n = p.dependencies.len();
            prop_assert!(n >= 1 && n <= dependency_ceiling(lower), "{}: {} deps", p.name, n);
            let unique: HashSet<&String> = p.dependencies.iter().collect();
            prop_assert_eq!(unique.len(), n);
        }

        if let Some(bt) = p.build_time {
            let (lo, hi) = bt.bounds_millis();
            prop_assert!((lo..=hi).contains(&p.build_millis));
        } else {
            prop_assert_eq!(p.build_millis, 0);
        }
    }

    prop_assert_eq!(set.is_acyclic(), Ok(true));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn generated_sets_hold_every_invariant(request in arb_request()) {
        match generate(&request) {
            Ok(set) => check_set(&request, &set)?,
            Err(err) => {
                let is_too_many_levels = matches!(
                    err,
                    GenerateError::Configuration(ConfigurationError::TooManyLevels { .. })
                );
                prop_assert!(is_too_many_levels, "unexpected error {err:?}");
                prop_assert!(
                    partition_levels(request.package_count, request.package_levels).is_err()
                );
            }
        }
    }

    #[test]
    fn generation_is_deterministic(request in arb_request()) {
        prop_assert_eq!(generate(&request), generate(&request));
    }

    #[test]
    fn build_waves_cover_every_package(request in arb_request()) {
        if let Ok(set) = generate(&request) {
            let waves = set.build_waves().expect("generated graphs resolve");
            let total: usize = waves.iter().map(Vec::len).sum();
            prop_assert_eq!(total, set.len());

            let mut wave_of: HashMap<&str, usize> = HashMap::new();
            for (i, wave) in waves.iter().enumerate() {
                for name in wave {
                    wave_of.insert(name.as_str(), i);
                }
            }
            for p in &set {
                for dep in &p.dependencies {
                    prop_assert!(wave_of[dep.as_str()] < wave_of[p.name.as_str()]);
                }
            }
        }
    }

    #[test]
    fn counts_of_two_or_less_always_fail(count in 0_usize..3, levels in 0_usize..6) {
        let err = generate(&GenerationRequest::new(count, levels, "x")).expect_err("too few");
        prop_assert_eq!(
            err,
            GenerateError::Configuration(ConfigurationError::TooFewPackages { count })
        );
    }
}
