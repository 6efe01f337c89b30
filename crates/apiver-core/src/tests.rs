//! Property tests for version resolution and condition ranking
//!
//! These tests verify that:
//! - resolution lands on the latest registered version not after the request
//! - resolution is idempotent on canonical strings
//! - combining conditions is a set union
//! - ranking agrees with latest-version ordering

use crate::{Version, VersionCondition, VersionRegistry};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
}

fn day(offset: i64) -> Version {
    Version::from_date(epoch() + Duration::days(offset))
}

/// Strictly increasing version sequence as day offsets
fn chronological_versions() -> impl Strategy<Value = Vec<Version>> {
    prop::collection::btree_set(0i64..4000, 1..12)
        .prop_map(|offsets| offsets.into_iter().map(day).collect())
}

fn version_set() -> impl Strategy<Value = BTreeSet<Version>> {
    prop::collection::btree_set((0i64..4000).prop_map(day), 0..8)
}

fn registry_of(versions: &[Version], default_index: Option<usize>) -> VersionRegistry {
    let registry = VersionRegistry::new();
    for (i, version) in versions.iter().enumerate() {
        registry.register(*version, Some(i) == default_index);
    }
    registry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_resolve_closest_earlier(
        versions in chronological_versions(),
        query in -100i64..4100,
    ) {
        let registry = registry_of(&versions, None);
        let requested = day(query);

        let expected = versions
            .iter()
            .filter(|v| !v.is_after(&requested))
            .max()
            .copied()
            .unwrap_or(versions[0]);

        prop_assert_eq!(registry.resolve(&requested.to_string()), Some(expected));
    }

    #[test]
    fn prop_resolve_unparsable_gives_default(
        versions in chronological_versions(),
        default_pick in any::<prop::sample::Index>(),
        garbage in "[a-z ]{0,12}",
    ) {
        let default_index = default_pick.index(versions.len());
        let registry = registry_of(&versions, Some(default_index));

        prop_assert_eq!(registry.resolve(&garbage), Some(versions[default_index]));
    }

    #[test]
    fn prop_resolve_idempotent(
        versions in chronological_versions(),
        query in -100i64..4100,
    ) {
        let registry = registry_of(&versions, None);
        let first = registry.resolve(&day(query).to_string()).unwrap();
        let second = registry.resolve(&first.canonical()).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_combine_is_union(a in version_set(), b in version_set()) {
        let left = VersionCondition::from_versions(a.iter().copied());
        let right = VersionCondition::from_versions(b.iter().copied());

        let combined: BTreeSet<Version> = left.combine(&right).versions().copied().collect();
        let expected: BTreeSet<Version> = a.union(&b).copied().collect();
        prop_assert_eq!(&combined, &expected);

        let reversed: BTreeSet<Version> = right.combine(&left).versions().copied().collect();
        prop_assert_eq!(combined, reversed);
    }

    #[test]
    fn prop_rank_follows_latest_version(a in version_set(), b in version_set()) {
        let left = VersionCondition::from_versions(a.iter().copied());
        let right = VersionCondition::from_versions(b.iter().copied());

        let expected = right.latest_version().cmp(&left.latest_version());
        prop_assert_eq!(left.rank(&right), expected);
        prop_assert_eq!(right.rank(&left), expected.reverse());

        if let (Some(l), Some(r)) = (left.latest_version(), right.latest_version()) {
            if l > r {
                prop_assert_eq!(left.rank(&right), Ordering::Less);
            }
        }
    }

    #[test]
    fn prop_match_is_not_before(
        declared in version_set(),
        versions in chronological_versions(),
        query in -100i64..4100,
    ) {
        let registry = registry_of(&versions, None);
        let condition = VersionCondition::from_versions(declared.iter().copied());
        let effective = registry.resolve(&day(query).to_string()).unwrap();

        let expected = declared.iter().any(|d| *d <= effective);
        prop_assert_eq!(condition.matches(Some(&day(query).to_string()), &registry), expected);
    }
}

#[test]
fn test_first_registration_always_default() {
    let registry = VersionRegistry::new();
    registry.register(day(10), false);
    assert_eq!(registry.default_version(), Some(day(10)));

    registry.register(day(20), true);
    assert_eq!(registry.default_version(), Some(day(20)));

    registry.register(day(30), false);
    assert_eq!(registry.default_version(), Some(day(20)));
}
