//! Weighted demographic sampling with best-effort diversity.
//!
//! `sample` is a pure weighted draw across independent axes.
//! `sample_diverse` wraps it with signature-based rejection resampling:
//! bounded retries, then accept the collision rather than starve when the
//! distribution space is smaller than the requested count.

use std::collections::HashSet;

use rand::Rng;
use tracing::warn;

use crate::domain::models::{
    AgeRange, DemographicDistribution, DemographicOverrides, DemographicSample, WeightedOption,
};

/// Resamples allowed after the initial draw before a collision is accepted.
const MAX_RESAMPLE_ATTEMPTS: u32 = 6;

fn weighted_pick<'a, T, R: Rng>(rng: &mut R, options: &'a [WeightedOption<T>]) -> &'a T {
    let total: u32 = options.iter().map(|o| o.weight).sum();
    if total == 0 {
        // All-zero weights degrade to picking the last option, matching the
        // cumulative walk falling through.
        return &options[options.len() - 1].value;
    }
    let roll = rng.gen_range(0..total);
    let mut current = 0;
    for option in options {
        current += option.weight;
        if roll < current {
            return &option.value;
        }
    }
    &options[options.len() - 1].value
}

fn weighted_pick_age_range<'a, R: Rng>(rng: &mut R, ranges: &'a [AgeRange]) -> &'a AgeRange {
    let total: u32 = ranges.iter().map(|r| r.weight).sum();
    if total == 0 {
        return &ranges[ranges.len() - 1];
    }
    let roll = rng.gen_range(0..total);
    let mut current = 0;
    for range in ranges {
        current += range.weight;
        if roll < current {
            return range;
        }
    }
    &ranges[ranges.len() - 1]
}

/// Draw one demographic sample from the (optionally overridden) distribution.
pub fn sample(overrides: Option<&DemographicOverrides>) -> DemographicSample {
    sample_with_rng(overrides, &mut rand::thread_rng())
}

/// As [`sample`], with an explicit RNG for deterministic tests.
pub fn sample_with_rng<R: Rng>(
    overrides: Option<&DemographicOverrides>,
    rng: &mut R,
) -> DemographicSample {
    let dist = DemographicDistribution::merged(overrides);
    draw(&dist, rng)
}

fn draw<R: Rng>(dist: &DemographicDistribution, rng: &mut R) -> DemographicSample {
    let age_range = weighted_pick_age_range(rng, &dist.age_ranges).clone();
    let age = rng.gen_range(age_range.min..=age_range.max);
    DemographicSample {
        age,
        age_range,
        tech_savviness: *weighted_pick(rng, &dist.tech_savviness),
        income_level: *weighted_pick(rng, &dist.income_level),
        accessibility: *weighted_pick(rng, &dist.accessibility),
        device: *weighted_pick(rng, &dist.device),
        region: *weighted_pick(rng, &dist.regions),
    }
}

/// Draw a sample whose signature is not yet in `seen`, resampling up to
/// [`MAX_RESAMPLE_ATTEMPTS`] times. After exhaustion the last draw is
/// accepted regardless of collision; the final signature is always recorded
/// in `seen` before returning.
pub fn sample_diverse(
    overrides: Option<&DemographicOverrides>,
    seen: &mut HashSet<String>,
) -> DemographicSample {
    sample_diverse_with_rng(overrides, seen, &mut rand::thread_rng())
}

/// As [`sample_diverse`], with an explicit RNG for deterministic tests.
pub fn sample_diverse_with_rng<R: Rng>(
    overrides: Option<&DemographicOverrides>,
    seen: &mut HashSet<String>,
    rng: &mut R,
) -> DemographicSample {
    let dist = DemographicDistribution::merged(overrides);
    let mut candidate = draw(&dist, rng);
    let mut signature = candidate.signature();
    let mut attempts = 0;
    while seen.contains(&signature) && attempts < MAX_RESAMPLE_ATTEMPTS {
        candidate = draw(&dist, rng);
        signature = candidate.signature();
        attempts += 1;
    }
    if seen.contains(&signature) {
        warn!(
            signature = %signature,
            attempts = MAX_RESAMPLE_ATTEMPTS,
            "diversity resampling exhausted, accepting duplicate signature"
        );
    }
    seen.insert(signature);
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{DeviceType, IncomeLevel, Region, TechSavviness};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sample_respects_age_range_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let s = sample_with_rng(None, &mut rng);
            assert!(s.age >= s.age_range.min && s.age <= s.age_range.max);
        }
    }

    #[test]
    fn single_option_axes_are_deterministic() {
        let overrides = DemographicOverrides {
            tech_savviness: Some(vec![WeightedOption::new(TechSavviness::Advanced, 1)]),
            income_level: Some(vec![WeightedOption::new(IncomeLevel::High, 1)]),
            device: Some(vec![WeightedOption::new(DeviceType::Mobile, 1)]),
            regions: Some(vec![WeightedOption::new(Region::Oceania, 1)]),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let s = sample_with_rng(Some(&overrides), &mut rng);
        assert_eq!(s.tech_savviness, TechSavviness::Advanced);
        assert_eq!(s.income_level, IncomeLevel::High);
        assert_eq!(s.device, DeviceType::Mobile);
        assert_eq!(s.region, Region::Oceania);
    }

    #[test]
    fn zero_weight_options_are_never_drawn() {
        let overrides = DemographicOverrides {
            device: Some(vec![
                WeightedOption::new(DeviceType::Desktop, 0),
                WeightedOption::new(DeviceType::Tablet, 5),
            ]),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let s = sample_with_rng(Some(&overrides), &mut rng);
            assert_eq!(s.device, DeviceType::Tablet);
        }
    }

    #[test]
    fn diverse_draws_avoid_seen_signatures_when_space_allows() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        let mut signatures = Vec::new();
        // Default space has thousands of signatures; six draws should not
        // collide while capacity remains.
        for _ in 0..6 {
            let s = sample_diverse_with_rng(None, &mut seen, &mut rng);
            signatures.push(s.signature());
        }
        let unique: HashSet<_> = signatures.iter().collect();
        assert_eq!(unique.len(), signatures.len());
        assert_eq!(seen.len(), signatures.len());
    }

    #[test]
    fn exhausted_space_accepts_duplicate_instead_of_spinning() {
        // Pin every axis so exactly one signature exists.
        let overrides = DemographicOverrides {
            age_ranges: Some(vec![AgeRange {
                label: "26-35".into(),
                min: 26,
                max: 35,
                weight: 1,
            }]),
            tech_savviness: Some(vec![WeightedOption::new(TechSavviness::Beginner, 1)]),
            income_level: Some(vec![WeightedOption::new(IncomeLevel::Low, 1)]),
            accessibility: Some(vec![WeightedOption::new(
                crate::domain::models::AccessibilityNeed::None,
                1,
            )]),
            device: Some(vec![WeightedOption::new(DeviceType::Desktop, 1)]),
            regions: Some(vec![WeightedOption::new(Region::Europe, 1)]),
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();
        let first = sample_diverse_with_rng(Some(&overrides), &mut seen, &mut rng);
        let second = sample_diverse_with_rng(Some(&overrides), &mut seen, &mut rng);
        assert_eq!(first.signature(), second.signature());
        assert_eq!(seen.len(), 1);
    }
}
