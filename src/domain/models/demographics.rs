//! Demographic distribution and sampling types.
//!
//! A `DemographicSample` is one immutable draw across independent weighted
//! axes. Samples carry a `signature` over their categorical fields so the
//! diversity sampler can reject near-duplicates.

use serde::{Deserialize, Serialize};

/// Self-reported comfort with technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechSavviness {
    Beginner,
    Intermediate,
    Advanced,
}

impl TechSavviness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

/// Household income bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeLevel {
    Low,
    Medium,
    High,
}

impl IncomeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Accessibility consideration attached to a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessibilityNeed {
    None,
    LowVision,
    Colorblind,
    ScreenReader,
    MotorReduced,
}

impl AccessibilityNeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LowVision => "low_vision",
            Self::Colorblind => "colorblind",
            Self::ScreenReader => "screen_reader",
            Self::MotorReduced => "motor_reduced",
        }
    }
}

/// Primary device used during the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
        }
    }
}

/// World region the persona lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "North America")]
    NorthAmerica,
    #[serde(rename = "South America")]
    SouthAmerica,
    Europe,
    Africa,
    Asia,
    Oceania,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NorthAmerica => "North America",
            Self::SouthAmerica => "South America",
            Self::Europe => "Europe",
            Self::Africa => "Africa",
            Self::Asia => "Asia",
            Self::Oceania => "Oceania",
        }
    }
}

/// One option of a categorical axis together with its draw weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedOption<T> {
    pub value: T,
    pub weight: u32,
}

impl<T> WeightedOption<T> {
    pub fn new(value: T, weight: u32) -> Self {
        Self { value, weight }
    }
}

/// A labelled age bracket with its draw weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub label: String,
    pub min: u32,
    pub max: u32,
    pub weight: u32,
}

/// Weighted distributions for every demographic axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicDistribution {
    pub age_ranges: Vec<AgeRange>,
    pub tech_savviness: Vec<WeightedOption<TechSavviness>>,
    pub income_level: Vec<WeightedOption<IncomeLevel>>,
    pub accessibility: Vec<WeightedOption<AccessibilityNeed>>,
    pub device: Vec<WeightedOption<DeviceType>>,
    pub regions: Vec<WeightedOption<Region>>,
}

/// Partial overrides: each axis can be replaced independently, the rest
/// fall back to the default distribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemographicOverrides {
    pub age_ranges: Option<Vec<AgeRange>>,
    pub tech_savviness: Option<Vec<WeightedOption<TechSavviness>>>,
    pub income_level: Option<Vec<WeightedOption<IncomeLevel>>>,
    pub accessibility: Option<Vec<WeightedOption<AccessibilityNeed>>>,
    pub device: Option<Vec<WeightedOption<DeviceType>>>,
    pub regions: Option<Vec<WeightedOption<Region>>>,
}

impl Default for DemographicDistribution {
    fn default() -> Self {
        Self {
            age_ranges: vec![
                AgeRange { label: "18-25".into(), min: 18, max: 25, weight: 18 },
                AgeRange { label: "26-35".into(), min: 26, max: 35, weight: 28 },
                AgeRange { label: "36-50".into(), min: 36, max: 50, weight: 30 },
                AgeRange { label: "51-65".into(), min: 51, max: 65, weight: 16 },
                AgeRange { label: "66+".into(), min: 66, max: 80, weight: 8 },
            ],
            tech_savviness: vec![
                WeightedOption::new(TechSavviness::Beginner, 25),
                WeightedOption::new(TechSavviness::Intermediate, 50),
                WeightedOption::new(TechSavviness::Advanced, 25),
            ],
            income_level: vec![
                WeightedOption::new(IncomeLevel::Low, 25),
                WeightedOption::new(IncomeLevel::Medium, 50),
                WeightedOption::new(IncomeLevel::High, 25),
            ],
            accessibility: vec![
                WeightedOption::new(AccessibilityNeed::None, 85),
                WeightedOption::new(AccessibilityNeed::LowVision, 5),
                WeightedOption::new(AccessibilityNeed::Colorblind, 5),
                WeightedOption::new(AccessibilityNeed::ScreenReader, 3),
                WeightedOption::new(AccessibilityNeed::MotorReduced, 2),
            ],
            device: vec![
                WeightedOption::new(DeviceType::Desktop, 50),
                WeightedOption::new(DeviceType::Mobile, 40),
                WeightedOption::new(DeviceType::Tablet, 10),
            ],
            regions: vec![
                WeightedOption::new(Region::NorthAmerica, 28),
                WeightedOption::new(Region::Europe, 24),
                WeightedOption::new(Region::Asia, 24),
                WeightedOption::new(Region::SouthAmerica, 10),
                WeightedOption::new(Region::Africa, 10),
                WeightedOption::new(Region::Oceania, 4),
            ],
        }
    }
}

impl DemographicDistribution {
    /// Merge partial overrides onto the default distribution, axis by axis.
    /// An empty override list is treated as unset so a draw always has at
    /// least one option per axis.
    pub fn merged(overrides: Option<&DemographicOverrides>) -> Self {
        let mut dist = Self::default();
        if let Some(o) = overrides {
            if let Some(v) = o.age_ranges.as_ref().filter(|v| !v.is_empty()) {
                dist.age_ranges = v.clone();
            }
            if let Some(v) = o.tech_savviness.as_ref().filter(|v| !v.is_empty()) {
                dist.tech_savviness = v.clone();
            }
            if let Some(v) = o.income_level.as_ref().filter(|v| !v.is_empty()) {
                dist.income_level = v.clone();
            }
            if let Some(v) = o.accessibility.as_ref().filter(|v| !v.is_empty()) {
                dist.accessibility = v.clone();
            }
            if let Some(v) = o.device.as_ref().filter(|v| !v.is_empty()) {
                dist.device = v.clone();
            }
            if let Some(v) = o.regions.as_ref().filter(|v| !v.is_empty()) {
                dist.regions = v.clone();
            }
        }
        dist
    }
}

/// One immutable demographic draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicSample {
    pub age: u32,
    pub age_range: AgeRange,
    pub tech_savviness: TechSavviness,
    pub income_level: IncomeLevel,
    pub accessibility: AccessibilityNeed,
    pub device: DeviceType,
    pub region: Region,
}

impl DemographicSample {
    /// Discretized fingerprint over the categorical fields. The exact age is
    /// excluded so two draws in the same bracket still collide.
    pub fn signature(&self) -> String {
        [
            self.age_range.label.as_str(),
            self.tech_savviness.as_str(),
            self.income_level.as_str(),
            self.device.as_str(),
            self.region.as_str(),
            self.accessibility.as_str(),
        ]
        .join("|")
    }

    /// Constraint block embedded verbatim into the generation prompt.
    pub fn describe_constraints(&self) -> String {
        format!(
            "- Age between {}-{} (target {})\n\
             - Tech savviness: {}\n\
             - Income level: {}\n\
             - Primary device: {}\n\
             - Accessibility consideration: {}\n\
             - Region: {} (choose a real country from this region)",
            self.age_range.min,
            self.age_range.max,
            self.age,
            self.tech_savviness.as_str(),
            self.income_level.as_str(),
            self.device.as_str(),
            self.accessibility.as_str(),
            self.region.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_excludes_exact_age() {
        let range = AgeRange { label: "26-35".into(), min: 26, max: 35, weight: 28 };
        let a = DemographicSample {
            age: 27,
            age_range: range.clone(),
            tech_savviness: TechSavviness::Beginner,
            income_level: IncomeLevel::Low,
            accessibility: AccessibilityNeed::None,
            device: DeviceType::Mobile,
            region: Region::Asia,
        };
        let b = DemographicSample { age: 34, ..a.clone() };
        assert_eq!(a.signature(), b.signature());
        assert_eq!(a.signature(), "26-35|beginner|low|mobile|Asia|none");
    }

    #[test]
    fn merged_overrides_replace_single_axis() {
        let overrides = DemographicOverrides {
            device: Some(vec![WeightedOption::new(DeviceType::Tablet, 1)]),
            ..Default::default()
        };
        let dist = DemographicDistribution::merged(Some(&overrides));
        assert_eq!(dist.device.len(), 1);
        assert_eq!(dist.device[0].value, DeviceType::Tablet);
        // Untouched axes keep their defaults
        assert_eq!(dist.age_ranges.len(), 5);
        assert_eq!(dist.regions.len(), 6);
    }

    #[test]
    fn constraint_block_names_every_axis() {
        let dist = DemographicDistribution::default();
        let sample = DemographicSample {
            age: 40,
            age_range: dist.age_ranges[2].clone(),
            tech_savviness: TechSavviness::Advanced,
            income_level: IncomeLevel::High,
            accessibility: AccessibilityNeed::ScreenReader,
            device: DeviceType::Desktop,
            region: Region::Europe,
        };
        let block = sample.describe_constraints();
        assert!(block.contains("Age between 36-50 (target 40)"));
        assert!(block.contains("screen_reader"));
        assert!(block.contains("Region: Europe"));
    }
}
