// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fmt;

use serde::Serialize;

use crate::constant::{ATTRIBUTE_NAMES, COMPACT_CORNERS, MANMADE_CORNERS};
use crate::mp::Descriptors;

/// A qualitative label assigned to an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Manmade,
    Fractured,
    Long,
    Round,
    Compact,
    LongSkeleton,
    Rigid,
}

impl Attribute {
    /// Attributes in evaluation order
    pub const ALL: [Attribute; 7] = [
        Attribute::Manmade,
        Attribute::Fractured,
        Attribute::Long,
        Attribute::Round,
        Attribute::Compact,
        Attribute::LongSkeleton,
        Attribute::Rigid,
    ];

    pub fn name(&self) -> &'static str {
        ATTRIBUTE_NAMES[*self as usize]
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Fully populated rule inputs with missing descriptors set to zero
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RuleInputs {
    pub area: f64,
    pub aspect_ratio: f64,
    pub circularity: f64,
    pub eccentricity: f64,
    pub extent: f64,
    pub num_corners: f64,
    pub num_defects: f64,
    pub skeleton_length: f64,
    pub solidity: f64,
}

impl RuleInputs {
    pub fn from_descriptors<D: Descriptors + ?Sized>(descriptors: &D) -> Self {
        let value = |name: &str| descriptors.descriptor(name).unwrap_or(0.0);

        RuleInputs {
            area: value("area"),
            aspect_ratio: value("aspect_ratio"),
            circularity: value("circularity"),
            eccentricity: value("eccentricity"),
            extent: value("extent"),
            num_corners: value("num_corners"),
            num_defects: value("num_defects"),
            skeleton_length: value("skeleton_length"),
            solidity: value("solidity"),
        }
    }

    fn corners_in(&self, set: &[u32]) -> bool {
        set.iter().any(|&c| c as f64 == self.num_corners)
    }
}

/// The seven attribute decisions for one object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AttributeMap {
    pub manmade: bool,
    pub fractured: bool,
    pub long: bool,
    pub round: bool,
    pub compact: bool,
    pub long_skeleton: bool,
    pub rigid: bool,
}

impl AttributeMap {
    pub fn get(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Manmade => self.manmade,
            Attribute::Fractured => self.fractured,
            Attribute::Long => self.long,
            Attribute::Round => self.round,
            Attribute::Compact => self.compact,
            Attribute::LongSkeleton => self.long_skeleton,
            Attribute::Rigid => self.rigid,
        }
    }

    fn set(&mut self, attribute: Attribute, value: bool) {
        match attribute {
            Attribute::Manmade => self.manmade = value,
            Attribute::Fractured => self.fractured = value,
            Attribute::Long => self.long = value,
            Attribute::Round => self.round = value,
            Attribute::Compact => self.compact = value,
            Attribute::LongSkeleton => self.long_skeleton = value,
            Attribute::Rigid => self.rigid = value,
        }
    }

    /// Attribute and decision pairs in evaluation order
    pub fn entries(&self) -> [(Attribute, bool); 7] {
        Attribute::ALL.map(|attribute| (attribute, self.get(attribute)))
    }

    /// Names of the attributes that hold
    pub fn active(&self) -> Vec<&'static str> {
        self.entries()
            .iter()
            .filter(|(_, value)| *value)
            .map(|(attribute, _)| attribute.name())
            .collect()
    }
}

type Rule = fn(&RuleInputs, &AttributeMap) -> bool;

fn manmade(x: &RuleInputs, _: &AttributeMap) -> bool {
    (x.solidity > 0.85 && x.corners_in(&MANMADE_CORNERS))
        || (x.eccentricity > 0.95 && x.skeleton_length > 300.0)
}

fn fractured(x: &RuleInputs, _: &AttributeMap) -> bool {
    x.num_defects > 5.0
        || x.num_corners > 10.0
        || x.skeleton_length > 200.0
        || x.eccentricity > 0.95
}

fn long(x: &RuleInputs, _: &AttributeMap) -> bool {
    x.eccentricity > 0.95
        && (x.aspect_ratio > 3.0 || x.skeleton_length > 300.0)
        && x.circularity < 0.4
}

fn round(x: &RuleInputs, _: &AttributeMap) -> bool {
    x.circularity > 0.65 && x.eccentricity < 0.6 && x.solidity > 0.9
}

fn compact(x: &RuleInputs, _: &AttributeMap) -> bool {
    x.solidity > 0.95 && x.extent > 0.8 && x.corners_in(&COMPACT_CORNERS)
}

fn long_skeleton(x: &RuleInputs, _: &AttributeMap) -> bool {
    x.skeleton_length > 300.0 && (x.area / x.skeleton_length.max(1.0)) < 3.0
}

fn rigid(x: &RuleInputs, decided: &AttributeMap) -> bool {
    (x.solidity > 0.85 && x.extent > 0.85 && x.num_defects <= 2.0)
        || (x.eccentricity > 0.98 && decided.long && x.skeleton_length > 300.0)
}

// Later rules may read decisions made earlier in the list
const RULES: [(Attribute, Rule); 7] = [
    (Attribute::Manmade, manmade),
    (Attribute::Fractured, fractured),
    (Attribute::Long, long),
    (Attribute::Round, round),
    (Attribute::Compact, compact),
    (Attribute::LongSkeleton, long_skeleton),
    (Attribute::Rigid, rigid),
];

/// Assign qualitative attributes from shape descriptors
///
/// Missing descriptors are treated as zero, so every input yields a fully
/// populated map.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use silhouette_core::an::classify;
///
/// let descriptors: HashMap<&str, f64> = HashMap::from([
///     ("solidity", 0.97),
///     ("extent", 0.9),
///     ("num_corners", 4.0),
///     ("circularity", 0.78),
///     ("eccentricity", 0.1),
/// ]);
///
/// let attributes = classify(&descriptors);
///
/// assert!(attributes.manmade);
/// assert!(attributes.compact);
/// assert!(attributes.round);
/// assert!(attributes.rigid);
/// assert!(!attributes.long);
/// ```
pub fn classify<D: Descriptors + ?Sized>(descriptors: &D) -> AttributeMap {
    let inputs = RuleInputs::from_descriptors(descriptors);

    let mut attributes = AttributeMap::default();
    for (attribute, rule) in RULES.iter() {
        let value = rule(&inputs, &attributes);
        attributes.set(*attribute, value);
    }

    attributes
}

#[cfg(test)]
mod test {

    use std::collections::{BTreeMap, HashMap};

    use super::*;
    use crate::mp::describe;

    fn map(entries: &[(&'static str, f64)]) -> HashMap<&'static str, f64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_empty_inputs() {
        let attributes = classify(&HashMap::<String, f64>::new());
        assert_eq!(attributes, AttributeMap::default());
        assert!(attributes.active().is_empty());
    }

    #[test]
    fn test_missing_defects_default_to_zero() {
        let attributes = classify(&map(&[("solidity", 0.9), ("extent", 0.9)]));
        assert!(attributes.rigid);
    }

    #[test]
    fn test_manmade_boundaries() {
        assert!(!classify(&map(&[("solidity", 0.85), ("num_corners", 4.0)])).manmade);
        assert!(classify(&map(&[("solidity", 0.851), ("num_corners", 4.0)])).manmade);
        assert!(!classify(&map(&[("solidity", 0.9), ("num_corners", 5.0)])).manmade);
        assert!(classify(&map(&[("solidity", 0.9), ("num_corners", 12.0)])).manmade);

        assert!(!classify(&map(&[("eccentricity", 0.95), ("skeleton_length", 301.0)])).manmade);
        assert!(classify(&map(&[("eccentricity", 0.951), ("skeleton_length", 301.0)])).manmade);
        assert!(!classify(&map(&[("eccentricity", 0.96), ("skeleton_length", 300.0)])).manmade);
    }

    #[test]
    fn test_fractured_boundaries() {
        assert!(!classify(&map(&[("num_defects", 5.0)])).fractured);
        assert!(classify(&map(&[("num_defects", 6.0)])).fractured);
        assert!(!classify(&map(&[("num_corners", 10.0)])).fractured);
        assert!(classify(&map(&[("num_corners", 11.0)])).fractured);
        assert!(!classify(&map(&[("skeleton_length", 200.0)])).fractured);
        assert!(classify(&map(&[("skeleton_length", 200.5)])).fractured);
        assert!(classify(&map(&[("eccentricity", 0.96)])).fractured);
    }

    #[test]
    fn test_long_boundaries() {
        let base = [("eccentricity", 0.96), ("aspect_ratio", 3.5), ("circularity", 0.3)];
        assert!(classify(&map(&base)).long);

        let flat = [("eccentricity", 0.96), ("aspect_ratio", 3.0), ("circularity", 0.3)];
        assert!(!classify(&map(&flat)).long);

        let skeleton = [("eccentricity", 0.96), ("skeleton_length", 301.0), ("circularity", 0.3)];
        assert!(classify(&map(&skeleton)).long);

        let circular = [("eccentricity", 0.96), ("aspect_ratio", 3.5), ("circularity", 0.4)];
        assert!(!classify(&map(&circular)).long);
    }

    #[test]
    fn test_round_and_compact() {
        let round = map(&[("circularity", 0.7), ("eccentricity", 0.5), ("solidity", 0.95)]);
        assert!(classify(&round).round);
        assert!(!classify(&round).manmade);

        let disc = map(&[
            ("circularity", 0.9),
            ("eccentricity", 0.1),
            ("solidity", 0.99),
            ("extent", 0.78),
            ("num_corners", 16.0),
        ]);

        let attributes = classify(&disc);
        assert!(attributes.round);
        assert!(!attributes.manmade);
        assert!(!attributes.compact);

        let oval = map(&[("circularity", 0.7), ("eccentricity", 0.6), ("solidity", 0.95)]);
        assert!(!classify(&oval).round);

        let compact = map(&[("solidity", 0.96), ("extent", 0.81), ("num_corners", 6.0)]);
        assert!(classify(&compact).compact);

        let pentagon = map(&[("solidity", 0.96), ("extent", 0.81), ("num_corners", 5.0)]);
        assert!(!classify(&pentagon).compact);
    }

    #[test]
    fn test_long_skeleton_ratio() {
        let thin = map(&[("skeleton_length", 400.0), ("area", 1000.0)]);
        assert!(classify(&thin).long_skeleton);

        let thick = map(&[("skeleton_length", 400.0), ("area", 1200.0)]);
        assert!(!classify(&thick).long_skeleton);

        let short = map(&[("skeleton_length", 300.0), ("area", 10.0)]);
        assert!(!classify(&short).long_skeleton);
    }

    #[test]
    fn test_long_and_rigid_by_form() {
        let bar = map(&[
            ("eccentricity", 0.96),
            ("skeleton_length", 310.0),
            ("aspect_ratio", 4.0),
            ("circularity", 0.1),
            ("solidity", 0.9),
            ("extent", 0.9),
            ("num_defects", 1.0),
        ]);

        let attributes = classify(&bar);
        assert!(attributes.long);
        assert!(attributes.rigid);
        assert!(attributes.manmade);
        assert!(attributes.fractured);
        assert!(attributes.long_skeleton);
        assert!(!attributes.round);
        assert!(!attributes.compact);

        // Eccentricity is too low for the elongated branch of rigid
        let loose = map(&[
            ("eccentricity", 0.96),
            ("skeleton_length", 310.0),
            ("aspect_ratio", 4.0),
            ("circularity", 0.1),
            ("solidity", 0.9),
            ("extent", 0.9),
            ("num_defects", 3.0),
        ]);

        let attributes = classify(&loose);
        assert!(attributes.long);
        assert!(!attributes.rigid);
    }

    #[test]
    fn test_rigid_reads_long() {
        let elongated = map(&[
            ("eccentricity", 0.99),
            ("aspect_ratio", 4.0),
            ("circularity", 0.1),
            ("skeleton_length", 301.0),
            ("num_defects", 8.0),
        ]);

        let attributes = classify(&elongated);
        assert!(attributes.long);
        assert!(attributes.rigid);

        let wide = map(&[
            ("eccentricity", 0.99),
            ("aspect_ratio", 4.0),
            ("circularity", 0.5),
            ("skeleton_length", 301.0),
            ("num_defects", 8.0),
        ]);

        let attributes = classify(&wide);
        assert!(!attributes.long);
        assert!(!attributes.rigid);
    }

    #[test]
    fn test_idempotent_across_sources() {
        let square = [[0, 0], [0, 40], [40, 40], [40, 0]];
        let features = describe(&square, None);

        let first = classify(&features);
        let second = classify(&features);
        assert_eq!(first, second);

        let json = serde_json::to_value(features).unwrap();
        assert_eq!(classify(json.as_object().unwrap()), first);

        let tree: BTreeMap<&str, f64> = features
            .entries()
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect();
        assert_eq!(classify(&tree), first);
    }

    #[test]
    fn test_active_names() {
        let attributes = AttributeMap {
            long: true,
            rigid: true,
            ..Default::default()
        };

        assert_eq!(attributes.active(), vec!["long", "rigid"]);
        assert_eq!(Attribute::LongSkeleton.to_string(), "long_skeleton");
    }
}
