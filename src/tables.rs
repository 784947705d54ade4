/// Fixed lookup tables for chart derivation
///
/// The sign catalog and the element/modality partitions are validated once
/// when a `ChartTables` value is built and are then passed explicitly to
/// the components that need them.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ChartError, Result};
use crate::utils::config::SIGN_COUNT;

/// One of the twelve 30° zodiac signs, in ecliptic order from 0°
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    /// All signs in catalog order (Aries = 0 … Pisces = 11)
    pub const ALL: [Sign; SIGN_COUNT] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    pub fn from_index(index: usize) -> Option<Sign> {
        Sign::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classical element of a sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];
}

/// Modality (quality) of a sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Cardinal, Modality::Fixed, Modality::Mutable];
}

/// Validated sign → element and sign → modality lookups
#[derive(Debug, Clone)]
pub struct ChartTables {
    element_of: [Element; SIGN_COUNT],
    modality_of: [Modality; SIGN_COUNT],
}

/// Standard tables, validated on first use
pub static STANDARD_TABLES: Lazy<ChartTables> = Lazy::new(|| {
    ChartTables::standard().expect("built-in element/modality tables must partition the zodiac")
});

impl ChartTables {
    /// Build tables from category → member lists
    ///
    /// # Arguments
    /// * `elements` - Each element with the signs it rules; must be 4 groups of 3
    /// * `modalities` - Each modality with its signs; must be 3 groups of 4
    ///
    /// # Errors
    /// Returns `ChartError::InvalidPartitionTable` when either table is not a
    /// complete, non-overlapping partition of the 12 signs with the
    /// expected group sizes
    pub fn new(
        elements: &[(Element, Vec<Sign>)],
        modalities: &[(Modality, Vec<Sign>)],
    ) -> Result<Self> {
        let element_of = build_partition("element", elements, &Element::ALL, 3)?;
        let modality_of = build_partition("modality", modalities, &Modality::ALL, 4)?;
        Ok(ChartTables {
            element_of,
            modality_of,
        })
    }

    /// The traditional triplicities and quadruplicities
    pub fn standard() -> Result<Self> {
        use Sign::*;
        Self::new(
            &[
                (Element::Fire, vec![Aries, Leo, Sagittarius]),
                (Element::Earth, vec![Taurus, Virgo, Capricorn]),
                (Element::Air, vec![Gemini, Libra, Aquarius]),
                (Element::Water, vec![Cancer, Scorpio, Pisces]),
            ],
            &[
                (Modality::Cardinal, vec![Aries, Cancer, Libra, Capricorn]),
                (Modality::Fixed, vec![Taurus, Leo, Scorpio, Aquarius]),
                (Modality::Mutable, vec![Gemini, Virgo, Sagittarius, Pisces]),
            ],
        )
    }

    pub fn element(&self, sign: Sign) -> Element {
        self.element_of[sign.index()]
    }

    pub fn modality(&self, sign: Sign) -> Modality {
        self.modality_of[sign.index()]
    }
}

fn build_partition<C>(
    table: &str,
    groups: &[(C, Vec<Sign>)],
    categories: &[C],
    group_size: usize,
) -> Result<[C; SIGN_COUNT]>
where
    C: Copy + PartialEq + fmt::Debug,
{
    if groups.len() != categories.len() {
        return Err(ChartError::InvalidPartitionTable(format!(
            "{table} table has {} groups, expected {}",
            groups.len(),
            categories.len()
        )));
    }

    let mut assigned: [Option<C>; SIGN_COUNT] = [None; SIGN_COUNT];

    for category in categories {
        let matching: Vec<&(C, Vec<Sign>)> =
            groups.iter().filter(|(c, _)| c == category).collect();
        let members = match matching.as_slice() {
            [(_, members)] => members,
            [] => {
                return Err(ChartError::InvalidPartitionTable(format!(
                    "{table} table is missing {category:?}"
                )))
            }
            _ => {
                return Err(ChartError::InvalidPartitionTable(format!(
                    "{table} table lists {category:?} more than once"
                )))
            }
        };

        if members.len() != group_size {
            return Err(ChartError::InvalidPartitionTable(format!(
                "{table} {category:?} has {} signs, expected {group_size}",
                members.len()
            )));
        }

        for sign in members {
            if let Some(previous) = assigned[sign.index()] {
                return Err(ChartError::InvalidPartitionTable(format!(
                    "{sign} assigned to both {previous:?} and {category:?} in {table} table"
                )));
            }
            assigned[sign.index()] = Some(*category);
        }
    }

    let mut result = [categories[0]; SIGN_COUNT];
    for (i, slot) in assigned.iter().enumerate() {
        match slot {
            Some(category) => result[i] = *category,
            None => {
                return Err(ChartError::InvalidPartitionTable(format!(
                    "{} has no {table}",
                    Sign::ALL[i]
                )))
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables_valid() {
        let tables = ChartTables::standard().expect("standard tables");
        assert_eq!(tables.element(Sign::Leo), Element::Fire);
        assert_eq!(tables.element(Sign::Pisces), Element::Water);
        assert_eq!(tables.modality(Sign::Capricorn), Modality::Cardinal);
        assert_eq!(tables.modality(Sign::Aquarius), Modality::Fixed);
        assert_eq!(tables.modality(Sign::Virgo), Modality::Mutable);
    }

    #[test]
    fn test_forced_standard_tables_match_built() {
        let forced = Lazy::force(&STANDARD_TABLES);
        let built = ChartTables::standard().unwrap();
        for sign in Sign::ALL {
            assert_eq!(forced.element(sign), built.element(sign));
            assert_eq!(forced.modality(sign), built.modality(sign));
        }
    }

    #[test]
    fn test_sign_index_roundtrip() {
        for (i, sign) in Sign::ALL.iter().enumerate() {
            assert_eq!(sign.index(), i);
            assert_eq!(Sign::from_index(i), Some(*sign));
        }
        assert_eq!(Sign::from_index(12), None);
    }

    #[test]
    fn test_overlapping_element_rejected() {
        use Sign::*;
        let err = ChartTables::new(
            &[
                (Element::Fire, vec![Aries, Leo, Sagittarius]),
                (Element::Earth, vec![Taurus, Virgo, Aries]),
                (Element::Air, vec![Gemini, Libra, Aquarius]),
                (Element::Water, vec![Cancer, Scorpio, Pisces]),
            ],
            &[
                (Modality::Cardinal, vec![Aries, Cancer, Libra, Capricorn]),
                (Modality::Fixed, vec![Taurus, Leo, Scorpio, Aquarius]),
                (Modality::Mutable, vec![Gemini, Virgo, Sagittarius, Pisces]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::InvalidPartitionTable(_)));
    }

    #[test]
    fn test_short_modality_group_rejected() {
        use Sign::*;
        let err = ChartTables::new(
            &[
                (Element::Fire, vec![Aries, Leo, Sagittarius]),
                (Element::Earth, vec![Taurus, Virgo, Capricorn]),
                (Element::Air, vec![Gemini, Libra, Aquarius]),
                (Element::Water, vec![Cancer, Scorpio, Pisces]),
            ],
            &[
                (Modality::Cardinal, vec![Aries, Cancer, Libra]),
                (Modality::Fixed, vec![Taurus, Leo, Scorpio, Aquarius]),
                (Modality::Mutable, vec![Gemini, Virgo, Sagittarius, Pisces]),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("Cardinal"));
    }

    #[test]
    fn test_missing_category_rejected() {
        use Sign::*;
        let err = ChartTables::new(
            &[
                (Element::Fire, vec![Aries, Leo, Sagittarius]),
                (Element::Fire, vec![Taurus, Virgo, Capricorn]),
                (Element::Air, vec![Gemini, Libra, Aquarius]),
                (Element::Water, vec![Cancer, Scorpio, Pisces]),
            ],
            &[
                (Modality::Cardinal, vec![Aries, Cancer, Libra, Capricorn]),
                (Modality::Fixed, vec![Taurus, Leo, Scorpio, Aquarius]),
                (Modality::Mutable, vec![Gemini, Virgo, Sagittarius, Pisces]),
            ],
        );
        assert!(err.is_err());
    }
}
