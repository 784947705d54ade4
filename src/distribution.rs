/// Element and modality distribution over classified points
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::tables::{ChartTables, Element, Modality, Sign};

/// Counts of points per element and per modality
///
/// Every category is present, including those with a zero count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub elements: BTreeMap<Element, usize>,
    pub modalities: BTreeMap<Modality, usize>,
}

impl Distribution {
    fn empty() -> Self {
        Distribution {
            elements: Element::ALL.iter().map(|e| (*e, 0)).collect(),
            modalities: Modality::ALL.iter().map(|m| (*m, 0)).collect(),
        }
    }

    /// Number of points counted
    pub fn total(&self) -> usize {
        self.elements.values().sum()
    }
}

/// Tally elements and modalities for the signs of the given points
///
/// # Arguments
/// * `placements` - (point name, sign) pairs
/// * `exclude` - Names of points left out of the tallies
/// * `tables` - Validated sign → element/modality tables
pub fn aggregate<'a, I>(
    placements: I,
    exclude: &HashSet<String>,
    tables: &ChartTables,
) -> Distribution
where
    I: IntoIterator<Item = (&'a str, Sign)>,
{
    let mut dist = Distribution::empty();
    for (name, sign) in placements {
        if exclude.contains(name) {
            continue;
        }
        *dist.elements.entry(tables.element(sign)).or_insert(0) += 1;
        *dist.modalities.entry(tables.modality(sign)).or_insert(0) += 1;
    }
    dist
}
