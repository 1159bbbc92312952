//! Per-report region statistics.

use std::collections::BTreeMap;

use crate::statistic::StatisticCode;

/// A reported statistic value: a finite number, or explicitly absent.
///
/// Absent is distinct from zero. A county with no reported value for a
/// statistic carries the absent marker into the output attribute table,
/// never a substituted zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Value(f64),
    Absent,
}

impl StatValue {
    /// Build from a parsed number, mapping non-finite values to absent so a
    /// NaN can never reach the dataset writer.
    pub fn from_parsed(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => StatValue::Value(v),
            _ => StatValue::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, StatValue::Absent)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            StatValue::Value(v) => Some(*v),
            StatValue::Absent => None,
        }
    }
}

/// Statistics extracted from one report, keyed by canonical region name.
///
/// Built fresh per report file, never merged across files. Keys are folded to
/// uppercase at insert so parser output and the base geometry index share one
/// canonical form.
#[derive(Debug, Default, Clone)]
pub struct RegionStats {
    regions: BTreeMap<String, BTreeMap<StatisticCode, StatValue>>,
}

impl RegionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one statistic for a region. Last write wins when the same
    /// (region, code) pair appears twice in a report; that is an accepted
    /// idiosyncrasy of the published data, not an error.
    pub fn insert(&mut self, region: &str, code: StatisticCode, value: StatValue) {
        self.regions
            .entry(region.trim().to_uppercase())
            .or_default()
            .insert(code, value);
    }

    pub fn get(&self, region: &str, code: StatisticCode) -> Option<StatValue> {
        self.regions.get(region).and_then(|m| m.get(&code)).copied()
    }

    /// The region keys present in this report, in sorted order.
    pub fn region_keys(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn contains_region(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_folds_region_to_uppercase() {
        let mut stats = RegionStats::new();
        stats.insert("Denver", StatisticCode::CaseCount, StatValue::Value(100.0));
        assert_eq!(
            stats.get("DENVER", StatisticCode::CaseCount),
            Some(StatValue::Value(100.0))
        );
    }

    #[test]
    fn last_write_wins_on_duplicate_rows() {
        let mut stats = RegionStats::new();
        stats.insert("Denver", StatisticCode::CaseCount, StatValue::Value(10.0));
        stats.insert("DENVER", StatisticCode::CaseCount, StatValue::Value(20.0));
        assert_eq!(
            stats.get("DENVER", StatisticCode::CaseCount),
            Some(StatValue::Value(20.0))
        );
        assert_eq!(stats.region_count(), 1);
    }

    #[test]
    fn non_finite_values_become_absent() {
        assert!(StatValue::from_parsed(Some(f64::NAN)).is_absent());
        assert!(StatValue::from_parsed(Some(f64::INFINITY)).is_absent());
        assert!(StatValue::from_parsed(None).is_absent());
        assert_eq!(StatValue::from_parsed(Some(3.5)).value(), Some(3.5));
    }

    #[test]
    fn zero_is_not_absent() {
        let v = StatValue::from_parsed(Some(0.0));
        assert!(!v.is_absent());
        assert_eq!(v.value(), Some(0.0));
    }
}
