//! Static classification table and output field definitions.
//!
//! The classification rules map a normalized statistic label (and, for test
//! breakdowns, the row's metric) onto a [`StatisticCode`]. The rules are an
//! immutable ordered list evaluated top-to-bottom, so extending the schema
//! never touches the parsing logic.

use crate::statistic::StatisticCode;

/// Type tag for an attribute field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Character,
}

/// Definition of one attribute-table field.
///
/// Order of field definitions is significant: values appended to a record
/// must follow exactly this order or the attribute table becomes misaligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name, at most 10 bytes.
    pub name: String,
    pub kind: FieldKind,
    /// Total field width in bytes.
    pub width: u8,
    /// Digits after the decimal point (numeric fields only).
    pub decimals: u8,
}

impl FieldDef {
    pub fn numeric(name: &str, width: u8, decimals: u8) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Numeric,
            width,
            decimals,
        }
    }
}

/// The ordered field definitions appended to every output dataset.
///
/// One field per [`StatisticCode`], in [`StatisticCode::ALL`] order.
pub fn report_field_defs() -> Vec<FieldDef> {
    StatisticCode::ALL
        .iter()
        .map(|code| {
            let (width, decimals) = match code {
                StatisticCode::CaseCount => (10, 0),
                StatisticCode::TotalTests => (20, 0),
                StatisticCode::Serology => (7, 2),
                StatisticCode::Pcr => (7, 2),
                StatisticCode::CaseRatePer100k => (7, 2),
                StatisticCode::Deaths => (7, 0),
                StatisticCode::TestRate => (7, 2),
            };
            FieldDef::numeric(code.field_name(), width, decimals)
        })
        .collect()
}

/// Outcome of classifying one report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Code(StatisticCode),
    /// The label matched no rule; the row should be skipped and reported so
    /// the schema can be extended.
    UnknownLabel(String),
    /// A test-breakdown row carried an unrecognized test type.
    UnknownTestType(String),
}

/// How a matched label resolves to a code.
enum Rule {
    Direct(StatisticCode),
    /// "COVID-19 Tests Performed" rows break down by the metric column.
    TestBreakdown,
}

/// Label rules, evaluated top-to-bottom against the normalized label.
const RULES: &[(&str, Rule)] = &[
    ("Case Counts", Rule::Direct(StatisticCode::CaseCount)),
    ("COVID-19 Tests Performed", Rule::TestBreakdown),
    ("Case Rates", Rule::Direct(StatisticCode::CaseRatePer100k)),
    ("Number of Deaths", Rule::Direct(StatisticCode::Deaths)),
    ("Testing Rate", Rule::Direct(StatisticCode::TestRate)),
];

/// Classify a normalized statistic label, using `metric` for breakdown rows.
pub fn classify(label: &str, metric: &str) -> Classification {
    for (pattern, rule) in RULES {
        if *pattern != label {
            continue;
        }
        return match rule {
            Rule::Direct(code) => Classification::Code(*code),
            Rule::TestBreakdown => classify_test_metric(metric),
        };
    }
    Classification::UnknownLabel(label.to_string())
}

fn classify_test_metric(metric: &str) -> Classification {
    if metric == "Total Tests Performed" {
        Classification::Code(StatisticCode::TotalTests)
    } else if metric.contains("Serology") {
        Classification::Code(StatisticCode::Serology)
    } else if metric.contains("PCR") {
        Classification::Code(StatisticCode::Pcr)
    } else {
        Classification::UnknownTestType(metric.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_labels_classify() {
        assert_eq!(
            classify("Case Counts", ""),
            Classification::Code(StatisticCode::CaseCount)
        );
        assert_eq!(
            classify("Case Rates", ""),
            Classification::Code(StatisticCode::CaseRatePer100k)
        );
        assert_eq!(
            classify("Number of Deaths", ""),
            Classification::Code(StatisticCode::Deaths)
        );
        assert_eq!(
            classify("Testing Rate", ""),
            Classification::Code(StatisticCode::TestRate)
        );
    }

    #[test]
    fn test_rows_dispatch_on_metric() {
        assert_eq!(
            classify("COVID-19 Tests Performed", "Total Tests Performed"),
            Classification::Code(StatisticCode::TotalTests)
        );
        assert_eq!(
            classify("COVID-19 Tests Performed", "Cumulative Serology Tests"),
            Classification::Code(StatisticCode::Serology)
        );
        assert_eq!(
            classify("COVID-19 Tests Performed", "Cumulative PCR Tests"),
            Classification::Code(StatisticCode::Pcr)
        );
    }

    #[test]
    fn unknown_test_type_is_reported() {
        assert_eq!(
            classify("COVID-19 Tests Performed", "Antigen"),
            Classification::UnknownTestType("Antigen".to_string())
        );
    }

    #[test]
    fn unknown_label_is_reported() {
        assert_eq!(
            classify("Hospitalizations", ""),
            Classification::UnknownLabel("Hospitalizations".to_string())
        );
    }

    #[test]
    fn field_defs_follow_code_order() {
        let defs = report_field_defs();
        assert_eq!(defs.len(), StatisticCode::ALL.len());
        for (def, code) in defs.iter().zip(StatisticCode::ALL.iter()) {
            assert_eq!(def.name, code.field_name());
            assert_eq!(def.kind, FieldKind::Numeric);
        }
        assert_eq!(defs[0].width, 10);
        assert_eq!(defs[1].width, 20);
        assert_eq!(defs[2].decimals, 2);
    }
}
