use std::fmt;

/// The closed set of per-county statistics extracted from a report.
///
/// The set is fixed at build time; a new statistic in the published reports
/// requires adding a variant here and a rule in [`crate::schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatisticCode {
    /// Cumulative confirmed case count.
    CaseCount,
    /// Total COVID-19 tests performed.
    TotalTests,
    /// Serology tests performed.
    Serology,
    /// PCR tests performed.
    Pcr,
    /// Case rate per 100,000 people.
    CaseRatePer100k,
    /// Number of deaths.
    Deaths,
    /// Testing rate.
    TestRate,
}

impl StatisticCode {
    /// All codes in canonical order.
    ///
    /// This order drives the appended field definitions and the value append
    /// order during merge; the two must never diverge.
    pub const ALL: [StatisticCode; 7] = [
        StatisticCode::CaseCount,
        StatisticCode::TotalTests,
        StatisticCode::Serology,
        StatisticCode::Pcr,
        StatisticCode::CaseRatePer100k,
        StatisticCode::Deaths,
        StatisticCode::TestRate,
    ];

    /// The attribute-table field name for this code (DBF limit: 10 bytes).
    pub fn field_name(&self) -> &'static str {
        match self {
            StatisticCode::CaseCount => "CASECOUNT",
            StatisticCode::TotalTests => "TOTALTESTS",
            StatisticCode::Serology => "SEROLOGY",
            StatisticCode::Pcr => "PCR",
            StatisticCode::CaseRatePer100k => "CASEPER100",
            StatisticCode::Deaths => "DEATHS",
            StatisticCode::TestRate => "TESTRATE",
        }
    }
}

impl fmt::Display for StatisticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}
