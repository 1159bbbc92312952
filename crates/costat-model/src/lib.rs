pub mod schema;
pub mod statistic;
pub mod stats;

pub use schema::{Classification, FieldDef, FieldKind, classify, report_field_defs};
pub use statistic::StatisticCode;
pub use stats::{RegionStats, StatValue};
