pub mod cache;
pub mod error;
pub mod merge;

pub use cache::{BaseShapeCache, BaseShapeRecord};
pub use error::{CoreError, Result};
pub use merge::merge_report;
