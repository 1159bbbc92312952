pub mod discovery;
pub mod error;
pub mod report;

pub use discovery::list_report_files;
pub use error::{IngestError, Result};
pub use report::parse_report;
