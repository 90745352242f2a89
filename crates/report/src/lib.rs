pub mod console;
pub mod csv;
pub mod json;
pub mod sink;

pub use console::{ConsoleSummary, FULLY_RECONCILED_MESSAGE};
pub use self::csv::CsvReportWriter;
pub use json::JsonReportWriter;
pub use sink::{write_report_file, ReportError, ReportFormat, ReportSink};
