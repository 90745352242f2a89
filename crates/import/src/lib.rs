pub mod csv;
pub mod demo;
pub mod hash;

pub use self::csv::{load_rows, read_rows, ColumnMapping, ImportError, SourceProfile};
pub use demo::{write_demo_inputs, DemoInputs};
pub use hash::{sha256_file, to_hex, SourceFingerprint};
