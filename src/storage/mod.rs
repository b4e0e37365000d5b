pub mod sqlite;

pub use sqlite::{responses_checksum, AnalysisSnapshot, SqliteStorage};
