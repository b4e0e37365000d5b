// Import boundary: turns exported survey files into response rows.

pub mod response_parser;

pub use response_parser::{load_responses, parser_for_path, CsvResponseParser, JsonResponseParser, Parser};
