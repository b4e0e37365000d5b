// Survey file parsing (CSV / JSON)
use crate::model::{CustomerResponse, ParserError};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

pub trait Parser {
    fn parse(&self, input: &str) -> Result<Vec<CustomerResponse>, ParserError>;
}

/// Reads `id,too_cheap,bargain,expensive,too_expensive` rows with a header line.
#[derive(Debug, Default)]
pub struct CsvResponseParser;

/// Reads a JSON array of response objects.
#[derive(Debug, Default)]
pub struct JsonResponseParser;

impl CsvResponseParser {
    pub fn new() -> Self {
        Self
    }
}

impl JsonResponseParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for CsvResponseParser {
    fn parse(&self, input: &str) -> Result<Vec<CustomerResponse>, ParserError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(input.as_bytes());

        let responses = reader
            .deserialize::<CustomerResponse>()
            .collect::<Result<Vec<_>, _>>()?;
        check_rows(responses)
    }
}

impl Parser for JsonResponseParser {
    fn parse(&self, input: &str) -> Result<Vec<CustomerResponse>, ParserError> {
        let responses: Vec<CustomerResponse> = serde_json::from_str(input)?;
        check_rows(responses)
    }
}

/// Structural checks only. Price ordering is left to the validator.
fn check_rows(mut responses: Vec<CustomerResponse>) -> Result<Vec<CustomerResponse>, ParserError> {
    if responses.is_empty() {
        return Err(ParserError::Empty);
    }

    let mut seen = HashSet::new();
    for response in responses.iter_mut() {
        response.id = response.id.trim().to_string();
        if response.id.is_empty() {
            return Err(ParserError::MissingField("id".into()));
        }
        if !seen.insert(response.id.clone()) {
            return Err(ParserError::DuplicateId(response.id.clone()));
        }
    }
    Ok(responses)
}

/// Picks a parser from the file extension.
pub fn parser_for_path(path: &Path) -> Result<Box<dyn Parser>, ParserError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => Ok(Box::new(CsvResponseParser::new())),
        "json" => Ok(Box::new(JsonResponseParser::new())),
        _ => Err(ParserError::UnsupportedFormat(path.display().to_string())),
    }
}

pub fn load_responses(path: impl AsRef<Path>) -> Result<Vec<CustomerResponse>, ParserError> {
    let path = path.as_ref();
    let parser = parser_for_path(path)?;
    let content = fs::read_to_string(path)?;
    let responses = parser.parse(&content)?;
    info!("Imported {} responses from {}", responses.len(), path.display());
    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_snake_case_csv() {
        let input = "id,too_cheap,bargain,expensive,too_expensive\n\
                     a, 50, 100, 200, 300\n\
                     b,60,120,220,350\n";
        let rows = CsvResponseParser::new().parse(input).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], CustomerResponse::new("a", 50.0, 100.0, 200.0, 300.0));
    }

    #[test]
    fn parses_camel_case_csv() {
        let input = "id,tooCheap,bargain,expensive,tooExpensive\nx,1.5,2,3,4\n";
        let rows = CsvResponseParser::new().parse(input).unwrap();
        assert_eq!(rows[0].too_cheap, 1.5);
    }

    #[test]
    fn keeps_unordered_rows_for_the_validator() {
        let input = "id,too_cheap,bargain,expensive,too_expensive\nbad,10,5,20,30\n";
        let rows = CsvResponseParser::new().parse(input).unwrap();
        assert_eq!(rows[0].bargain, 5.0);
    }

    #[test]
    fn rejects_non_numeric_csv() {
        let input = "id,too_cheap,bargain,expensive,too_expensive\na,cheap,2,3,4\n";
        assert!(matches!(CsvResponseParser::new().parse(input), Err(ParserError::Csv(_))));
    }

    #[test]
    fn rejects_blank_and_duplicate_ids() {
        let blank = "id,too_cheap,bargain,expensive,too_expensive\n ,1,2,3,4\n";
        assert!(matches!(CsvResponseParser::new().parse(blank), Err(ParserError::MissingField(f)) if f == "id"));

        let dup = r#"[
            {"id": "a", "tooCheap": 1, "bargain": 2, "expensive": 3, "tooExpensive": 4},
            {"id": "a", "tooCheap": 1, "bargain": 2, "expensive": 3, "tooExpensive": 4}
        ]"#;
        assert!(matches!(JsonResponseParser::new().parse(dup), Err(ParserError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn parses_json_with_either_key_style() {
        let input = r#"[
            {"id": "a", "tooCheap": 1, "bargain": 2, "expensive": 3, "tooExpensive": 4},
            {"id": "b", "too_cheap": 2, "bargain": 3, "expensive": 4, "too_expensive": 5}
        ]"#;
        let rows = JsonResponseParser::new().parse(input).unwrap();
        assert_eq!(rows[1], CustomerResponse::new("b", 2.0, 3.0, 4.0, 5.0));
    }

    #[test]
    fn rejects_empty_and_malformed_json() {
        assert!(matches!(JsonResponseParser::new().parse("[]"), Err(ParserError::Empty)));
        assert!(matches!(JsonResponseParser::new().parse("{oops"), Err(ParserError::Json(_))));
    }

    #[test]
    fn loads_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,too_cheap,bargain,expensive,too_expensive").unwrap();
        writeln!(file, "r1,1,2,3,4").unwrap();
        let rows = load_responses(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn default_parsers_match_new() {
        let input = "id,too_cheap,bargain,expensive,too_expensive\nr1,1,2,3,4\n";
        assert_eq!(
            CsvResponseParser::default().parse(input).unwrap(),
            CsvResponseParser::new().parse(input).unwrap()
        );
        assert!(matches!(JsonResponseParser::default().parse("[]"), Err(ParserError::Empty)));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        assert!(matches!(
            parser_for_path(Path::new("survey.xlsx")),
            Err(ParserError::UnsupportedFormat(_))
        ));
    }
}
