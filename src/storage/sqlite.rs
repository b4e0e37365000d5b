use crate::model::{AnalysisResult, CustomerResponse, RecommendationOutcome, StorageError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use sha2::{Digest, Sha256};

/// One recorded analysis run, as read back from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSnapshot {
    pub survey: String,
    pub run_at: DateTime<Utc>,
    pub respondents: usize,
    pub opp: Option<f64>,
    pub ipp: Option<f64>,
    pub pmc: Option<f64>,
    pub pme: Option<f64>,
    pub recommended_price: Option<f64>,
    pub range_low: Option<f64>,
    pub range_high: Option<f64>,
    /// Checksum of the response rows this run was computed from.
    pub responses_checksum: Option<String>,
}

/// SHA-256 over ids and exact answer bits, in row order.
pub fn responses_checksum(responses: &[CustomerResponse]) -> String {
    let mut hasher = Sha256::new();
    for r in responses {
        hasher.update((r.id.len() as u64).to_le_bytes());
        hasher.update(r.id.as_bytes());
        for price in r.prices() {
            hasher.update(price.to_bits().to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and creates the tables if needed. `":memory:"` works for tests.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS responses (
                survey TEXT NOT NULL,
                id TEXT NOT NULL,
                position INTEGER NOT NULL,
                too_cheap REAL NOT NULL,
                bargain REAL NOT NULL,
                expensive REAL NOT NULL,
                too_expensive REAL NOT NULL,
                PRIMARY KEY (survey, id)
            );

            CREATE TABLE IF NOT EXISTS analysis_runs (
                survey TEXT NOT NULL,
                run_at TEXT NOT NULL,
                respondents INTEGER NOT NULL,
                opp REAL,
                ipp REAL,
                pmc REAL,
                pme REAL,
                recommended_price REAL,
                range_low REAL,
                range_high REAL
            );
            "
        )?;

        // Databases created before runs carried a checksum
        Self::migrate_add_column_if_missing(&conn, "analysis_runs", "responses_checksum", "TEXT")?;

        Ok(Self { conn })
    }

    fn migrate_add_column_if_missing(
        conn: &Connection,
        table: &str,
        column: &str,
        column_def: &str,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let existing_columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !existing_columns.iter().any(|c| c == column) {
            let alter_sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def);
            conn.execute(&alter_sql, [])?;
        }

        Ok(())
    }

    /// Replaces all stored rows of a survey, keeping their order.
    pub fn save_responses(&mut self, survey: &str, responses: &[CustomerResponse]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        Self::write_responses(&tx, survey, responses)?;
        tx.commit()?;
        Ok(())
    }

    /// Stores the rows and the analysis computed from them in one transaction.
    /// Either both land or neither does.
    pub fn save_run(
        &mut self,
        survey: &str,
        responses: &[CustomerResponse],
        result: &AnalysisResult,
        outcome: &RecommendationOutcome,
    ) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        Self::write_responses(&tx, survey, responses)?;
        Self::write_run(&tx, survey, &responses_checksum(responses), result, outcome)?;
        tx.commit()?;
        Ok(())
    }

    /// True when the latest recorded run was computed from exactly these rows.
    pub fn is_up_to_date(&self, survey: &str, responses: &[CustomerResponse]) -> Result<bool, StorageError> {
        let checksum = responses_checksum(responses);
        Ok(self
            .last_analysis(survey)?
            .and_then(|run| run.responses_checksum)
            .is_some_and(|stored| stored == checksum))
    }

    fn write_responses(conn: &Connection, survey: &str, responses: &[CustomerResponse]) -> Result<(), StorageError> {
        conn.execute("DELETE FROM responses WHERE survey = ?1", params![survey])?;
        let mut stmt = conn.prepare(
            "INSERT INTO responses (survey, id, position, too_cheap, bargain, expensive, too_expensive)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (position, r) in responses.iter().enumerate() {
            stmt.execute(params![
                survey,
                &r.id,
                position as i64,
                r.too_cheap,
                r.bargain,
                r.expensive,
                r.too_expensive,
            ])?;
        }
        Ok(())
    }

    fn write_run(
        conn: &Connection,
        survey: &str,
        checksum: &str,
        result: &AnalysisResult,
        outcome: &RecommendationOutcome,
    ) -> Result<(), StorageError> {
        let points = &result.price_points;
        let rec = outcome.recommendation();
        conn.execute(
            "INSERT INTO analysis_runs (
                survey, run_at, respondents, opp, ipp, pmc, pme,
                recommended_price, range_low, range_high, responses_checksum
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                survey,
                Utc::now().to_rfc3339(),
                result.respondents as i64,
                points.opp,
                points.ipp,
                points.pmc,
                points.pme,
                rec.map(|r| r.recommended_price),
                rec.map(|r| r.range_low),
                rec.map(|r| r.range_high),
                checksum,
            ],
        )?;
        Ok(())
    }

    pub fn load_responses(&self, survey: &str) -> Result<Vec<CustomerResponse>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, too_cheap, bargain, expensive, too_expensive
             FROM responses WHERE survey = ?1 ORDER BY position ASC",
        )?;

        let rows = stmt.query_map(params![survey], |row| {
            Ok(CustomerResponse::new(
                row.get::<_, String>(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })?;

        let mut responses = Vec::new();
        for row in rows {
            responses.push(row?);
        }
        Ok(responses)
    }

    /// Removes a survey's responses and its analysis history.
    pub fn delete_survey(&self, survey: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM responses WHERE survey = ?1", params![survey])?;
        self.conn.execute("DELETE FROM analysis_runs WHERE survey = ?1", params![survey])?;
        Ok(())
    }

    /// Most recent snapshot for a survey, if any run was recorded.
    pub fn last_analysis(&self, survey: &str) -> Result<Option<AnalysisSnapshot>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT survey, run_at, respondents, opp, ipp, pmc, pme, recommended_price, range_low, range_high,
                    responses_checksum
             FROM analysis_runs WHERE survey = ?1 ORDER BY rowid DESC LIMIT 1",
        )?;

        let snapshot = stmt
            .query_row(params![survey], Self::map_snapshot)
            .optional()?;
        Ok(snapshot)
    }

    pub fn analysis_count(&self, survey: &str) -> Result<usize, StorageError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM analysis_runs WHERE survey = ?1",
            params![survey],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn map_snapshot(row: &Row) -> Result<AnalysisSnapshot, rusqlite::Error> {
        let run_at_str: String = row.get(1)?;
        let run_at = DateTime::parse_from_rfc3339(&run_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e)))?;
        let respondents: i64 = row.get(2)?;

        Ok(AnalysisSnapshot {
            survey: row.get(0)?,
            run_at,
            respondents: respondents as usize,
            opp: row.get(3)?,
            ipp: row.get(4)?,
            pmc: row.get(5)?,
            pme: row.get(6)?,
            recommended_price: row.get(7)?,
            range_low: row.get(8)?,
            range_high: row.get(9)?,
            responses_checksum: row.get(10)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Analyzer, AnalyzerImpl};

    fn rows() -> Vec<CustomerResponse> {
        vec![
            CustomerResponse::new("1", 50.0, 100.0, 200.0, 300.0),
            CustomerResponse::new("2", 60.0, 120.0, 220.0, 350.0),
            CustomerResponse::new("3", 40.0, 90.0, 180.0, 280.0),
            CustomerResponse::new("4", 70.0, 130.0, 250.0, 400.0),
            CustomerResponse::new("5", 55.0, 110.0, 210.0, 320.0),
        ]
    }

    fn save_analysed(storage: &mut SqliteStorage, survey: &str, responses: &[CustomerResponse]) {
        let analyzer = AnalyzerImpl::new();
        let result = analyzer.analyze(responses);
        storage
            .save_run(survey, responses, &result, &analyzer.recommend(&result))
            .unwrap();
    }

    #[test]
    fn responses_round_trip_in_order() {
        let mut storage = SqliteStorage::new(":memory:").unwrap();
        let mut input = rows();
        input.reverse();
        storage.save_responses("pilot", &input).unwrap();
        assert_eq!(storage.load_responses("pilot").unwrap(), input);
        assert!(storage.load_responses("other").unwrap().is_empty());
    }

    #[test]
    fn saving_replaces_previous_rows() {
        let mut storage = SqliteStorage::new(":memory:").unwrap();
        storage.save_responses("pilot", &rows()).unwrap();
        storage.save_responses("pilot", &rows()[..2]).unwrap();
        assert_eq!(storage.load_responses("pilot").unwrap().len(), 2);
    }

    #[test]
    fn records_and_reads_latest_analysis() {
        let mut storage = SqliteStorage::new(":memory:").unwrap();
        assert_eq!(storage.last_analysis("pilot").unwrap(), None);

        save_analysed(&mut storage, "pilot", &rows()[..3]);
        save_analysed(&mut storage, "pilot", &rows());

        let last = storage.last_analysis("pilot").unwrap().expect("snapshot");
        assert_eq!(last.respondents, 5);
        assert_eq!(last.opp, Some(40.0));
        assert_eq!(last.pme, Some(130.0));
        assert_eq!(last.recommended_price, Some(40.0));
        assert_eq!((last.range_low, last.range_high), (Some(90.0), Some(130.0)));
        assert_eq!(last.responses_checksum, Some(responses_checksum(&rows())));
        assert_eq!(storage.analysis_count("pilot").unwrap(), 2);
        assert_eq!(storage.load_responses("pilot").unwrap(), rows());
    }

    #[test]
    fn insufficient_runs_store_nulls() {
        let mut storage = SqliteStorage::new(":memory:").unwrap();
        save_analysed(&mut storage, "pilot", &rows()[..4]);

        let last = storage.last_analysis("pilot").unwrap().expect("snapshot");
        assert_eq!(last.respondents, 4);
        assert_eq!(last.opp, None);
        assert_eq!(last.recommended_price, None);
    }

    #[test]
    fn up_to_date_only_for_rows_of_latest_run() {
        let mut storage = SqliteStorage::new(":memory:").unwrap();
        assert!(!storage.is_up_to_date("pilot", &rows()).unwrap());

        save_analysed(&mut storage, "pilot", &rows());
        assert!(storage.is_up_to_date("pilot", &rows()).unwrap());

        let mut edited = rows();
        edited[0].too_cheap = 10.0;
        assert!(!storage.is_up_to_date("pilot", &edited).unwrap());
    }

    #[test]
    fn rows_saved_without_a_run_are_not_up_to_date() {
        let mut storage = SqliteStorage::new(":memory:").unwrap();
        save_analysed(&mut storage, "pilot", &rows());

        // new rows reached the table but their analysis was never recorded
        let mut edited = rows();
        edited[4].too_expensive = 500.0;
        storage.save_responses("pilot", &edited).unwrap();

        assert_eq!(storage.load_responses("pilot").unwrap(), edited);
        assert!(!storage.is_up_to_date("pilot", &edited).unwrap());
    }

    #[test]
    fn checksum_tracks_order_and_values() {
        let mut reordered = rows();
        reordered.swap(0, 1);
        assert_ne!(responses_checksum(&rows()), responses_checksum(&reordered));
        assert_eq!(responses_checksum(&rows()), responses_checksum(&rows()));
    }

    #[test]
    fn delete_survey_clears_everything() {
        let mut storage = SqliteStorage::new(":memory:").unwrap();
        save_analysed(&mut storage, "pilot", &rows());

        storage.delete_survey("pilot").unwrap();
        assert!(storage.load_responses("pilot").unwrap().is_empty());
        assert_eq!(storage.analysis_count("pilot").unwrap(), 0);
    }
}
