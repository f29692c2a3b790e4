//! Shared test fixtures: in-memory databases, HTML builders, and an
//! in-memory spreadsheet client. Used by unit tests and the integration
//! suite under `tests/`.

pub mod fixtures {
    use sqlx::SqlitePool;

    /// Creates an in-memory SQLite database with migrations applied
    pub async fn setup_test_db() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        sqlx::migrate!()
            .run(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    /// A small, well-formed page with one H1 and the given body content
    pub fn basic_html_page(title: &str, h1: &str, body: &str) -> String {
        format!(
            r#"<html>
                <head><title>{}</title></head>
                <body>
                    <div class="entry">
                        <h1>{}</h1>
                        <h2>Details</h2>
                        <p>{}</p>
                        <p>Second paragraph to qualify the container.</p>
                        <p>Third paragraph to qualify the container.</p>
                    </div>
                </body>
            </html>"#,
            title, h1, body
        )
    }
}

pub mod mock_sheet {
    //! In-memory `SpreadsheetClient` with failure injection.

    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::sync::{SheetError, SpreadsheetClient};

    #[derive(Default)]
    pub struct MockSheetClient {
        rows: Mutex<Vec<Vec<String>>>,
        sheet_id: Mutex<Option<i64>>,
        append_failures: Mutex<Option<(u32, SheetError)>>,
        calls: AtomicUsize,
        appends: AtomicU32,
    }

    impl MockSheetClient {
        pub fn new() -> Self {
            Self {
                sheet_id: Mutex::new(Some(0)),
                ..Default::default()
            }
        }

        pub fn seed_rows(&self, rows: Vec<Vec<String>>) {
            *self.rows.lock().unwrap() = rows;
        }

        pub fn rows(&self) -> Vec<Vec<String>> {
            self.rows.lock().unwrap().clone()
        }

        pub fn set_sheet_id(&self, id: Option<i64>) {
            *self.sheet_id.lock().unwrap() = id;
        }

        /// Make the next `count` append calls fail with the given error.
        pub fn fail_appends(&self, count: u32, error: SheetError) {
            *self.append_failures.lock().unwrap() = Some((count, error));
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn append_calls(&self) -> u32 {
            self.appends.load(Ordering::SeqCst)
        }

        fn record_call(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn column_index(letter: &str) -> usize {
            letter
                .chars()
                .fold(0usize, |acc, c| acc * 26 + (c as usize - 'A' as usize + 1))
        }

        /// Parse "Tab!A3:E3"-style bounds into a 1-based row index.
        fn row_of_range(range: &str) -> Option<usize> {
            let bounds = range.split('!').nth(1)?;
            let start = bounds.split(':').next()?;
            let digits: String = start.chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
    }

    #[async_trait]
    impl SpreadsheetClient for MockSheetClient {
        async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
            self.record_call();
            let rows = self.rows.lock().unwrap();
            let bounds = range
                .split('!')
                .nth(1)
                .ok_or_else(|| SheetError::BadRequest(format!("range: {}", range)))?;
            let start = bounds.split(':').next().unwrap_or("");

            if start.chars().all(|c| c.is_ascii_digit()) {
                // Row read, e.g. "1:1"
                let index: usize = start
                    .parse()
                    .map_err(|_| SheetError::BadRequest(format!("range: {}", range)))?;
                return Ok(rows
                    .get(index.saturating_sub(1))
                    .map(|r| vec![r.clone()])
                    .unwrap_or_default());
            }

            // Column read, e.g. "B:B"
            let column = Self::column_index(start);
            Ok(rows
                .iter()
                .map(|r| vec![r.get(column - 1).cloned().unwrap_or_default()])
                .collect())
        }

        async fn batch_update(
            &self,
            data: &[(String, Vec<Vec<String>>)],
        ) -> Result<(), SheetError> {
            self.record_call();
            let mut rows = self.rows.lock().unwrap();
            for (range, values) in data {
                let index = Self::row_of_range(range)
                    .ok_or_else(|| SheetError::BadRequest(format!("range: {}", range)))?;
                if let (Some(slot), Some(row)) = (rows.get_mut(index - 1), values.first()) {
                    *slot = row.clone();
                }
            }
            Ok(())
        }

        async fn append(&self, _range: &str, new_rows: &[Vec<String>]) -> Result<(), SheetError> {
            self.record_call();
            self.appends.fetch_add(1, Ordering::SeqCst);

            let mut failures = self.append_failures.lock().unwrap();
            if let Some((remaining, error)) = failures.as_mut() {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(error.clone());
                }
            }
            drop(failures);

            self.rows.lock().unwrap().extend(new_rows.iter().cloned());
            Ok(())
        }

        async fn batch_delete_rows(
            &self,
            _sheet_id: i64,
            row_indices: &[usize],
        ) -> Result<(), SheetError> {
            self.record_call();
            let mut rows = self.rows.lock().unwrap();
            for index in row_indices {
                if *index >= 1 && *index <= rows.len() {
                    rows.remove(index - 1);
                }
            }
            Ok(())
        }

        async fn batch_clear(&self, ranges: &[String]) -> Result<(), SheetError> {
            self.record_call();
            let mut rows = self.rows.lock().unwrap();
            for range in ranges {
                if let Some(index) = Self::row_of_range(range) {
                    if let Some(row) = rows.get_mut(index - 1) {
                        for cell in row.iter_mut() {
                            cell.clear();
                        }
                    }
                }
            }
            Ok(())
        }

        async fn resolve_sheet_id(&self, _tab: &str) -> Result<Option<i64>, SheetError> {
            self.record_call();
            Ok(*self.sheet_id.lock().unwrap())
        }
    }
}
