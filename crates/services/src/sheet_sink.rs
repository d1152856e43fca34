use async_trait::async_trait;
use quiz_core::model::RunRecord;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use storage::repository::{RunResultSink, StorageError};

use crate::config::SheetConfig;
use crate::error::SheetError;

/// Appends run rows to a remote spreadsheet endpoint as JSON.
///
/// The endpoint answers with the index of the appended row.
#[derive(Clone)]
pub struct RemoteSheetSink {
    client: Client,
    config: SheetConfig,
}

impl RemoteSheetSink {
    #[must_use]
    pub fn new(config: SheetConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// POST one row.
    ///
    /// # Errors
    ///
    /// Returns `SheetError` if the request fails or the endpoint rejects it.
    pub async fn append(&self, record: &RunRecord) -> Result<i64, SheetError> {
        let mut request = self.client.post(&self.config.url).json(&AppendRequest {
            values: vec![SheetRow::from(record)],
        });
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SheetError::HttpStatus(response.status()));
        }
        let body: AppendResponse = response.json().await?;
        Ok(body.row)
    }
}

#[async_trait]
impl RunResultSink for RemoteSheetSink {
    async fn append_run(&self, record: &RunRecord) -> Result<i64, StorageError> {
        let row = self.append(record).await?;
        tracing::debug!(row, url = %self.config.url, "appended run to results sheet");
        Ok(row)
    }
}

#[derive(Debug, Serialize)]
struct AppendRequest<'a> {
    values: Vec<SheetRow<'a>>,
}

/// Column order of the results sheet.
#[derive(Debug, Serialize)]
struct SheetRow<'a>(
    String,
    u32,
    u32,
    u64,
    f64,
    f64,
    u32,
    &'a str,
    &'a str,
    &'a str,
);

impl<'a> From<&'a RunRecord> for SheetRow<'a> {
    fn from(r: &'a RunRecord) -> Self {
        Self(
            r.date.format("%Y-%m-%d").to_string(),
            r.score,
            r.total,
            r.duration_seconds,
            r.accuracy,
            r.smoothed_accuracy,
            r.max_streak,
            &r.run_tags,
            &r.missed_ids,
            &r.missed_tags,
        )
    }
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    row: i64,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn record() -> RunRecord {
        RunRecord {
            date: NaiveDate::from_ymd_opt(2024, 2, 9).unwrap(),
            score: 3,
            total: 4,
            duration_seconds: 75,
            accuracy: 0.75,
            smoothed_accuracy: 4.0 / 6.0,
            max_streak: 2,
            run_tags: "GEN; PCP".into(),
            missed_ids: "7".into(),
            missed_tags: "GEN".into(),
        }
    }

    fn sink(server: &MockServer, token: Option<&str>) -> RemoteSheetSink {
        RemoteSheetSink::new(SheetConfig {
            url: format!("{}/append", server.uri()),
            token: token.map(String::from),
        })
    }

    #[test]
    fn rows_serialize_in_sheet_column_order() {
        let record = record();
        let body = serde_json::to_value(AppendRequest {
            values: vec![SheetRow::from(&record)],
        })
        .unwrap();

        let row = body["values"][0].as_array().unwrap();
        assert_eq!(row.len(), 10);
        assert_eq!(row[0], "2024-02-09");
        assert_eq!(row[1], 3);
        assert_eq!(row[3], 75);
        assert_eq!(row[7], "GEN; PCP");
        assert_eq!(row[9], "GEN");
    }

    #[tokio::test]
    async fn successful_append_returns_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/append"))
            .and(header("authorization", "Bearer sheet-token"))
            .and(body_partial_json(serde_json::json!({
                "values": [["2024-02-09", 3, 4, 75, 0.75, 4.0 / 6.0, 2, "GEN; PCP", "7", "GEN"]]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"row": 41})))
            .expect(1)
            .mount(&server)
            .await;

        let row = sink(&server, Some("sheet-token"))
            .append_run(&record())
            .await
            .unwrap();
        assert_eq!(row, 41);
    }

    #[tokio::test]
    async fn rejected_append_is_a_storage_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/append"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let sink = sink(&server, None);
        let err = sink.append(&record()).await.unwrap_err();
        assert!(matches!(err, SheetError::HttpStatus(status) if status.as_u16() == 403));

        let err = sink.append_run(&record()).await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
    }
}
