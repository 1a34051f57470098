//! Reqwest-backed adapter for the Google Sheets v4 values API.
//!
//! This adapter owns transport details only: URL construction, bearer
//! authentication, HTTP error mapping and cell decoding. It never retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{BatchUpdateDto, ValueRangeDto, ValuesBodyDto};
use crate::domain::ports::{SheetClientError, SheetRange, SheetRangeClient, SheetTable};
use crate::outbound::http_support::status_message;

/// Which call a failed response belongs to; refines 400 mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call<'a> {
    Values { range: &'a str },
    DeleteRow { index: usize },
}

/// Spreadsheet adapter issuing authenticated REST calls against one API root.
pub struct SheetsHttpClient {
    client: Client,
    base_url: Url,
    access_token: Zeroizing<String>,
}

impl SheetsHttpClient {
    /// Build an adapter with an explicit request timeout.
    ///
    /// `base_url` is the API root, for example
    /// `https://sheets.googleapis.com/v4/`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        access_token: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            access_token,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, SheetClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                SheetClientError::invalid_range(format!(
                    "API root {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(self.access_token.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        call: Call<'_>,
    ) -> Result<Vec<u8>, SheetClientError> {
        let response = self
            .authorised(request)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), call));
        }
        Ok(body.to_vec())
    }
}

fn values_url_segments<'a>(table: &'a SheetTable, range: &'a str) -> [&'a str; 4] {
    ["spreadsheets", table.spreadsheet_id.as_str(), "values", range]
}

#[async_trait]
impl SheetRangeClient for SheetsHttpClient {
    async fn read(&self, range: &SheetRange) -> Result<Vec<Vec<String>>, SheetClientError> {
        let a1 = range.a1();
        let mut url = self.url(&values_url_segments(range.table(), &a1))?;
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");

        let body = self
            .execute(self.client.get(url), Call::Values { range: &a1 })
            .await?;
        let decoded: ValueRangeDto = serde_json::from_slice(&body).map_err(|error| {
            SheetClientError::decode(format!("invalid value range payload: {error}"))
        })?;
        let rows = decoded.into_rows();
        debug!(range = %a1, rows = rows.len(), "read sheet range");
        Ok(rows)
    }

    async fn append(&self, range: &SheetRange, row: Vec<String>) -> Result<(), SheetClientError> {
        let a1 = range.a1();
        let target = format!("{a1}:append");
        let mut url = self.url(&values_url_segments(range.table(), &target))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let body = ValuesBodyDto {
            range: &a1,
            major_dimension: "ROWS",
            values: [&row],
        };

        self.execute(self.client.post(url).json(&body), Call::Values { range: &a1 })
            .await?;
        Ok(())
    }

    async fn update(&self, range: &SheetRange, row: Vec<String>) -> Result<(), SheetClientError> {
        let a1 = range.a1();
        if range.row_index().is_none() {
            return Err(SheetClientError::invalid_range(a1));
        }
        let mut url = self.url(&values_url_segments(range.table(), &a1))?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = ValuesBodyDto {
            range: &a1,
            major_dimension: "ROWS",
            values: [&row],
        };

        self.execute(self.client.put(url).json(&body), Call::Values { range: &a1 })
            .await?;
        Ok(())
    }

    async fn delete_row(
        &self,
        table: &SheetTable,
        row_index: usize,
    ) -> Result<(), SheetClientError> {
        let target = format!("{}:batchUpdate", table.spreadsheet_id);
        let url = self.url(&["spreadsheets", &target])?;
        let body = BatchUpdateDto::delete_row(table.sheet_id, row_index);

        self.execute(
            self.client.post(url).json(&body),
            Call::DeleteRow { index: row_index },
        )
        .await?;
        Ok(())
    }
}

fn map_transport_error(error: reqwest::Error) -> SheetClientError {
    if error.is_timeout() {
        SheetClientError::timeout(error.to_string())
    } else {
        SheetClientError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8], call: Call<'_>) -> SheetClientError {
    let message = status_message(status, body);
    match (status, call) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => {
            SheetClientError::unauthorized(message)
        }
        (StatusCode::TOO_MANY_REQUESTS, _) => SheetClientError::rate_limited(message),
        (StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT, _) => {
            SheetClientError::timeout(message)
        }
        (StatusCode::BAD_REQUEST, Call::DeleteRow { index }) => {
            SheetClientError::row_out_of_bounds(index)
        }
        (StatusCode::BAD_REQUEST, Call::Values { range })
            if message.contains("Unable to parse range") =>
        {
            SheetClientError::invalid_range(range)
        }
        _ if status.is_client_error() => SheetClientError::rejected(message),
        _ => SheetClientError::transport(message),
    }
}
