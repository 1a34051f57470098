//! DTOs for the spreadsheet values REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of `values.get`. `values` is absent for empty ranges.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ValueRangeDto {
    #[serde(default)]
    pub(super) values: Vec<Vec<Value>>,
}

impl ValueRangeDto {
    /// Flatten cells to strings. Non-string cells keep their JSON rendering.
    pub(super) fn into_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Body of `values.append` and `values.update`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ValuesBodyDto<'a> {
    pub(super) range: &'a str,
    pub(super) major_dimension: &'static str,
    pub(super) values: [&'a [String]; 1],
}

/// Body of a `batchUpdate` removing one row.
#[derive(Debug, Serialize)]
pub(super) struct BatchUpdateDto {
    pub(super) requests: [DeleteRequestDto; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeleteRequestDto {
    pub(super) delete_dimension: DeleteDimensionDto,
}

#[derive(Debug, Serialize)]
pub(super) struct DeleteDimensionDto {
    pub(super) range: DimensionRangeDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DimensionRangeDto {
    pub(super) sheet_id: u32,
    pub(super) dimension: &'static str,
    pub(super) start_index: usize,
    pub(super) end_index: usize,
}

impl BatchUpdateDto {
    pub(super) fn delete_row(sheet_id: u32, row_index: usize) -> Self {
        Self {
            requests: [DeleteRequestDto {
                delete_dimension: DeleteDimensionDto {
                    range: DimensionRangeDto {
                        sheet_id,
                        dimension: "ROWS",
                        start_index: row_index,
                        end_index: row_index + 1,
                    },
                },
            }],
        }
    }
}
