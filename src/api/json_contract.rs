use serde::{Deserialize, Serialize};

use crate::core::{ColumnDescriptor, FlatRecord};
use crate::error::{TabularError, TabularResult};
use crate::render::Color;

pub const GRID_PAGE_JSON_SCHEMA_V1: u32 = 1;
pub const CHART_JSON_SCHEMA_V1: u32 = 1;

/// Everything a table renderer needs for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPageSnapshot {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<FlatRecord>,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_rows: usize,
    pub can_go_next: bool,
    pub can_go_previous: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeriesEntry {
    pub key: String,
    pub color: Color,
}

/// Everything a line-chart renderer needs: x key, wide rows, colored series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub x_key: String,
    pub records: Vec<FlatRecord>,
    pub series: Vec<ChartSeriesEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPageJsonContractV1 {
    pub schema_version: u32,
    pub page: GridPageSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartJsonContractV1 {
    pub schema_version: u32,
    pub chart: ChartSnapshot,
}

impl GridPageSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> TabularResult<String> {
        let payload = GridPageJsonContractV1 {
            schema_version: GRID_PAGE_JSON_SCHEMA_V1,
            page: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            TabularError::InvalidData(format!("failed to serialize grid page contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> TabularResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<GridPageSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: GridPageJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            TabularError::InvalidData(format!("failed to parse grid page json payload: {e}"))
        })?;
        if payload.schema_version != GRID_PAGE_JSON_SCHEMA_V1 {
            return Err(TabularError::InvalidData(format!(
                "unsupported grid page schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.page)
    }
}

impl ChartSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> TabularResult<String> {
        let payload = ChartJsonContractV1 {
            schema_version: CHART_JSON_SCHEMA_V1,
            chart: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            TabularError::InvalidData(format!("failed to serialize chart contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> TabularResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<ChartSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: ChartJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            TabularError::InvalidData(format!("failed to parse chart json payload: {e}"))
        })?;
        if payload.schema_version != CHART_JSON_SCHEMA_V1 {
            return Err(TabularError::InvalidData(format!(
                "unsupported chart schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.chart)
    }
}
