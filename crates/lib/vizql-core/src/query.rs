use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::config::{QueryOptions, VizqlConfig};

/// Reference to the target datasource, shaped as the query service expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceRef {
    pub datasource_luid: String,
}

/// Complete outbound payload for the query-datasource operation.
///
/// Always carries all three top-level keys. The caller's fragment lands under
/// `query` untouched; the datasource reference and options come from
/// configuration.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub datasource: DatasourceRef,
    pub query: Map<String, Value>,
    pub options: QueryOptions,
}

impl QueryRequest {
    /// Merges a caller-supplied query fragment with the configured
    /// datasource and output options.
    #[must_use]
    pub fn new(config: &VizqlConfig, fragment: Map<String, Value>) -> Self {
        Self {
            datasource: DatasourceRef {
                datasource_luid: config.datasource_luid.clone(),
            },
            query: fragment,
            options: config.options,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        json!(self)
    }
}

/// Example query fragments agents can adapt when composing their own.
///
/// Fragments only, never full payloads; the bridge injects `datasource` and
/// `options` itself.
#[must_use]
pub fn sample_query_fragments() -> Value {
    json!([
        {
            "fields": [
                { "fieldCaption": "Segment" },
                { "fieldCaption": "Sales", "function": "SUM" }
            ]
        },
        {
            "fields": [
                { "fieldCaption": "Category" },
                { "fieldCaption": "Profit", "function": "SUM", "sortDirection": "DESC" }
            ]
        },
        {
            "fields": [
                { "fieldCaption": "State/Province" },
                { "fieldCaption": "Sales", "function": "SUM", "sortDirection": "DESC" }
            ],
            "filters": [
                {
                    "field": { "fieldCaption": "Segment" },
                    "filterType": "SET",
                    "values": ["Consumer"],
                    "exclude": false
                },
                {
                    "field": { "fieldCaption": "Order Date" },
                    "filterType": "RANGE",
                    "min": "2021-01-01",
                    "max": "2021-12-31"
                }
            ],
            "limit": 5
        }
    ])
}
