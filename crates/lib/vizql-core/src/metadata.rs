use serde::Serialize;
use serde_json::{Value, json};

use crate::error::ToolError;

/// GraphQL document for the datasource field catalog.
///
/// The target luid is bound through a GraphQL variable rather than spliced
/// into the document, so arbitrary identifiers cannot alter its structure.
pub const DATASOURCE_FIELDS_QUERY: &str = r"
query Datasources($luid: String) {
  publishedDatasources(filter: { luid: $luid }) {
    name
    description
    datasourceFilters { field { name description } }
    fields { name description }
  }
}
";

/// Variables bound into [`DATASOURCE_FIELDS_QUERY`].
#[derive(Debug, Clone, Serialize)]
pub struct MetadataVariables {
    pub luid: String,
}

/// Complete outbound body for a Metadata API call.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataRequest {
    pub query: &'static str,
    pub variables: MetadataVariables,
}

impl MetadataRequest {
    /// Builds the field-catalog request for one datasource.
    #[must_use]
    pub fn for_datasource(luid: impl Into<String>) -> Self {
        Self {
            query: DATASOURCE_FIELDS_QUERY,
            variables: MetadataVariables { luid: luid.into() },
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        json!(self)
    }
}

/// Pulls the field catalog out of a Metadata API response.
///
/// Checks run in a fixed order: GraphQL-level errors first, then the presence
/// of a published datasource, then its `fields` list. The first unmet check
/// is terminal.
///
/// # Errors
///
/// Returns [`ToolError::Upstream`] when the response reports GraphQL errors,
/// and [`ToolError::Shape`] when no published datasource is present or the
/// first one has no `fields` list. Shape failures carry the offending object
/// so callers can see what the upstream actually sent.
pub fn extract_fields(response: &Value) -> Result<Value, ToolError> {
    if let Some(errors) = response.get("errors") {
        let reportable = match errors {
            Value::Null => false,
            Value::Array(list) => !list.is_empty(),
            _ => true,
        };
        if reportable {
            return Err(ToolError::Upstream {
                details: errors.clone(),
            });
        }
    }

    let Some(datasource) = response
        .pointer("/data/publishedDatasources")
        .and_then(Value::as_array)
        .and_then(|published| published.first())
    else {
        return Err(ToolError::Shape {
            message: "No publishedDatasources in response",
            raw: response.clone(),
        });
    };

    match datasource.get("fields") {
        None | Some(Value::Null) => Err(ToolError::Shape {
            message: "No fields in publishedDatasources[0]",
            raw: datasource.clone(),
        }),
        Some(fields) => Ok(fields.clone()),
    }
}
