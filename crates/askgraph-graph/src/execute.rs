//! Raw Cypher execution with JSON row serialization.
//!
//! The pipeline hands us whatever statement the language model produced;
//! no validation happens here. Malformed statements surface as
//! `GraphError::Query` from the driver.

use neo4rs::query;

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    /// Run an arbitrary Cypher statement and serialize the full row set
    /// as a JSON array, one object per row keyed by return column.
    pub async fn execute_raw(&self, cypher: &str) -> Result<String, GraphError> {
        let rows = self.query_rows(query(cypher)).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let value: serde_json::Value = row.to().map_err(|e| {
                GraphError::Serialization(format!("Failed to serialize row: {e}"))
            })?;
            records.push(value);
        }

        tracing::debug!(rows = records.len(), "Cypher statement executed");

        serde_json::to_string(&records).map_err(|e| GraphError::Serialization(e.to_string()))
    }
}
