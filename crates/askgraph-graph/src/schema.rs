//! Schema introspection: the structural description of the graph that
//! grounds Cypher generation.

use std::collections::BTreeMap;

use neo4rs::query;

use crate::client::{GraphClient, GraphError};

/// A property on a node label or relationship type.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PropertySpec {
    pub name: String,
    pub types: Vec<String>,
}

/// A node label or relationship type with its properties.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EntitySchema {
    pub name: String,
    pub properties: Vec<PropertySpec>,
}

/// A distinct `(:Source)-[:REL]->(:Target)` pattern present in the graph.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RelPattern {
    pub source: String,
    pub rel_type: String,
    pub target: String,
}

/// The introspected structure of the graph.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct GraphSchema {
    pub node_types: Vec<EntitySchema>,
    pub rel_types: Vec<EntitySchema>,
    pub patterns: Vec<RelPattern>,
}

impl GraphSchema {
    /// Render the textual schema description embedded in the generation prompt.
    pub fn to_prompt_text(&self) -> String {
        let mut out = String::from("Node properties:\n");
        for node in &self.node_types {
            out.push_str(&render_entity(node));
            out.push('\n');
        }
        out.push_str("Relationship properties:\n");
        for rel in &self.rel_types {
            out.push_str(&render_entity(rel));
            out.push('\n');
        }
        out.push_str("The relationships:\n");
        for p in &self.patterns {
            out.push_str(&format!(
                "(:{})-[:{}]->(:{})\n",
                p.source, p.rel_type, p.target
            ));
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.node_types.is_empty() && self.rel_types.is_empty()
    }
}

fn render_entity(entity: &EntitySchema) -> String {
    let props = entity
        .properties
        .iter()
        .map(|p| format!("{}: {}", p.name, p.types.join(" | ")))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} {{{}}}", entity.name, props)
}

impl GraphClient {
    /// Introspect the live database into a [`GraphSchema`].
    ///
    /// Uses the built-in `db.schema.*` procedures for properties and a
    /// distinct-pattern scan for the relationship shapes.
    pub async fn introspect_schema(&self) -> Result<GraphSchema, GraphError> {
        let node_types = self
            .fetch_entity_properties(
                "CALL db.schema.nodeTypeProperties()
                 YIELD nodeType, propertyName, propertyTypes
                 RETURN nodeType AS entity, propertyName, propertyTypes",
            )
            .await?;

        let rel_types = self
            .fetch_entity_properties(
                "CALL db.schema.relTypeProperties()
                 YIELD relType, propertyName, propertyTypes
                 RETURN relType AS entity, propertyName, propertyTypes",
            )
            .await?;

        let patterns = self.fetch_patterns().await?;

        tracing::debug!(
            node_types = node_types.len(),
            rel_types = rel_types.len(),
            patterns = patterns.len(),
            "Schema introspected"
        );

        Ok(GraphSchema {
            node_types,
            rel_types,
            patterns,
        })
    }

    async fn fetch_entity_properties(
        &self,
        cypher: &str,
    ) -> Result<Vec<EntitySchema>, GraphError> {
        let rows = self.query_rows(query(cypher)).await?;

        // BTreeMap keeps the rendered schema text deterministic.
        let mut grouped: BTreeMap<String, Vec<PropertySpec>> = BTreeMap::new();
        for row in rows {
            let raw: String = row.get("entity").map_err(|e| {
                GraphError::Serialization(format!("Failed to read entity type: {e}"))
            })?;
            let name = strip_entity_name(&raw);

            let props = grouped.entry(name).or_default();
            let prop_name: Option<String> = row.get("propertyName").unwrap_or(None);
            if let Some(prop_name) = prop_name {
                let types: Vec<String> = row.get("propertyTypes").unwrap_or_default();
                props.push(PropertySpec {
                    name: prop_name,
                    types,
                });
            }
        }

        Ok(grouped
            .into_iter()
            .map(|(name, properties)| EntitySchema { name, properties })
            .collect())
    }

    async fn fetch_patterns(&self) -> Result<Vec<RelPattern>, GraphError> {
        let q = query(
            "MATCH (a)-[r]->(b)
             WITH DISTINCT labels(a) AS source_labels, type(r) AS rel_type,
                  labels(b) AS target_labels
             RETURN source_labels, rel_type, target_labels
             LIMIT 500",
        );

        let rows = self.query_rows(q).await?;
        let mut patterns = Vec::with_capacity(rows.len());
        for row in rows {
            let source_labels: Vec<String> = row.get("source_labels").unwrap_or_default();
            let target_labels: Vec<String> = row.get("target_labels").unwrap_or_default();
            let rel_type: String = row.get("rel_type").unwrap_or_default();

            patterns.push(RelPattern {
                source: source_labels.first().cloned().unwrap_or_default(),
                rel_type,
                target: target_labels.first().cloned().unwrap_or_default(),
            });
        }
        Ok(patterns)
    }
}

/// `db.schema.*` procedures report types as ":`Person`" or ":`REL`".
/// Strip the leading colon and the backticks.
fn strip_entity_name(raw: &str) -> String {
    raw.trim_start_matches(':').replace('`', "")
}
