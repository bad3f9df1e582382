//! Neo4j retrieval provider
//!
//! Sends [`Operation::to_cypher`] to a running Reactome graph database and decodes
//! the `a_*` / `r_type` / `b_*` columns into raw records. The provider owns a
//! single-threaded runtime so the extractor can stay synchronous.

use super::operation::Operation;
use super::provider::{RetrievalError, RetrievalProvider};
use super::record::{Endpoint, RawRecord};
use crate::config::Neo4jConfig;
use kgx_common::types::{Properties, PropertyValue};
use neo4rs::{query, ConfigBuilder, Graph, Row};
use std::collections::HashMap;
use tokio::runtime::Runtime;
use tracing::{debug, info};

pub struct Neo4jProvider {
    runtime: Runtime,
    graph: Graph,
}

impl Neo4jProvider {
    pub fn connect(config: &Neo4jConfig) -> Result<Self, RetrievalError> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .fetch_size(config.fetch_size)
            .max_connections(1);
        if let Some(db) = &config.database {
            builder = builder.db(db.as_str());
        }
        let neo4j_config = builder
            .build()
            .map_err(|e| RetrievalError::Backend(format!("Failed to build Neo4j config: {e}")))?;

        let graph = runtime.block_on(async {
            let graph = Graph::connect(neo4j_config)
                .await
                .map_err(|e| RetrievalError::Backend(format!("Failed to connect to Neo4j: {e}")))?;

            let mut result = graph
                .execute(query("RETURN 1 AS ok"))
                .await
                .map_err(|e| RetrievalError::Backend(format!("Connection test failed: {e}")))?;
            result
                .next()
                .await
                .map_err(|e| RetrievalError::Backend(e.to_string()))?;

            Ok::<_, RetrievalError>(graph)
        })?;

        info!("Connected to Neo4j at {}", config.uri);
        Ok(Self { runtime, graph })
    }
}

fn column<T: serde::de::DeserializeOwned>(row: &Row, key: &str) -> Result<T, RetrievalError> {
    row.get::<T>(key)
        .map_err(|e| RetrievalError::MalformedRow(format!("column {key}: {e}")))
}

fn properties(raw: HashMap<String, serde_json::Value>) -> Properties {
    raw.into_iter()
        .filter_map(|(key, value)| PropertyValue::from_json(value).map(|v| (key, v)))
        .collect()
}

fn decode_row(row: &Row) -> Result<RawRecord, RetrievalError> {
    Ok(RawRecord {
        subject: Endpoint {
            identity: column(row, "a_id")?,
            labels: column(row, "a_labels")?,
            properties: properties(column(row, "a_props")?),
        },
        relationship: column(row, "r_type")?,
        object: Endpoint {
            identity: column(row, "b_id")?,
            labels: column(row, "b_labels")?,
            properties: properties(column(row, "b_props")?),
        },
    })
}

impl RetrievalProvider for Neo4jProvider {
    fn name(&self) -> &str {
        "neo4j"
    }

    fn retrieve(&mut self, operation: &Operation) -> Result<Vec<RawRecord>, RetrievalError> {
        let cypher = operation.to_cypher();
        debug!(cypher = %cypher, "Running retrieval");

        let graph = &self.graph;
        self.runtime.block_on(async {
            let mut stream = graph
                .execute(query(&cypher))
                .await
                .map_err(|e| RetrievalError::Backend(e.to_string()))?;

            let mut records = Vec::new();
            while let Some(row) = stream
                .next()
                .await
                .map_err(|e| RetrievalError::Backend(e.to_string()))?
            {
                records.push(decode_row(&row)?);
            }
            Ok(records)
        })
    }
}
