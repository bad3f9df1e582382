//! Extraction driver
//!
//! Runs every planned operation against a provider, one at a time, and turns
//! the returned records into KGX nodes and edges.

use super::normalizer::{node_for, normalize, NormalizedId};
use super::predicates::PredicateTable;
use super::provider::RetrievalProvider;
use super::record::{Endpoint, RawRecord};
use super::router::{Bucket, ExtractionPlan};
use super::rules::RuleTable;
use super::{Result, PROVENANCE_ID};
use crate::loader::ParseMetadata;
use kgx_common::sink::KgxSink;
use kgx_common::types::KgxEdge;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Extractor {
    plan: ExtractionPlan,
    predicates: PredicateTable,
}

impl Extractor {
    pub fn new(rules: &RuleTable) -> Self {
        Self {
            plan: ExtractionPlan::from_table(rules),
            predicates: PredicateTable::default(),
        }
    }

    pub fn with_predicates(mut self, predicates: PredicateTable) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn plan(&self) -> &ExtractionPlan {
        &self.plan
    }

    /// Run the whole plan, streaming output into `sink`
    pub fn run(&self, provider: &mut dyn RetrievalProvider, sink: &mut dyn KgxSink) -> Result<ParseMetadata> {
        self.predicates.validate()?;

        let mut metadata = ParseMetadata::default();
        info!(
            "Extracting {} rules with the {} provider",
            self.plan.steps().len(),
            provider.name()
        );

        for step in self.plan.steps() {
            let Some(operation) = step.route.operation() else {
                match step.route.bucket() {
                    Bucket::PropertyWrite => info!("Declining property-write rule {}", step.rule),
                    _ => warn!("No operation could be built for rule {}", step.rule),
                }
                continue;
            };

            let records = provider.retrieve(operation)?;
            debug!("{}: {} records from {}", step.rule, records.len(), operation);

            for record in &records {
                self.process_record(record, sink, &mut metadata)?;
            }
        }

        info!(
            "Processed {} records, {} unusable, {} prefix fallbacks",
            metadata.num_source_lines, metadata.unusable_source_lines, metadata.prefix_fallbacks
        );
        Ok(metadata)
    }

    fn process_record(&self, record: &RawRecord, sink: &mut dyn KgxSink, metadata: &mut ParseMetadata) -> Result<()> {
        metadata.num_source_lines += 1;

        // both endpoints are emitted before the record is judged
        let subject = emit_endpoint(&record.subject, sink, metadata)?;
        let object = emit_endpoint(&record.object, sink, metadata)?;
        let (Some(subject), Some(object)) = (subject, object) else {
            metadata.unusable_source_lines += 1;
            return Ok(());
        };

        match self.predicates.get(&record.relationship) {
            Some(predicate) => {
                sink.write_edge(KgxEdge::new(subject, predicate, object, PROVENANCE_ID))?;
            },
            None => {
                warn!(
                    relationship = %record.relationship,
                    "A predicate could not be mapped for relationship type"
                );
                metadata.unusable_source_lines += 1;
            },
        }
        Ok(())
    }
}

fn emit_endpoint(endpoint: &Endpoint, sink: &mut dyn KgxSink, metadata: &mut ParseMetadata) -> Result<Option<String>> {
    let id = match normalize(endpoint) {
        Ok(id) => id,
        Err(e) => {
            warn!(identity = endpoint.identity, labels = ?endpoint.labels, "{}", e);
            return Ok(None);
        },
    };

    if let NormalizedId::Fallback { database_name, .. } = &id {
        warn!(
            identity = endpoint.identity,
            database_name = %database_name,
            "No curie prefix for database name, using it verbatim"
        );
        metadata.prefix_fallbacks += 1;
    }

    let curie = id.into_curie();
    sink.write_node(node_for(endpoint, curie.clone()))?;
    Ok(Some(curie))
}
