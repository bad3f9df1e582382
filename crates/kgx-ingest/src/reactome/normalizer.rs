//! Reactome node identifier normalization
//!
//! Reactome nodes carry their identifiers in different places depending on
//! their type. The rules below are checked in order and the first match wins:
//!
//! 1. same-node or cross-mapped types: `Species` use `taxId`, `GO_Term` use
//!    `databaseName` + `accession`, everything else `databaseName` + `identifier`
//! 2. event types use their stable id (`stId`)
//! 3. anything else has no identifier

use super::record::Endpoint;
use kgx_common::prefixes::{self, curie};
use kgx_common::types::KgxNode;
use thiserror::Error;

/// Types whose identifier lives on the node itself
pub const SAME_NODE_TYPES: &[&str] = &[
    "GO_Term",
    "Species",
    "ExternalOntology",
    "ReferenceTherapeutic",
    "ReferenceMolecule",
    "ReferenceSequence",
    "Disease",
];

/// Types identified through a linked reference entity
pub const CROSS_MAPPED_TYPES: &[&str] = &[
    "EntityWithAccessionedSequence",
    "GenomeEncodedEntity",
    "SimpleEntity",
    "Drug",
    "Complex",
    "Polymer",
];

/// Types identified by their Reactome stable id
pub const REACTOME_TYPES: &[&str] = &[
    "ReactionLikeEvent",
    "Pathway",
    "Event",
    "BlackboxEvent",
    "FailedReaction",
    "Depolymerisation",
    "Polymerisation",
];

/// Properties copied from a source node onto the emitted node
const CARRIED_PROPERTIES: &[&str] = &["definition", "url"];

/// Preferred curie prefix for a Reactome `databaseName`
pub fn prefix_for(database_name: &str) -> Option<&'static str> {
    let prefix = match database_name {
        "UniProt" => prefixes::UNIPROTKB,
        "Guide to Pharmacology" => prefixes::GTOPDB,
        "ChEBI" => prefixes::CHEBI,
        "REACT" => prefixes::REACTOME,
        "COMPOUND" => prefixes::KEGG_COMPOUND,
        "PubChem Compound" | "PubChem Substance" => prefixes::PUBCHEM_COMPOUND,
        "KEGG Glycan" => prefixes::KEGG_GLYCAN,
        "NCBI Entrez Gene" => prefixes::NCBIGENE,
        "ClinVar" => prefixes::CLINVAR,
        "HGNC" => prefixes::HGNC,
        "GO" => prefixes::GO,
        "DOID" => prefixes::DOID,
        "CL" => prefixes::CL,
        _ => return None,
    };
    Some(prefix)
}

/// A produced identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedId {
    /// Built from a known prefix
    Mapped(String),

    /// The database name had no known prefix and was used verbatim
    Fallback { curie: String, database_name: String },
}

impl NormalizedId {
    pub fn curie(&self) -> &str {
        match self {
            NormalizedId::Mapped(curie) => curie,
            NormalizedId::Fallback { curie, .. } => curie,
        }
    }

    pub fn into_curie(self) -> String {
        match self {
            NormalizedId::Mapped(curie) => curie,
            NormalizedId::Fallback { curie, .. } => curie,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, NormalizedId::Fallback { .. })
    }
}

/// Why no identifier could be produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("no identifier scheme for node {identity} (labels: {labels:?})")]
    UnknownType { identity: i64, labels: Vec<String> },

    #[error("node {identity} (labels: {labels:?}) has no usable {property:?} property")]
    MissingProperty {
        identity: i64,
        labels: Vec<String>,
        property: &'static str,
    },
}

fn required(endpoint: &Endpoint, property: &'static str) -> Result<String, NormalizationError> {
    endpoint
        .text(property)
        .ok_or_else(|| NormalizationError::MissingProperty {
            identity: endpoint.identity,
            labels: endpoint.labels.clone(),
            property,
        })
}

/// Produce the canonical curie for a retrieved endpoint
pub fn normalize(endpoint: &Endpoint) -> Result<NormalizedId, NormalizationError> {
    if endpoint.has_any_label(SAME_NODE_TYPES) || endpoint.has_any_label(CROSS_MAPPED_TYPES) {
        if endpoint.has_label("Species") {
            let tax_id = required(endpoint, "taxId")?;
            return Ok(NormalizedId::Mapped(curie(prefixes::NCBITAXON, &tax_id)));
        }

        let local_key = if endpoint.has_label("GO_Term") {
            "accession"
        } else {
            "identifier"
        };
        let database_name = required(endpoint, "databaseName")?;
        let local_id = required(endpoint, local_key)?;

        return Ok(match prefix_for(&database_name) {
            Some(prefix) => NormalizedId::Mapped(curie(prefix, &local_id)),
            None => NormalizedId::Fallback {
                curie: curie(&database_name, &local_id),
                database_name,
            },
        });
    }

    if endpoint.has_any_label(REACTOME_TYPES) {
        let st_id = required(endpoint, "stId")?;
        return Ok(NormalizedId::Mapped(curie(prefixes::REACTOME, &st_id)));
    }

    Err(NormalizationError::UnknownType {
        identity: endpoint.identity,
        labels: endpoint.labels.clone(),
    })
}

/// Build the output node for an endpoint that normalized to `id`
pub fn node_for(endpoint: &Endpoint, id: String) -> KgxNode {
    let name = endpoint.text("displayName").unwrap_or_default();
    let mut node = KgxNode::new(id, name);
    for key in CARRIED_PROPERTIES {
        if let Some(value) = endpoint.property(key) {
            node.properties.insert(key.to_string(), value.clone());
        }
    }
    node
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use kgx_common::types::{Properties, PropertyValue};
    use proptest::prelude::*;

    fn props(pairs: &[(&str, PropertyValue)]) -> Properties {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_species_uses_tax_id() {
        let species = Endpoint::new(
            1,
            &["DatabaseObject", "Taxon", "Species"],
            props(&[("taxId", "9606".into()), ("displayName", "Homo sapiens".into())]),
        );
        assert_eq!(normalize(&species).unwrap(), NormalizedId::Mapped("NCBITaxon:9606".to_string()));
    }

    #[test]
    fn test_go_term_uses_accession() {
        let term = Endpoint::new(
            2,
            &["GO_Term", "GO_CellularComponent"],
            props(&[
                ("databaseName", "GO".into()),
                ("accession", "0005829".into()),
                ("identifier", "ignored".into()),
            ]),
        );
        assert_eq!(normalize(&term).unwrap().curie(), "GO:0005829");
    }

    #[test]
    fn test_cross_mapped_entity_uses_reference_identifier() {
        let protein = Endpoint::new(
            3,
            &["PhysicalEntity", "EntityWithAccessionedSequence"],
            props(&[("databaseName", "UniProt".into()), ("identifier", "P04637".into())]),
        );
        assert_eq!(normalize(&protein).unwrap().curie(), "UniProtKB:P04637");
    }

    #[test]
    fn test_unknown_database_falls_back_to_raw_name() {
        let molecule = Endpoint::new(
            4,
            &["ReferenceMolecule"],
            props(&[("databaseName", "ENSEMBL".into()), ("identifier", "ENSG00000141510".into())]),
        );
        let id = normalize(&molecule).unwrap();
        assert!(id.is_fallback());
        assert_eq!(id.curie(), "ENSEMBL:ENSG00000141510");
    }

    #[test]
    fn test_event_uses_stable_id() {
        let reaction = Endpoint::new(
            5,
            &["Event", "ReactionLikeEvent", "Reaction"],
            props(&[("stId", "R-HSA-69620".into())]),
        );
        assert_eq!(normalize(&reaction).unwrap().curie(), "REACT:R-HSA-69620");
    }

    #[test]
    fn test_same_node_rule_wins_over_event_rule() {
        let odd = Endpoint::new(
            6,
            &["Pathway", "Disease"],
            props(&[("databaseName", "DOID".into()), ("identifier", "162".into()), ("stId", "R-HSA-1".into())]),
        );
        assert_eq!(normalize(&odd).unwrap().curie(), "DOID:162");
    }

    #[test]
    fn test_unknown_labels_fail() {
        let summation = Endpoint::new(7, &["DatabaseObject", "Summation"], Properties::new());
        assert_eq!(
            normalize(&summation).unwrap_err(),
            NormalizationError::UnknownType {
                identity: 7,
                labels: vec!["DatabaseObject".to_string(), "Summation".to_string()],
            }
        );
    }

    #[test]
    fn test_missing_property_fails() {
        let pathway = Endpoint::new(8, &["Pathway"], Properties::new());
        assert!(matches!(
            normalize(&pathway),
            Err(NormalizationError::MissingProperty { property: "stId", .. })
        ));
    }

    #[test]
    fn test_node_for_carries_description() {
        let term = Endpoint::new(
            9,
            &["GO_Term"],
            props(&[
                ("displayName", "cytosol".into()),
                ("definition", "The part of the cytoplasm".into()),
                ("url", "https://www.ebi.ac.uk/QuickGO/term/GO:0005829".into()),
                ("schemaClass", "GO_CellularComponent".into()),
            ]),
        );
        let node = node_for(&term, "GO:0005829".to_string());
        assert_eq!(node.name, "cytosol");
        assert_eq!(node.properties.len(), 2);
        assert!(node.properties.contains_key("definition"));
        assert!(node.properties.contains_key("url"));
    }

    proptest! {
        #[test]
        fn prop_species_always_maps_to_ncbitaxon(tax_id in 1i64..10_000_000, extra in "[A-Za-z_]{1,12}") {
            let species = Endpoint::new(
                42,
                &["Species", extra.as_str(), "Pathway"],
                props(&[("taxId", PropertyValue::Integer(tax_id)), ("stId", "R-HSA-1".into())]),
            );
            let id = normalize(&species).unwrap();
            prop_assert_eq!(id, NormalizedId::Mapped(format!("NCBITaxon:{tax_id}")));
        }

        #[test]
        fn prop_unlisted_labels_never_normalize(labels in proptest::collection::vec("[a-z]{3,10}", 0..4)) {
            let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let endpoint = Endpoint::new(1, &label_refs, props(&[("stId", "R-HSA-1".into())]));
            let is_unknown_type = matches!(normalize(&endpoint), Err(NormalizationError::UnknownType { .. }));
            prop_assert!(is_unknown_type);
        }
    }
}
