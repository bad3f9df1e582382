//! Curie namespace prefixes preferred by the node normalizer

pub const CHEBI: &str = "CHEBI";
pub const CLINVAR: &str = "CLINVAR";
pub const CL: &str = "CL";
pub const DOID: &str = "DOID";
pub const GO: &str = "GO";
pub const GTOPDB: &str = "GTOPDB";
pub const HGNC: &str = "HGNC";
pub const HGNC_FAMILY: &str = "HGNC.FAMILY";
pub const KEGG_COMPOUND: &str = "KEGG.COMPOUND";
pub const KEGG_GLYCAN: &str = "KEGG.GLYCAN";
pub const NCBIGENE: &str = "NCBIGene";
pub const NCBITAXON: &str = "NCBITaxon";
pub const PMID: &str = "PMID";
pub const PUBCHEM_COMPOUND: &str = "PUBCHEM.COMPOUND";
pub const REACTOME: &str = "REACT";
pub const UNIPROTKB: &str = "UniProtKB";

/// Join a prefix and a local identifier into a curie
pub fn curie(prefix: &str, local_id: &str) -> String {
    format!("{prefix}:{local_id}")
}
