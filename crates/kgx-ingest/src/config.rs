// Loader Configuration
//
// Everything is read from environment variables (a `.env` file is loaded first
// by the binary). Unset variables fall back to the defaults below.

use kgx_common::{KgxError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATA_DIR: &str = "./data/sources";
pub const DEFAULT_OUTPUT_DIR: &str = "./data/kgx";
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

pub const DEFAULT_REACTOME_DATA_URL: &str = "https://reactome.org/download/current/reactome.graphdb.dump";
pub const DEFAULT_REACTOME_VERSION_URL: &str = "https://reactome.org/about/news";

pub const DEFAULT_HGNC_DATA_URL: &str =
    "https://ftp.ebi.ac.uk/pub/databases/genenames/hgnc/tsv/hgnc_complete_set.txt";
pub const HGNC_DATA_FILE: &str = "hgnc_complete_set.txt";

pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_NEO4J_USER: &str = "neo4j";
pub const DEFAULT_NEO4J_FETCH_SIZE: usize = 500;

/// Rows parsed per source in test mode
pub const TEST_MODE_PARSE_LIMIT: usize = 1000;

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

fn flag_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    matches!(
        lookup(key).as_deref().map(str::trim),
        Some("1") | Some("true") | Some("TRUE") | Some("yes")
    )
}

// ============================================================================
// Reactome
// ============================================================================

/// Configuration for the Reactome loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactomeConfig {
    /// Graph database dump download URL
    pub data_url: String,

    /// Page scraped for the current release number
    pub version_url: String,

    /// Rule table override; the embedded table is used when unset
    pub rule_table: Option<PathBuf>,

    /// Exported graph (JSON) to extract from instead of Neo4j
    pub graph_file: Option<PathBuf>,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ReactomeConfig {
    fn default() -> Self {
        ReactomeConfig {
            data_url: DEFAULT_REACTOME_DATA_URL.to_string(),
            version_url: DEFAULT_REACTOME_VERSION_URL.to_string(),
            rule_table: None,
            graph_file: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ReactomeConfig {
    pub fn builder() -> ReactomeConfigBuilder {
        ReactomeConfigBuilder::default()
    }

    /// File name of the downloaded dump
    pub fn dump_file_name(&self) -> &str {
        self.data_url.rsplit('/').next().unwrap_or("reactome.graphdb.dump")
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.data_url.is_empty() {
            return Err("Reactome data URL cannot be empty".to_string());
        }

        if self.version_url.is_empty() {
            return Err("Reactome version URL cannot be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let default = ReactomeConfig::default();
        ReactomeConfig {
            data_url: lookup("REACTOME_DATA_URL").unwrap_or(default.data_url),
            version_url: lookup("REACTOME_VERSION_URL").unwrap_or(default.version_url),
            rule_table: lookup("REACTOME_RULE_TABLE").map(PathBuf::from),
            graph_file: lookup("REACTOME_GRAPH_FILE").map(PathBuf::from),
            timeout_secs: parse_var(lookup, "REACTOME_TIMEOUT_SECS").unwrap_or(default.timeout_secs),
        }
    }
}

/// Builder for ReactomeConfig
#[derive(Debug, Default)]
pub struct ReactomeConfigBuilder {
    data_url: Option<String>,
    version_url: Option<String>,
    rule_table: Option<PathBuf>,
    graph_file: Option<PathBuf>,
    timeout_secs: Option<u64>,
}

impl ReactomeConfigBuilder {
    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = Some(url.into());
        self
    }

    pub fn version_url(mut self, url: impl Into<String>) -> Self {
        self.version_url = Some(url.into());
        self
    }

    pub fn rule_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.rule_table = Some(path.into());
        self
    }

    pub fn graph_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.graph_file = Some(path.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn build(self) -> ReactomeConfig {
        let default = ReactomeConfig::default();

        ReactomeConfig {
            data_url: self.data_url.unwrap_or(default.data_url),
            version_url: self.version_url.unwrap_or(default.version_url),
            rule_table: self.rule_table,
            graph_file: self.graph_file,
            timeout_secs: self.timeout_secs.unwrap_or(default.timeout_secs),
        }
    }
}

// ============================================================================
// Neo4j
// ============================================================================

/// Connection settings for a running Reactome graph database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: Option<String>,
    pub fetch_size: usize,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Neo4jConfig {
            uri: DEFAULT_NEO4J_URI.to_string(),
            user: DEFAULT_NEO4J_USER.to_string(),
            password: String::new(),
            database: None,
            fetch_size: DEFAULT_NEO4J_FETCH_SIZE,
        }
    }
}

impl Neo4jConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.uri.is_empty() {
            return Err("Neo4j URI cannot be empty".to_string());
        }

        if self.fetch_size == 0 {
            return Err("Neo4j fetch size must be greater than 0".to_string());
        }

        Ok(())
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let default = Neo4jConfig::default();
        Neo4jConfig {
            uri: lookup("NEO4J_URI").unwrap_or(default.uri),
            user: lookup("NEO4J_USER").unwrap_or(default.user),
            password: lookup("NEO4J_PASSWORD").unwrap_or(default.password),
            database: lookup("NEO4J_DATABASE"),
            fetch_size: parse_var(lookup, "NEO4J_FETCH_SIZE").unwrap_or(default.fetch_size),
        }
    }
}

// ============================================================================
// HGNC
// ============================================================================

/// Configuration for the HGNC gene family loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HgncConfig {
    /// Complete set download URL
    pub data_url: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Parse limit for testing (None = parse all)
    pub parse_limit: Option<usize>,
}

impl Default for HgncConfig {
    fn default() -> Self {
        HgncConfig {
            data_url: DEFAULT_HGNC_DATA_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            parse_limit: None,
        }
    }
}

impl HgncConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.data_url.is_empty() {
            return Err("HGNC data URL cannot be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.parse_limit == Some(0) {
            return Err("Parse limit must be greater than 0".to_string());
        }

        Ok(())
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let default = HgncConfig::default();
        HgncConfig {
            data_url: lookup("HGNC_DATA_URL").unwrap_or(default.data_url),
            timeout_secs: parse_var(lookup, "HGNC_TIMEOUT_SECS").unwrap_or(default.timeout_secs),
            parse_limit: parse_var(lookup, "HGNC_PARSE_LIMIT"),
        }
    }
}

// ============================================================================
// Top level
// ============================================================================

/// Settings shared by every loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Where raw source files are downloaded
    pub data_dir: PathBuf,

    /// Where KGX output directories are created
    pub output_dir: PathBuf,

    /// Parse a small slice of each source
    pub test_mode: bool,

    pub reactome: ReactomeConfig,
    pub hgnc: HgncConfig,
    pub neo4j: Neo4jConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            test_mode: false,
            reactome: ReactomeConfig::default(),
            hgnc: HgncConfig::default(),
            neo4j: Neo4jConfig::default(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = IngestConfig::default();
        let mut config = IngestConfig {
            data_dir: lookup("KGX_DATA_DIR").map(PathBuf::from).unwrap_or(default.data_dir),
            output_dir: lookup("KGX_OUTPUT_DIR").map(PathBuf::from).unwrap_or(default.output_dir),
            test_mode: flag_var(&lookup, "KGX_TEST_MODE"),
            reactome: ReactomeConfig::from_lookup(&lookup),
            hgnc: HgncConfig::from_lookup(&lookup),
            neo4j: Neo4jConfig::from_lookup(&lookup),
        };
        config.apply_test_mode();
        config
    }

    /// Cap parsing when test mode is on and no explicit limit was given
    pub fn apply_test_mode(&mut self) {
        if self.test_mode && self.hgnc.parse_limit.is_none() {
            self.hgnc.parse_limit = Some(TEST_MODE_PARSE_LIMIT);
        }
    }

    /// Directory for one source's raw files
    pub fn source_dir(&self, source_id: &str) -> PathBuf {
        self.data_dir.join(source_id)
    }

    /// Directory for one source's KGX output
    pub fn source_output_dir(&self, source_id: &str) -> PathBuf {
        self.output_dir.join(source_id)
    }

    pub fn validate(&self) -> Result<()> {
        self.reactome.validate().map_err(KgxError::Config)?;
        self.hgnc.validate().map_err(KgxError::Config)?;
        self.neo4j.validate().map_err(KgxError::Config)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = IngestConfig::default();
        assert_eq!(config.reactome.data_url, DEFAULT_REACTOME_DATA_URL);
        assert_eq!(config.reactome.version_url, "https://reactome.org/about/news");
        assert_eq!(config.hgnc.data_url, DEFAULT_HGNC_DATA_URL);
        assert!(config.hgnc.parse_limit.is_none());
        assert!(!config.test_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = IngestConfig::from_lookup(lookup(&[
            ("KGX_DATA_DIR", "/tmp/sources"),
            ("REACTOME_RULE_TABLE", "/etc/kgx/rules.csv"),
            ("REACTOME_TIMEOUT_SECS", "30"),
            ("NEO4J_URI", "bolt://graph:7687"),
            ("NEO4J_PASSWORD", "secret"),
            ("HGNC_PARSE_LIMIT", "25"),
        ]));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/sources"));
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.reactome.rule_table, Some(PathBuf::from("/etc/kgx/rules.csv")));
        assert_eq!(config.reactome.timeout_secs, 30);
        assert_eq!(config.neo4j.uri, "bolt://graph:7687");
        assert_eq!(config.neo4j.password, "secret");
        assert_eq!(config.hgnc.parse_limit, Some(25));
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let config = IngestConfig::from_lookup(lookup(&[("REACTOME_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.reactome.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_test_mode_limits_hgnc() {
        let config = IngestConfig::from_lookup(lookup(&[("KGX_TEST_MODE", "true")]));
        assert!(config.test_mode);
        assert_eq!(config.hgnc.parse_limit, Some(TEST_MODE_PARSE_LIMIT));

        let config = IngestConfig::from_lookup(lookup(&[("KGX_TEST_MODE", "1"), ("HGNC_PARSE_LIMIT", "5")]));
        assert_eq!(config.hgnc.parse_limit, Some(5));
    }

    #[test]
    fn test_builder_pattern() {
        let config = ReactomeConfig::builder()
            .rule_table("rules.csv")
            .graph_file("graph.json")
            .timeout_secs(5)
            .build();

        assert_eq!(config.rule_table, Some(PathBuf::from("rules.csv")));
        assert_eq!(config.graph_file, Some(PathBuf::from("graph.json")));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.data_url, DEFAULT_REACTOME_DATA_URL);
        assert_eq!(config.dump_file_name(), "reactome.graphdb.dump");
    }

    #[test]
    fn test_validate() {
        let mut config = IngestConfig::default();
        config.reactome.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(KgxError::Config(_))));

        let mut config = IngestConfig::default();
        config.hgnc.parse_limit = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_source_dirs() {
        let config = IngestConfig::default();
        assert_eq!(config.source_dir("HGNC"), PathBuf::from("./data/sources/HGNC"));
        assert_eq!(config.source_output_dir("Reactome"), PathBuf::from("./data/kgx/Reactome"));
    }
}
