use crate::error::{CexError, Result};
use crate::types::Granularity;
use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Credentials and endpoints for the embedding and vector store APIs
#[derive(Debug, Clone, PartialEq)]
pub struct VectorStoreConfig {
    pub index_host: String,
    pub index_api_key: String,
    pub namespace: Option<String>,
    pub embedding_api_key: String,
    pub embedding_base_url: String,
    pub embedding_model: String,
}

impl VectorStoreConfig {
    pub fn new(
        index_host: impl Into<String>,
        index_api_key: impl Into<String>,
        embedding_api_key: impl Into<String>,
    ) -> Self {
        Self {
            index_host: index_host.into(),
            index_api_key: index_api_key.into(),
            namespace: None,
            embedding_api_key: embedding_api_key.into(),
            embedding_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(
            required_var("PINECONE_HOST")?,
            required_var("PINECONE_API_KEY")?,
            required_var("OPENAI_API_KEY")?,
        );

        if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
            config.embedding_base_url = base_url;
        }
        if let Ok(model) = env::var("CCEXPLORER_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        config.namespace = env::var("PINECONE_NAMESPACE").ok();

        Ok(config)
    }
}

fn required_var(var: &str) -> Result<String> {
    env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CexError::EnvVarMissing {
            var: var.to_string(),
        })
}

/// Where file-based renderers write their output
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
}

impl OutputConfig {
    /// Explicit directory, else `CCEXPLORER_OUTPUT_DIR`, else the current directory
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        let output_dir = explicit
            .or_else(|| env::var("CCEXPLORER_OUTPUT_DIR").ok().map(PathBuf::from))
            .map(|dir| expand_home(&dir))
            .unwrap_or_else(|| PathBuf::from("."));

        Self { output_dir }
    }

    /// File name for one report, e.g. `ccexplorer-MONTHLY-2024-01-01-2024-02-01.csv`
    pub fn report_path(
        &self,
        granularity: Granularity,
        start: &str,
        end: &str,
        extension: &str,
    ) -> PathBuf {
        self.output_dir.join(format!(
            "ccexplorer-{}-{}-{}.{}",
            granularity, start, end, extension
        ))
    }
}

// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_path() {
        let config = OutputConfig {
            output_dir: PathBuf::from("/tmp/reports"),
        };

        assert_eq!(
            config.report_path(Granularity::Daily, "2024-01-01", "2024-01-31", "csv"),
            PathBuf::from("/tmp/reports/ccexplorer-DAILY-2024-01-01-2024-01-31.csv")
        );
    }

    #[test]
    fn test_explicit_output_dir_wins() {
        let config = OutputConfig::resolve(Some(PathBuf::from("/var/out")));
        assert_eq!(config.output_dir, PathBuf::from("/var/out"));
    }

    #[test]
    fn test_expand_home() {
        let expanded = expand_home(Path::new("~/reports"));
        if let Some(home) = home::home_dir() {
            assert_eq!(expanded, home.join("reports"));
        }
        assert_eq!(expand_home(Path::new("/abs")), PathBuf::from("/abs"));
    }

    #[test]
    fn test_vector_store_defaults() {
        let config = VectorStoreConfig::new("https://idx.example", "pc-key", "oa-key")
            .with_namespace("billing");

        assert_eq!(config.embedding_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.namespace.as_deref(), Some("billing"));
    }
}
