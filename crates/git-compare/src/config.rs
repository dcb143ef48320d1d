use git_hash::HashAlgorithm;
use git_repository::RepositoryAccess;

use crate::log::OutputConfig;
use crate::method::ComparisonMethod;
use crate::CompareError;

/// Git config key supplying the default method.
pub const METHOD_KEY: &str = "compare.method";
/// Git config key supplying the default digest algorithm.
pub const ALGORITHM_KEY: &str = "compare.algorithm";

/// Settings for one comparison.
///
/// Built from defaults, then repository config, then command line flags,
/// each layer overriding the previous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareConfig {
    pub method: ComparisonMethod,
    /// Digest algorithm name as requested; checked by [`CompareConfig::algorithm`].
    pub algorithm: String,
    pub show_diff: bool,
    pub output: OutputConfig,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            method: ComparisonMethod::default(),
            algorithm: HashAlgorithm::default().name().to_string(),
            show_diff: false,
            output: OutputConfig::default(),
        }
    }
}

impl CompareConfig {
    /// Defaults overlaid with `compare.method` and `compare.algorithm`.
    pub fn from_repository(repo: &dyn RepositoryAccess) -> Result<Self, CompareError> {
        let mut config = Self::default();

        if let Some(method) = read(repo, METHOD_KEY)? {
            config.method = method.parse()?;
            tracing::debug!(key = METHOD_KEY, %method, "method from git config");
        }
        if let Some(algorithm) = read(repo, ALGORITHM_KEY)? {
            tracing::debug!(key = ALGORITHM_KEY, %algorithm, "algorithm from git config");
            config.algorithm = algorithm;
        }
        Ok(config)
    }

    /// Override the method by name, if one was given.
    pub fn with_method(mut self, name: Option<&str>) -> Result<Self, CompareError> {
        if let Some(name) = name {
            self.method = name.parse()?;
        }
        Ok(self)
    }

    /// Override the algorithm name, if one was given.
    pub fn with_algorithm(mut self, name: Option<&str>) -> Self {
        if let Some(name) = name {
            self.algorithm = name.to_string();
        }
        self
    }

    pub fn with_show_diff(mut self, show_diff: bool) -> Self {
        self.show_diff = self.show_diff || show_diff;
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// The digest algorithm, or `AlgorithmUnavailable` if the name is unknown.
    pub fn algorithm(&self) -> Result<HashAlgorithm, CompareError> {
        HashAlgorithm::from_name(&self.algorithm).ok_or_else(|| CompareError::AlgorithmUnavailable {
            name: self.algorithm.clone(),
            supported: HashAlgorithm::supported_names(),
        })
    }
}

fn read(repo: &dyn RepositoryAccess, key: &str) -> Result<Option<String>, CompareError> {
    let value = repo
        .config_get(key)
        .map_err(|e| CompareError::query(format!("read '{key}' from git config"), e))?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}
