//! Client configuration.
//!
//! The defaults talk to the public NCBI E-utilities endpoint and need no file at all. A
//! TOML file can override any field:
//!
//! ```toml
//! base_url         = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/"
//! tool             = "pharmapapers"
//! email            = "me@example.com"
//! api_key          = "0123456789abcdef"
//! chunk_size       = 100
//! request_pause_ms = 500
//! ```

use url::Url;

use super::*;

/// Default E-utilities base URL.
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/";
/// Default tool name reported to NCBI.
pub const DEFAULT_TOOL: &str = "pubmed-pharma-papers";
/// Default contact email reported to NCBI.
pub const DEFAULT_EMAIL: &str = "your-email@example.com";
/// Default number of PMIDs per fetch request.
pub const DEFAULT_CHUNK_SIZE: usize = 100;
/// Default pause between fetch requests, in milliseconds.
pub const DEFAULT_REQUEST_PAUSE_MS: u64 = 500;

/// Settings for the PubMed client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// E-utilities base URL, `esearch.fcgi` and `efetch.fcgi` are resolved against it
  pub base_url:         String,
  /// Tool name sent with every request
  pub tool:             String,
  /// Contact email sent with every request
  pub email:            String,
  /// Optional NCBI API key, raises the rate limit when present
  pub api_key:          Option<String>,
  /// Number of PMIDs fetched per request
  pub chunk_size:       usize,
  /// Pause between consecutive fetch requests, in milliseconds
  pub request_pause_ms: u64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      base_url:         DEFAULT_BASE_URL.to_string(),
      tool:             DEFAULT_TOOL.to_string(),
      email:            DEFAULT_EMAIL.to_string(),
      api_key:          None,
      chunk_size:       DEFAULT_CHUNK_SIZE,
      request_pause_ms: DEFAULT_REQUEST_PAUSE_MS,
    }
  }
}

impl Config {
  /// Platform specific location of the configuration file, e.g.
  /// `~/.config/pharmapapers/config.toml` on Linux.
  pub fn default_path() -> Result<PathBuf> {
    dirs::config_dir()
      .map(|dir| dir.join("pharmapapers").join("config.toml"))
      .ok_or_else(|| PharmaError::Config("Could not determine the config directory".into()))
  }

  /// Loads the configuration from the default path, falling back to [`Config::default`]
  /// when no file exists there.
  pub fn load() -> Result<Self> {
    match Self::default_path() {
      Ok(path) if path.exists() => Self::from_path(path),
      _ => {
        debug!("No configuration file found, using defaults");
        Ok(Self::default())
      },
    }
  }

  /// Reads and validates a TOML configuration file. Missing fields take their defaults.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path)?;
    let config: Self = toml::from_str(&content)?;
    config.validate()
  }

  /// Checks the configuration and returns it unchanged when valid.
  pub fn validate(self) -> Result<Self> {
    if self.chunk_size == 0 {
      return Err(PharmaError::Config("chunk_size must be at least 1".into()));
    }
    if let Err(e) = self.base_url() {
      return Err(PharmaError::Config(format!("base_url {:?} is not a valid URL: {e}", self.base_url)));
    }
    Ok(self)
  }

  /// The parsed base URL, with a trailing slash so endpoints join below it.
  pub fn base_url(&self) -> Result<Url> {
    let mut base = self.base_url.clone();
    if !base.ends_with('/') {
      base.push('/');
    }
    Ok(Url::parse(&base)?)
  }

  /// The pause between consecutive fetch requests.
  pub fn request_pause(&self) -> Duration { Duration::from_millis(self.request_pause_ms) }

  /// Sets the base URL.
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  /// Sets the tool name.
  pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
    self.tool = tool.into();
    self
  }

  /// Sets the contact email.
  pub fn with_email(mut self, email: impl Into<String>) -> Self {
    self.email = email.into();
    self
  }

  /// Sets the API key.
  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  /// Sets the fetch chunk size.
  pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
    self.chunk_size = chunk_size;
    self
  }

  /// Sets the pause between fetch requests.
  pub fn with_request_pause(mut self, pause: Duration) -> Self {
    self.request_pause_ms = u64::try_from(pause.as_millis()).unwrap_or(u64::MAX);
    self
  }
}
