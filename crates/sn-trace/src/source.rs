//! Trace acquisition: download from the assignment server, with a local cache.
//!
//! The cache is an explicit read/write pair. A cached trace is only used when
//! it belongs to the same student, was fetched from the same URL and is not
//! older than the configured maximum age; anything else is ignored and the
//! trace is downloaded again.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::TraceError;
use crate::log::GameLog;

/// Assignment server serving one trace per student
pub const DEFAULT_BASE_URL: &str = "https://krr.cs.vu.nl/prins/assignment/v1";

/// Cached traces older than this are downloaded again
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how traces are obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSourceConfig {
    pub base_url: String,
    pub cache_dir: PathBuf,
    /// `None` keeps cached traces forever
    pub max_age: Option<Duration>,
    /// Skip the cache and download
    pub refresh: bool,
    /// Never touch the network
    pub offline: bool,
}

impl Default for TraceSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: default_cache_dir(),
            max_age: Some(DEFAULT_MAX_AGE),
            refresh: false,
            offline: false,
        }
    }
}

/// Default cache directory, falling back to the working directory.
pub fn default_cache_dir() -> PathBuf {
    let mut path = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("schnapsen-check");
    path
}

/// On-disk cache entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTrace {
    pub student_id: u64,
    pub source_url: String,
    /// Unix timestamp (seconds) of the download
    pub fetched_at: i64,
    pub game_log: GameLog,
}

/// Obtains the reference trace of a student.
#[derive(Debug, Clone)]
pub struct TraceSource {
    config: TraceSourceConfig,
    client: reqwest::blocking::Client,
}

impl TraceSource {
    pub fn new(config: TraceSourceConfig) -> Result<Self, TraceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &TraceSourceConfig {
        &self.config
    }

    pub fn trace_url(&self, student_id: u64) -> String {
        format!(
            "{}/{}/bot.gamelog",
            self.config.base_url.trim_end_matches('/'),
            student_id
        )
    }

    pub fn cache_path(&self, student_id: u64) -> PathBuf {
        self.config
            .cache_dir
            .join(format!(".schnapsen_rollout_cache_{student_id}.json"))
    }

    /// Cache first, then network. A fresh download is written back to the cache.
    pub fn load(&self, student_id: u64) -> Result<GameLog, TraceError> {
        if self.config.refresh {
            info!(student_id, "refresh requested, ignoring cached trace");
        } else if let Some(log) = self.read_cache(student_id)? {
            return Ok(log);
        }

        let log = self.fetch(student_id)?;
        if let Err(e) = self.write_cache(student_id, &log) {
            warn!(student_id, error = %e, "could not write trace cache");
        }
        Ok(log)
    }

    /// Download and parse the trace.
    pub fn fetch(&self, student_id: u64) -> Result<GameLog, TraceError> {
        if self.config.offline {
            return Err(TraceError::Offline { student_id });
        }

        let url = self.trace_url(student_id);
        info!(%url, "downloading reference trace");
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(TraceError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        let bytes = response.bytes()?;
        debug!(bytes = bytes.len(), "trace downloaded");
        GameLog::from_slice(&bytes)
    }

    /// Read the cached trace, `None` if absent or no longer valid.
    pub fn read_cache(&self, student_id: u64) -> Result<Option<GameLog>, TraceError> {
        self.read_cache_at(student_id, Utc::now())
    }

    fn read_cache_at(
        &self,
        student_id: u64,
        now: DateTime<Utc>,
    ) -> Result<Option<GameLog>, TraceError> {
        let path = self.cache_path(student_id);
        if !path.exists() {
            debug!(path = %path.display(), "no cached trace");
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let cached: CachedTrace = match serde_json::from_slice(&bytes) {
            Ok(cached) => cached,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable trace cache");
                return Ok(None);
            }
        };

        if let Some(reason) = self.invalidation_reason(&cached, student_id, now) {
            info!(path = %path.display(), %reason, "cached trace is stale");
            return Ok(None);
        }
        if let Err(e) = cached.game_log.validate() {
            warn!(path = %path.display(), error = %e, "ignoring cached trace");
            return Ok(None);
        }

        info!(path = %path.display(), "using cached trace");
        Ok(Some(cached.game_log))
    }

    fn invalidation_reason(
        &self,
        cached: &CachedTrace,
        student_id: u64,
        now: DateTime<Utc>,
    ) -> Option<String> {
        if cached.student_id != student_id {
            return Some(format!("cached for student {}", cached.student_id));
        }
        let url = self.trace_url(student_id);
        if cached.source_url != url {
            return Some(format!("fetched from {}", cached.source_url));
        }
        let max_age = self.config.max_age?;
        let age = now.timestamp().saturating_sub(cached.fetched_at);
        if age < 0 || age as u64 > max_age.as_secs() {
            let fetched = DateTime::from_timestamp(cached.fetched_at, 0)
                .map_or_else(|| cached.fetched_at.to_string(), |t| t.to_rfc3339());
            return Some(format!("fetched at {fetched}"));
        }
        None
    }

    /// Store a trace in the cache. Returns the cache file path.
    pub fn write_cache(&self, student_id: u64, log: &GameLog) -> Result<PathBuf, TraceError> {
        self.write_cache_at(student_id, log, Utc::now())
    }

    fn write_cache_at(
        &self,
        student_id: u64,
        log: &GameLog,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, TraceError> {
        fs::create_dir_all(&self.config.cache_dir)?;
        let entry = CachedTrace {
            student_id,
            source_url: self.trace_url(student_id),
            fetched_at: now.timestamp(),
            game_log: log.clone(),
        };

        // write then rename so a crash never leaves half a cache file
        let path = self.cache_path(student_id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(&entry)?)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "trace cached");
        Ok(path)
    }

    /// Remove the cached trace, if any.
    pub fn invalidate(&self, student_id: u64) -> Result<(), TraceError> {
        let path = self.cache_path(student_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Read a trace from a local file.
pub fn load_trace_file(path: impl AsRef<Path>) -> Result<GameLog, TraceError> {
    let bytes = fs::read(path)?;
    GameLog::from_slice(&bytes)
}
