pub mod fingerprint;
pub mod payloads;

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::path::Path;

use url::Url;

use crate::error::ConfigError;

/// Validates and normalizes a target URL. A missing scheme defaults to
/// http://; a URL without a host is rejected.
pub fn normalize_target(raw: &str) -> Result<Url, ConfigError> {
    let candidate = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let url = Url::parse(&candidate).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;

    if url.host_str().is_none() {
        return Err(ConfigError::MissingHost(raw.to_string()));
    }

    Ok(url)
}

/// Reads a file line-by-line, returning all non-empty trimmed lines.
pub fn read_lines(path: &str) -> io::Result<Vec<String>> {
    let file = File::open(Path::new(path))?;
    let reader = io::BufReader::new(file);
    let lines = reader
        .lines()
        .filter_map(|line| {
            let line = line.ok()?;
            let trimmed = line.trim().to_string();
            if trimmed.is_empty() { None } else { Some(trimmed) }
        })
        .collect();
    Ok(lines)
}

/// Initializes env_logger once, for binaries and examples that want output.
/// Safe to call multiple times.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}
