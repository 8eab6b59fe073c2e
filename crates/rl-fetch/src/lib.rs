//! Allow-list retrieval for RefLens
//!
//! The classification core never touches the network: this crate owns the
//! transport for the internal-domains allow-list and hands the parsed
//! list to callers. Fetch once, pass the list into classification calls,
//! refetch on whatever cadence the caller chooses - no retry or caching
//! policy lives here, and a failed fetch simply means classifying without
//! a list.

use std::path::Path;

use rl_core::AllowList;

/// Error type for allow-list retrieval.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to read '{path}': {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
}

/// Fetch and parse an allow-list over HTTP(S).
pub async fn fetch_allow_list(url: &str) -> Result<AllowList, FetchError> {
    let response = reqwest::get(url).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let body = response.text().await?;
    let list = AllowList::parse(&body);
    log::debug!("fetched allow-list from {url}: {} entries", list.len());

    Ok(list)
}

/// Read and parse an allow-list from a local file.
pub fn read_allow_list_file<P: AsRef<Path>>(path: P) -> Result<AllowList, FetchError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| FetchError::File {
        path: path.display().to_string(),
        source,
    })?;

    Ok(AllowList::parse(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_allow_list_file() {
        let path = std::env::temp_dir().join("rl-fetch-test-allowlist.txt");
        std::fs::write(&path, "*.vodafone.nl\n_partial_matches_\nintranet\n").unwrap();

        let list = read_allow_list_file(&path).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.is_internal("mail.vodafone.nl"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_allow_list_file("/nonexistent/allowlist.txt").unwrap_err();
        assert!(matches!(err, FetchError::File { .. }));
        assert!(err.to_string().contains("/nonexistent/allowlist.txt"));
    }
}
