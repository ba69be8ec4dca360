//! Stream-fetch stage of the capture pipeline.
//!
//! Pulls the live byte stream from the configured endpoint with blocking
//! HTTP and feeds fixed-size chunks into the pipeline channel. The read
//! blocks until the remote stream ends or errors; a hung-up consumer ends
//! the fetch cleanly.

use std::io::Read;
use std::path::Path;
use std::sync::mpsc::SyncSender;

use log::{debug, info};

use crate::utils::config::STREAM_CONNECT_TIMEOUT;
use crate::utils::error::{ConfigError, FetchError};

/// Chunk size pushed into the channel per read
const CHUNK_BYTES: usize = 8 * 1024;

/// Basic-auth credentials for the stream endpoint
#[derive(Debug, Clone)]
pub struct StreamCredentials {
    pub username: String,
    pub password: String,
}

/// Parse the `key=value` credentials file (username, password fields).
///
/// Unknown keys and blank or `#`-comment lines are ignored.
pub fn read_credentials(path: &Path) -> Result<StreamCredentials, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;

    let mut username = None;
    let mut password = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                "username" => username = Some(value.trim().to_string()),
                "password" => password = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    Ok(StreamCredentials {
        username: username.ok_or(ConfigError::MissingField("username"))?,
        password: password.ok_or(ConfigError::MissingField("password"))?,
    })
}

/// Stream the endpoint body into `tx` until EOF, error, or consumer hang-up.
///
/// Returns the number of bytes forwarded.
pub fn fetch_stream(
    url: &str,
    credentials: &StreamCredentials,
    tx: SyncSender<Vec<u8>>,
) -> Result<u64, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .connect_timeout(STREAM_CONNECT_TIMEOUT)
        .build()?;

    info!("fetching stream from {url}");

    let mut response = client
        .get(url)
        .basic_auth(&credentials.username, Some(&credentials.password))
        .send()?;

    if !response.status().is_success() {
        return Err(FetchError::BadStatus(response.status().as_u16()));
    }

    let mut total: u64 = 0;
    let mut buf = vec![0u8; CHUNK_BYTES];

    loop {
        let n = response.read(&mut buf).map_err(FetchError::ReadFailed)?;
        if n == 0 {
            break;
        }
        total += n as u64;

        // A closed receiver means the consumer is gone; stop fetching.
        if tx.send(buf[..n].to_vec()).is_err() {
            debug!("stream consumer hung up after {total} bytes");
            break;
        }
    }

    info!("stream fetch finished: {total} bytes");
    Ok(total)
}
