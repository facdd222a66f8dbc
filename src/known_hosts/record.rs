// ABOUTME: One parsed known_hosts line: marker, host pattern, key type, key blob, comment
// ABOUTME: Matches candidate hosts against plaintext or salted-HMAC-hashed host fields

use std::fmt;

use base64::prelude::*;
use hmac::{Hmac, Mac};
use once_cell::sync::OnceCell;
use sha1::Sha1;

use crate::known_hosts::error::{RecordError, UnsupportedHashType};
use crate::known_hosts::key::PublicKeyBlob;

type HmacSha1 = Hmac<Sha1>;

/// The one hash algorithm tag OpenSSH has ever used for hashed hostnames.
const SUPPORTED_HASH_TYPE: &str = "1";

/// How a record's host field identifies its host.
#[derive(Debug, Clone)]
enum HostForm {
    /// Bare hostname, compared by exact case-sensitive equality.
    Plain(String),
    /// `|1|salt|digest` triple; the hostname is only recoverable by hashing
    /// candidate names against the salt.
    Hashed {
        hash_type: String,
        salt: Vec<u8>,
        digest: Vec<u8>,
    },
}

/// One entry of a known_hosts file.
///
/// Immutable after parsing except for `resolved_host`, a write-once cell
/// that remembers the plaintext name of a hashed entry once a candidate has
/// been confirmed against it. Plaintext entries have it filled at parse
/// time.
#[derive(Debug, Clone)]
pub struct KnownHostRecord {
    raw_line: String,
    markers: Option<String>,
    host_pattern: String,
    key_type: String,
    key: PublicKeyBlob,
    comment: Option<String>,
    form: HostForm,
    resolved_host: OnceCell<String>,
}

impl KnownHostRecord {
    /// Parse one known_hosts line. Blank lines and `#` comments yield
    /// `Ok(None)`; anything else must be a complete record.
    pub fn parse(line: &str) -> Result<Option<Self>, RecordError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let raw_line = line.to_string();
        let (markers, line) = if line.starts_with('@') {
            let (marker, rest) = line
                .split_once(' ')
                .ok_or(RecordError::MissingField("host"))?;
            (Some(marker.to_string()), rest)
        } else {
            (None, line)
        };

        let (host_pattern, line) = line
            .split_once(' ')
            .ok_or(RecordError::MissingField("key type"))?;
        let (key_type, rest) = line
            .split_once(' ')
            .ok_or(RecordError::MissingField("key"))?;
        let (encoded_key, comment) = match rest.split_once(' ') {
            Some((key, comment)) => (key, Some(comment.to_string())),
            None => (rest, None),
        };

        let key = PublicKeyBlob::parse(encoded_key)?;
        let form = parse_host_form(host_pattern)?;

        let resolved_host = OnceCell::new();
        if let HostForm::Plain(host) = &form {
            let _ = resolved_host.set(host.clone());
        }

        Ok(Some(Self {
            raw_line,
            markers,
            host_pattern: host_pattern.to_string(),
            key_type: key_type.to_string(),
            key,
            comment,
            form,
            resolved_host,
        }))
    }

    /// Does this record cover `candidate`?
    ///
    /// Plaintext entries compare by exact string equality. Hashed entries
    /// compute HMAC-SHA1 over the candidate with the stored salt and compare
    /// against the stored digest in constant time; a confirmed candidate is
    /// cached so later calls and display can reuse the plaintext name.
    pub fn matches(&self, candidate: &str) -> Result<bool, UnsupportedHashType> {
        match &self.form {
            HostForm::Plain(host) => Ok(host == candidate),
            HostForm::Hashed {
                hash_type,
                salt,
                digest,
            } => {
                if self.resolved_host.get().is_some_and(|h| h == candidate) {
                    return Ok(true);
                }
                if hash_type != SUPPORTED_HASH_TYPE {
                    return Err(UnsupportedHashType(hash_type.clone()));
                }
                let mut mac = HmacSha1::new_from_slice(salt)
                    .expect("HMAC accepts keys of any length");
                mac.update(candidate.as_bytes());
                // verify_slice compares in constant time
                if mac.verify_slice(digest).is_ok() {
                    // First confirmed candidate wins; set() is a no-op after
                    // that, which is the behavior we want.
                    let _ = self.resolved_host.set(candidate.to_string());
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// The plaintext hostname, if known: always for plaintext entries, and
    /// for hashed entries only after a successful match.
    pub fn resolved_host(&self) -> Option<&str> {
        self.resolved_host.get().map(String::as_str)
    }

    pub fn is_hashed(&self) -> bool {
        matches!(self.form, HostForm::Hashed { .. })
    }

    pub fn raw_line(&self) -> &str {
        &self.raw_line
    }

    pub fn markers(&self) -> Option<&str> {
        self.markers.as_deref()
    }

    /// The host field exactly as written, `|`-delimited if hashed.
    pub fn host_pattern(&self) -> &str {
        &self.host_pattern
    }

    pub fn key_type(&self) -> &str {
        &self.key_type
    }

    pub fn key(&self) -> &PublicKeyBlob {
        &self.key
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

impl fmt::Display for KnownHostRecord {
    /// Shows the resolved hostname when known, otherwise the original
    /// (possibly hashed) host field, then key type and base64 key text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let host = self.resolved_host().unwrap_or(&self.host_pattern);
        write!(f, "{} {} {}", host, self.key_type, self.key.encoded())
    }
}

fn parse_host_form(host_pattern: &str) -> Result<HostForm, RecordError> {
    let parts: Vec<&str> = host_pattern.trim_matches('|').split('|').collect();
    match parts.as_slice() {
        [host] => Ok(HostForm::Plain((*host).to_string())),
        [hash_type, salt, digest] => {
            let salt = BASE64_STANDARD
                .decode(salt)
                .map_err(RecordError::HashedHostEncoding)?;
            let digest = BASE64_STANDARD
                .decode(digest)
                .map_err(RecordError::HashedHostEncoding)?;
            Ok(HostForm::Hashed {
                hash_type: (*hash_type).to_string(),
                salt,
                digest,
            })
        }
        _ => Err(RecordError::MalformedHostField),
    }
}
