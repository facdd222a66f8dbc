// ABOUTME: Ordered collection of known_hosts records with strict and lenient loading
// ABOUTME: Runs candidate hostnames against every record, reporting all matches in file order

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::known_hosts::error::LoadError;
use crate::known_hosts::record::KnownHostRecord;

/// Every record of a known_hosts file, in file order.
#[derive(Debug, Default)]
pub struct KnownHosts {
    records: Vec<KnownHostRecord>,
}

impl KnownHosts {
    /// Parse file content strictly: the first malformed line fails the whole
    /// load. A known_hosts file is a trust set, so a partial load would
    /// silently shrink it.
    pub fn parse(content: &str) -> Result<Self, LoadError> {
        let mut records = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            match KnownHostRecord::parse(line) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(source) => {
                    return Err(LoadError::Line {
                        line: idx + 1,
                        source,
                    });
                }
            }
        }
        Ok(Self { records })
    }

    /// Like `parse`, but skips malformed lines instead of failing the load.
    /// Every skipped line is reported.
    pub fn parse_lenient(content: &str) -> Self {
        let mut records = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            match KnownHostRecord::parse(line) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(err) => {
                    warn!("skipping malformed known_hosts line {}: {}", idx + 1, err);
                }
            }
        }
        Self { records }
    }

    /// Read a known_hosts file from disk, strictly or leniently.
    pub fn load(path: &Path, strict: bool) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path)?;
        let hosts = if strict {
            Self::parse(&content)?
        } else {
            Self::parse_lenient(&content)
        };
        debug!(
            "loaded {} known_hosts records from {}",
            hosts.records.len(),
            path.display()
        );
        Ok(hosts)
    }

    /// All records covering `candidate`, in file order.
    ///
    /// A record the engine cannot evaluate (unsupported hash type) is logged
    /// and skipped so one odd entry never blocks the rest of the query.
    pub fn find(&self, candidate: &str) -> Vec<&KnownHostRecord> {
        self.records
            .iter()
            .filter(|record| match record.matches(candidate) {
                Ok(matched) => matched,
                Err(err) => {
                    warn!(
                        "cannot evaluate entry {:?}: {}",
                        record.host_pattern(),
                        err
                    );
                    false
                }
            })
            .collect()
    }

    pub fn records(&self) -> &[KnownHostRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use base64::prelude::*;
    use hmac::{Hmac, Mac};
    use sha1::Sha1;
    use tempfile::NamedTempFile;

    use crate::known_hosts::key::encode_fields;

    fn rsa_key() -> String {
        BASE64_STANDARD.encode(encode_fields(&[b"ssh-rsa", b"\x01\x00\x01", b"modulus"]))
    }

    fn hashed_pattern(host: &str, salt: &[u8]) -> String {
        let mut mac = Hmac::<Sha1>::new_from_slice(salt).unwrap();
        mac.update(host.as_bytes());
        let digest = mac.finalize().into_bytes();
        format!(
            "|1|{}|{}",
            BASE64_STANDARD.encode(salt),
            BASE64_STANDARD.encode(digest)
        )
    }

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_skips_blanks_and_comments() {
        let content = format!(
            "# header comment\n\nexample.com ssh-rsa {}\n\n# trailing\n",
            rsa_key()
        );
        let hosts = KnownHosts::parse(&content).unwrap();
        assert_eq!(hosts.len(), 1);
    }

    #[test]
    fn test_strict_parse_reports_offending_line_number() {
        let content = format!(
            "example.com ssh-rsa {}\nbroken-line-without-key\n",
            rsa_key()
        );
        let err = KnownHosts::parse(&content).unwrap_err();
        assert!(matches!(err, LoadError::Line { line: 2, .. }));
    }

    #[test]
    fn test_lenient_parse_keeps_the_good_lines() {
        let content = format!(
            "broken\nexample.com ssh-rsa {}\nalso broken !!!\n",
            rsa_key()
        );
        let hosts = KnownHosts::parse_lenient(&content);
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts.records()[0].host_pattern(), "example.com");
    }

    #[test]
    fn test_find_reports_all_matches_in_file_order() {
        let key = rsa_key();
        let content = format!(
            "example.com ssh-rsa {key} old-key\n\
             other.example.com ssh-rsa {key}\n\
             example.com ssh-ed25519 {key} rotated-key\n"
        );
        let hosts = KnownHosts::parse(&content).unwrap();
        let matches = hosts.find("example.com");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].comment(), Some("old-key"));
        assert_eq!(matches[1].comment(), Some("rotated-key"));
        assert!(hosts.find("nowhere.example.com").is_empty());
    }

    #[test]
    fn test_find_matches_hashed_and_plain_transparently() {
        let key = rsa_key();
        let content = format!(
            "{} ssh-rsa {key}\nexample.com ssh-rsa {key}\n",
            hashed_pattern("example.com", b"twenty-byte-salt-xyz")
        );
        let hosts = KnownHosts::parse(&content).unwrap();
        let matches = hosts.find("example.com");
        assert_eq!(matches.len(), 2);
        assert!(matches[0].is_hashed());
        assert_eq!(matches[0].resolved_host(), Some("example.com"));
    }

    #[test]
    fn test_unsupported_hash_entry_does_not_block_the_query() {
        let key = rsa_key();
        let content = format!(
            "|2|c2FsdA==|ZGlnZXN0| ssh-rsa {key}\nexample.com ssh-rsa {key}\n"
        );
        let hosts = KnownHosts::parse(&content).unwrap();
        let matches = hosts.find("example.com");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].host_pattern(), "example.com");
    }

    #[test]
    fn test_load_from_file_end_to_end() {
        let key = rsa_key();
        let content = format!(
            "# my hosts\nexample.com ssh-rsa {key} laptop\n{} ssh-ed25519 {key}\n",
            hashed_pattern("hidden.example.com", b"0123456789abcdef0123")
        );
        let file = create_temp_file(&content);

        let hosts = KnownHosts::load(file.path(), true).unwrap();
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts.find("example.com").len(), 1);
        assert_eq!(hosts.find("hidden.example.com").len(), 1);
        assert!(hosts.find("unknown.example.com").is_empty());
    }

    #[test]
    fn test_strict_load_fails_on_corrupt_file() {
        let file = create_temp_file("example.com ssh-rsa\n");
        assert!(KnownHosts::load(file.path(), true).is_err());
        let hosts = KnownHosts::load(file.path(), false).unwrap();
        assert!(hosts.is_empty());
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let file = create_temp_file("");
        let hosts = KnownHosts::load(file.path(), true).unwrap();
        assert!(hosts.is_empty());
    }
}
