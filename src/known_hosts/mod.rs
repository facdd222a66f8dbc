// ABOUTME: SSH known_hosts parsing and host-matching engine
// ABOUTME: Handles plaintext and salted-hash host entries behind one matching interface

pub mod error;
pub mod key;
pub mod record;
pub mod store;

pub use error::{KeyBlobError, LoadError, RecordError, UnsupportedHashType};
pub use key::PublicKeyBlob;
pub use record::KnownHostRecord;
pub use store::KnownHosts;
