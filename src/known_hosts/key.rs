// ABOUTME: Decoder for the SSH length-prefixed binary public-key wire format
// ABOUTME: Splits a base64 key blob into the opaque fields packed inside it

use base64::prelude::*;

use crate::known_hosts::error::KeyBlobError;

/// A public key as it appears in a known_hosts record: the original base64
/// text (kept for display) plus the opaque fields packed inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyBlob {
    encoded: String,
    fields: Vec<Vec<u8>>,
}

impl PublicKeyBlob {
    pub fn parse(encoded: &str) -> Result<Self, KeyBlobError> {
        let binary = BASE64_STANDARD.decode(encoded)?;
        let fields = decode_fields(&binary, None)?;
        Ok(Self {
            encoded: encoded.to_string(),
            fields,
        })
    }

    /// The base64 text exactly as it appeared in the file.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn fields(&self) -> &[Vec<u8>] {
        &self.fields
    }

    /// The first field, which the wire format reserves for the algorithm name.
    pub fn algorithm(&self) -> Option<&[u8]> {
        self.fields.first().map(Vec::as_slice)
    }
}

/// Split a decoded key blob into its length-prefixed fields.
///
/// The wire format is a contiguous sequence of `{4-byte big-endian length}`
/// `{length bytes}` records. `max_fields` stops consumption after that many
/// fields, which lets a caller decode just the algorithm name without
/// touching the rest of the blob. An empty buffer yields an empty sequence.
pub fn decode_fields(
    mut data: &[u8],
    max_fields: Option<usize>,
) -> Result<Vec<Vec<u8>>, KeyBlobError> {
    let mut fields = Vec::new();
    while !data.is_empty() && max_fields.is_none_or(|max| fields.len() < max) {
        if data.len() < 4 {
            return Err(KeyBlobError::TruncatedPrefix {
                remaining: data.len(),
            });
        }
        let declared = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
        let rest = &data[4..];
        if rest.len() < declared {
            return Err(KeyBlobError::TruncatedField {
                declared,
                remaining: rest.len(),
            });
        }
        fields.push(rest[..declared].to_vec());
        data = &rest[declared..];
    }
    Ok(fields)
}

/// Inverse of `decode_fields`, used by tests to build well-formed blobs.
#[cfg(test)]
pub(crate) fn encode_fields(fields: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    for field in fields {
        out.extend_from_slice(&(field.len() as u32).to_be_bytes());
        out.extend_from_slice(field);
    }
    out
}
