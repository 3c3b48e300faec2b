use sha2::{Digest, Sha256};

/// Computes the hex-encoded SHA-256 of a response body
///
/// Byte-identical bodies always produce the same 64-character string, so
/// callers can compare checksums across crawls to detect changed pages.
///
/// # Example
///
/// ```
/// use sitecrawl::crawler::checksum;
///
/// assert_eq!(
///     checksum(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn checksum(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}
