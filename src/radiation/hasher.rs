//! Deterministic digests of string collections.
use itertools::Itertools;
use sha2::{Digest, Sha256};

/// Returns the lower-case hex SHA-256 digest of some bytes.
pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Returns the digest of a collection of strings.
///
/// The strings are sorted and serialized as a JSON array before hashing, so the result does not
/// depend on the order of the input. Digests are strings too, hence combining several digests
/// into one is the same call.
///
/// # Examples
///
/// ```
/// use snn_radiation::radiation::hasher::digest;
///
/// assert_eq!(digest(&["b", "a"]), digest(&["a", "b"]));
/// assert_eq!(digest(&["a"]).len(), 64);
/// ```
pub fn digest<S: AsRef<str>>(values: &[S]) -> String {
    let sorted: Vec<&str> = values.iter().map(AsRef::as_ref).sorted().collect();
    let json = serde_json::to_string(&sorted).expect("A list of strings always serializes to JSON");
    sha256_hex(json.as_bytes())
}
