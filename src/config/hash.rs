//! Content hashing for templates and function descriptors.
//!
//! Digests are reported with each deployment so two runs can be compared
//! without diffing the template bodies by hand.

use sha2::{Digest, Sha256};

use super::spec::FunctionSpec;

/// Hasher for computing deterministic digests.
#[derive(Debug, Default)]
pub struct ConfigHasher;

impl ConfigHasher {
    /// Creates a new hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the SHA-256 digest of a template body.
    #[must_use]
    pub fn hash_template(&self, body: &str) -> String {
        hex::encode(Sha256::digest(body.as_bytes()))
    }

    /// Computes a digest over the function descriptors, in order.
    ///
    /// Field values are length-prefixed so adjacent fields cannot run together.
    #[must_use]
    pub fn hash_functions(&self, functions: &[FunctionSpec]) -> String {
        let mut hasher = Sha256::new();

        for function in functions {
            for field in [
                &function.name,
                &function.description,
                &function.handler,
                &function.role,
                &function.runtime,
            ] {
                hasher.update((field.len() as u64).to_be_bytes());
                hasher.update(field.as_bytes());
            }
            hasher.update(function.timeout.to_be_bytes());
            hasher.update(function.memory_size.to_be_bytes());
        }

        hex::encode(hasher.finalize())
    }

    /// Returns a short (12 character) prefix of a digest for display.
    #[must_use]
    pub fn short(digest: &str) -> &str {
        &digest[..12.min(digest.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str, timeout: u32) -> FunctionSpec {
        FunctionSpec {
            name: name.to_string(),
            description: String::from("d"),
            handler: String::from("h"),
            role: String::from("r"),
            runtime: String::from("py1"),
            timeout,
            memory_size: 128,
        }
    }

    #[test]
    fn test_template_hash_deterministic() {
        let hasher = ConfigHasher::new();
        let a = hasher.hash_template("Resources: {}\n");
        let b = hasher.hash_template("Resources: {}\n");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hasher.hash_template("Resources: []\n"));
    }

    #[test]
    fn test_function_hash_changes() {
        let hasher = ConfigHasher::new();
        let base = hasher.hash_functions(&[function("fnA", 30)]);
        assert_ne!(base, hasher.hash_functions(&[function("fnA", 60)]));
        assert_ne!(base, hasher.hash_functions(&[function("fnB", 30)]));
        assert_eq!(base, hasher.hash_functions(&[function("fnA", 30)]));
    }

    #[test]
    fn test_short_digest() {
        assert_eq!(ConfigHasher::short("0123456789abcdef"), "0123456789ab");
        assert_eq!(ConfigHasher::short("abc"), "abc");
    }
}
