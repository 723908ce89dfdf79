use k8s_openapi::ByteString;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Fingerprints rendered configuration so that any change to it changes the pod template.
///
/// Keys are fed in sorted order together with their values, so the result only depends
/// on the content of `data`.
pub fn config_hash(data: &BTreeMap<String, ByteString>) -> String {
    let mut hasher = Sha256::new();

    for (key, value) in data.iter() {
        hasher.update(key.as_bytes());
        hasher.update([0u8]);
        hasher.update(&value.0);
        hasher.update([0u8]);
    }

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use k8s_openapi::ByteString;
    use std::collections::BTreeMap;

    use super::config_hash;

    fn data(entries: &[(&str, &str)]) -> BTreeMap<String, ByteString> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), ByteString(value.as_bytes().to_vec())))
            .collect()
    }

    #[test]
    fn hash_is_stable() {
        let config = data(&[("heat.conf", "[DEFAULT]\ndebug=true\n"), ("my.cnf", "[client]\n")]);

        assert_eq!(config_hash(&config), config_hash(&config.clone()));
        assert_eq!(config_hash(&config).len(), 64);
    }

    #[test]
    fn hash_tracks_content() {
        let before = data(&[("heat.conf", "[DEFAULT]\ndebug=true\n")]);
        let after = data(&[("heat.conf", "[DEFAULT]\ndebug=false\n")]);

        assert_ne!(config_hash(&before), config_hash(&after));
    }

    #[test]
    fn key_value_boundaries_matter() {
        let joined = data(&[("ab", "c")]);
        let split = data(&[("a", "bc")]);

        assert_ne!(config_hash(&joined), config_hash(&split));
    }
}
