//! Logical request name → URL registry

use std::collections::HashMap;

/// Maps logical request names to target URLs.
///
/// Entries live for the lifetime of the process; there is no removal.
/// Registering an existing name replaces its URL.
#[derive(Debug, Clone, Default)]
pub struct RequestRegistry {
    requests: HashMap<String, String>,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) a logical request name
    pub fn register(&mut self, name: impl Into<String>, url: impl Into<String>) {
        let name = name.into();
        let url = url.into();
        tracing::debug!("Registered request '{}' -> {}", name, url);
        self.requests.insert(name, url);
    }

    /// Look up the URL for a logical name
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.requests.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.requests.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_registered_name() {
        let mut registry = RequestRegistry::new();
        registry.register("grid_request", "/grid/rows");
        assert_eq!(registry.resolve("grid_request"), Some("/grid/rows"));
        assert!(registry.contains("grid_request"));
    }

    #[test]
    fn test_resolve_unknown_name_is_none() {
        let registry = RequestRegistry::new();
        assert_eq!(registry.resolve("missing"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_twice_overwrites() {
        let mut registry = RequestRegistry::new();
        registry.register("r", "/old");
        registry.register("r", "/new");
        assert_eq!(registry.resolve("r"), Some("/new"));
        assert_eq!(registry.len(), 1);
    }
}
