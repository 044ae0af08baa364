//! Canonical store-path resolution.
//!
//! # Responsibilities
//! - Derive the backend key for an inbound request path
//! - Compensate for the host platform trimming the mount prefix
//!   (a matched mount can leave the visible path empty)
//!
//! # Design Decisions
//! - Pure and total: any input string resolves, no failure mode
//! - Exactly one separator between namespace and path, never doubled
//! - Empty input is treated as `/`

/// Resolves raw inbound paths to keys under a fixed store namespace.
#[derive(Debug, Clone)]
pub struct PathResolver {
    namespace: String,
}

impl PathResolver {
    /// Create a resolver for the given namespace segment.
    /// Surrounding separators on the namespace are ignored.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().trim_matches('/').to_string(),
        }
    }

    /// Map a raw request path to its canonical store key.
    ///
    /// The result always starts with `<namespace>/` and contains no doubled
    /// separators; runs of `/` in the input are collapsed.
    pub fn resolve(&self, raw_path: &str) -> String {
        let mut resolved = String::with_capacity(self.namespace.len() + raw_path.len() + 1);
        resolved.push_str(&self.namespace);
        resolved.push('/');

        let mut prev_sep = true;
        for c in raw_path.chars() {
            if c == '/' {
                if prev_sep {
                    continue;
                }
                prev_sep = true;
            } else {
                prev_sep = false;
            }
            resolved.push(c);
        }
        resolved
    }

    /// The configured namespace segment.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_equals_root() {
        let resolver = PathResolver::new("app");
        assert_eq!(resolver.resolve(""), resolver.resolve("/"));
        assert_eq!(resolver.resolve(""), "app/");
    }

    #[test]
    fn prefixes_namespace_with_single_separator() {
        let resolver = PathResolver::new("app");
        assert_eq!(resolver.resolve("/posts/"), "app/posts/");
        assert_eq!(resolver.resolve("/posts/abc123"), "app/posts/abc123");
        assert_eq!(resolver.resolve("posts"), "app/posts");
    }

    #[test]
    fn never_doubles_separators() {
        let resolver = PathResolver::new("app");
        for raw in ["", "/", "//", "//posts//x", "///", "/posts//"] {
            let resolved = resolver.resolve(raw);
            assert!(!resolved.contains("//"), "{raw:?} -> {resolved:?}");
            assert!(resolved.starts_with("app/"), "{raw:?} -> {resolved:?}");
        }
    }

    #[test]
    fn namespace_separators_are_trimmed() {
        let resolver = PathResolver::new("/app/");
        assert_eq!(resolver.namespace(), "app");
        assert_eq!(resolver.resolve("/posts/"), "app/posts/");
    }
}
