use nodekit_node_info::NodeId;

/// Key layout this node uses inside the coordination store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreNamespace {
    root: String,
    node_key: String,
}

impl StoreNamespace {
    /// Normalizes `prefix` to exactly one trailing `/` (empty means root).
    #[must_use]
    pub fn new(prefix: &str, node_id: NodeId) -> Self {
        let trimmed = prefix.trim().trim_matches('/');
        let root = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}/")
        };
        let node_key = format!("{root}peers/{node_id}");
        Self { root, node_key }
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[must_use]
    pub fn peers_prefix(&self) -> String {
        format!("{}peers/", self.root)
    }

    #[must_use]
    pub fn volumes_prefix(&self) -> String {
        format!("{}volumes/", self.root)
    }

    /// Key holding this node's own peer record.
    #[must_use]
    pub fn node_key(&self) -> &str {
        &self.node_key
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_normalization() {
        let id = NodeId::generate();
        for raw in ["storaged", "storaged/", "/storaged//", " storaged "] {
            let ns = StoreNamespace::new(raw, id);
            assert_eq!(ns.root(), "storaged/");
            assert_eq!(ns.node_key(), format!("storaged/peers/{id}"));
        }
    }

    #[test]
    fn test_empty_prefix_is_root() {
        let id = NodeId::generate();
        let ns = StoreNamespace::new("", id);
        assert_eq!(ns.peers_prefix(), "peers/");
        assert_eq!(ns.volumes_prefix(), "volumes/");
    }
}
