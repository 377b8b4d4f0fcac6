use nodekit_node_info::NodeId;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a transaction initiated on this node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxnId {
    pub initiator: NodeId,
    pub seq: u64,
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.initiator, self.seq)
    }
}

/// Handle to the distributed transaction framework.
///
/// The framework runs multi-step operations across peers; this handle only
/// ties it to the local node and hands out transaction ids.
#[derive(Debug)]
pub struct TxnFramework {
    node_id: NodeId,
    next_seq: AtomicU64,
}

impl TxnFramework {
    #[must_use]
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            next_seq: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Allocate a new transaction id, unique within this process.
    #[must_use]
    pub fn begin(&self) -> TxnId {
        TxnId {
            initiator: self.node_id,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_are_unique_across_threads() {
        let fw = Arc::new(TxnFramework::new(NodeId::generate()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let fw = Arc::clone(&fw);
                std::thread::spawn(move || (0..100).map(|_| fw.begin()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert_eq!(id.initiator, fw.node_id());
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 400);
    }

    #[test]
    fn test_display() {
        let node = NodeId::generate();
        let id = TxnFramework::new(node).begin();
        assert_eq!(id.to_string(), format!("{node}/1"));
    }
}
