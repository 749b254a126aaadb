//! Host-platform collaborators. The engine classifies and decides; the
//! platform observes and acts.

use crate::snapshot::{NodeId, SemanticNode};

/// Supplies point-in-time snapshots of the foreground UI.
///
/// `snapshot` must return an owned tree cloned out of the platform's live
/// structures at call time; the engine treats `None` as "no observation
/// possible this tick", never as an error.
pub trait SnapshotSource: Send + Sync {
    /// Identifier of the current foreground application, if known.
    fn foreground_app(&self) -> Option<String>;

    /// Fresh snapshot of the foreground UI tree.
    fn snapshot(&self) -> Option<SemanticNode>;
}

/// Corrective navigation primitives.
pub trait Navigator: Send + Sync {
    /// Simulated global back navigation.
    fn global_back(&self);

    /// Navigate to the launcher/home screen.
    fn global_home(&self);

    /// Activate (click) the node with the given id. Returns false when the
    /// node no longer exists or rejected the action.
    fn activate(&self, node: NodeId) -> bool;
}
