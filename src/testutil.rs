//! Shared fakes for unit tests: a scripted snapshot source and a navigator
//! that records every primitive it is asked to perform.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::platform::{Navigator, SnapshotSource};
use crate::settings::SettingsStore;
use crate::snapshot::{NodeId, SemanticNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Back,
    Home,
    Activate(u64),
}

#[derive(Default)]
pub struct MockSource {
    app: Mutex<Option<String>>,
    tree: Mutex<Option<SemanticNode>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_app(&self, app_id: Option<&str>) {
        *self.app.lock().unwrap() = app_id.map(str::to_string);
    }

    pub fn set_tree(&self, tree: Option<SemanticNode>) {
        *self.tree.lock().unwrap() = tree;
    }
}

impl SnapshotSource for MockSource {
    fn foreground_app(&self) -> Option<String> {
        self.app.lock().unwrap().clone()
    }

    fn snapshot(&self) -> Option<SemanticNode> {
        self.tree.lock().unwrap().clone()
    }
}

pub struct RecordingNavigator {
    actions: Mutex<Vec<NavAction>>,
    activate_ok: AtomicBool,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            activate_ok: AtomicBool::new(true),
        }
    }

    pub fn actions(&self) -> Vec<NavAction> {
        self.actions.lock().unwrap().clone()
    }

    /// Make subsequent `activate` calls report failure.
    pub fn fail_activation(&self) {
        self.activate_ok.store(false, Ordering::SeqCst);
    }
}

impl Navigator for RecordingNavigator {
    fn global_back(&self) {
        self.actions.lock().unwrap().push(NavAction::Back);
    }

    fn global_home(&self) {
        self.actions.lock().unwrap().push(NavAction::Home);
    }

    fn activate(&self, node: NodeId) -> bool {
        self.actions.lock().unwrap().push(NavAction::Activate(node.0));
        self.activate_ok.load(Ordering::SeqCst)
    }
}

pub fn settings_in(dir: &tempfile::TempDir) -> Arc<SettingsStore> {
    Arc::new(SettingsStore::new(dir.path().join("settings.json")).unwrap())
}

/// Minimal Reels playback tree: carries the direct marker only.
pub fn reels_tree() -> SemanticNode {
    SemanticNode::new("android.widget.FrameLayout").with_children(vec![
        SemanticNode::new("android.view.ViewGroup").with_description("Original audio"),
    ])
}

/// Minimal Shorts playback tree: carries the direct marker only.
pub fn shorts_tree() -> SemanticNode {
    SemanticNode::new("android.widget.FrameLayout").with_children(vec![
        SemanticNode::new("android.view.ViewGroup")
            .with_description("See more videos using this sound"),
    ])
}

/// A regular feed post view (share row present, no playback chrome).
pub fn feed_post_tree() -> SemanticNode {
    SemanticNode::new("android.widget.FrameLayout").with_children(vec![
        SemanticNode::new("android.view.ViewGroup").with_description("Send post"),
    ])
}
