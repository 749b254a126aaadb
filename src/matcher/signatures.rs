//! Compiled-in screen signatures.
//!
//! Description markers are checked with case-insensitive containment, so
//! they are written lowercase here. An empty description matches any node
//! with the given role.

/// A `(role substring, description substring)` pair identifying one piece
/// of UI chrome.
#[derive(Debug, Clone, Copy)]
pub struct NodePattern {
    pub role: &'static str,
    pub description: &'static str,
}

impl NodePattern {
    pub const fn new(role: &'static str, description: &'static str) -> Self {
        Self { role, description }
    }
}

/// Two-tier signature of a short-form playback screen: direct markers
/// (any one node is conclusive) and the redundant chrome checklist used
/// when no direct marker is present.
#[derive(Debug)]
pub struct ScreenSignature {
    pub direct: &'static [NodePattern],
    pub checklist: &'static [NodePattern],
}

/// The "navigate home" element for a family. Role is exact; the real
/// widgets carry fully-qualified class names while the chrome patterns
/// above only need substrings.
#[derive(Debug, Clone, Copy)]
pub struct HomeAffordance {
    pub role: &'static str,
    pub description: &'static str,
}

/// YouTube Shorts playback.
pub static SHORTS_PLAYBACK: ScreenSignature = ScreenSignature {
    direct: &[NodePattern::new(
        "viewgroup",
        "see more videos using this sound",
    )],
    checklist: &[
        NodePattern::new("button", "subscriptions"),
        NodePattern::new("horizontalscrollview", ""),
        NodePattern::new("view", "video progress"),
        NodePattern::new("imageview", "go to channel"),
        NodePattern::new("imageview", "search"),
        NodePattern::new("imageview", "more"),
        NodePattern::new("framelayout", ""),
        NodePattern::new("imagebutton", "navigate up"),
    ],
};

/// Instagram Reels playback.
pub static REELS_PLAYBACK: ScreenSignature = ScreenSignature {
    direct: &[NodePattern::new("viewgroup", "original audio")],
    checklist: &[
        NodePattern::new("imageview", "more"),
        NodePattern::new("imageview", "share"),
        NodePattern::new("imageview", "comment"),
        NodePattern::new("imageview", "like"),
        NodePattern::new("viewgroup", "reel"),
    ],
};

/// A feed/post browsing view, as opposed to short-form playback. The share
/// row on a regular post is the distinguishing marker.
pub static FEED_POST: NodePattern = NodePattern::new("viewgroup", "send post");

pub static HOME_YOUTUBE: HomeAffordance = HomeAffordance {
    role: "android.widget.Button",
    description: "home",
};

pub static HOME_INSTAGRAM: HomeAffordance = HomeAffordance {
    role: "android.widget.FrameLayout",
    description: "home",
};

/// URL fragments that mark browser tabs as short-form content.
pub static BLOCKED_URL_FRAGMENTS: &[&str] = &["youtube.com/shorts", "instagram.com/reels"];
