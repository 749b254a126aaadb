//! Stateless pattern matching over a tree snapshot.
//!
//! Two-tier detection: a cheap direct marker (one node carrying the
//! playback chrome description) and an exhaustive signature checklist as
//! fallback, because short-form UIs shuffle their markers between releases
//! and no single signal survives every version.

pub mod signatures;

use crate::registry::AppFamily;
use crate::snapshot::SemanticNode;

pub use signatures::{HomeAffordance, NodePattern, ScreenSignature};

/// Case-insensitive substring containment. An empty needle matches anything.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl NodePattern {
    /// A node matches when its role contains the role substring and its
    /// description contains the description substring.
    pub fn matches(&self, node: &SemanticNode) -> bool {
        contains_ignore_case(&node.role, self.role)
            && contains_ignore_case(node.description_or_empty(), self.description)
    }
}

/// True if any node in the tree matches the pattern. Pre-order, first hit wins.
fn tree_contains(root: &SemanticNode, pattern: &NodePattern) -> bool {
    root.visit(&mut |node| pattern.matches(node))
}

/// Does this tree represent short-form content playback for the given
/// signature?
///
/// A single node matching any direct marker is enough. Failing that, the
/// screen matches only if every checklist entry is found somewhere in the
/// tree — a conjunction, so one missing piece of chrome rules the screen
/// out.
pub fn matches_short_form(root: &SemanticNode, signature: &ScreenSignature) -> bool {
    let direct_hit = root.visit(&mut |node| {
        signature.direct.iter().any(|pattern| pattern.matches(node))
    });
    if direct_hit {
        return true;
    }

    !signature.checklist.is_empty()
        && signature
            .checklist
            .iter()
            .all(|pattern| tree_contains(root, pattern))
}

/// Does this tree represent a feed/post browsing view (as opposed to
/// short-form playback)? Used to decide whether index-based scroll inside
/// the app should count toward the budget at all.
pub fn matches_feed_post(root: &SemanticNode) -> bool {
    tree_contains(root, &signatures::FEED_POST)
}

/// Find the per-family "navigate home" affordance, if the family has one.
/// Role is an exact match; description is case-insensitive containment.
pub fn find_home_affordance<'a>(
    root: &'a SemanticNode,
    family: AppFamily,
) -> Option<&'a SemanticNode> {
    let affordance = family.home_affordance()?;
    find_node(root, &|node| {
        node.role == affordance.role
            && contains_ignore_case(node.description_or_empty(), affordance.description)
    })
}

/// True if any node's text or description carries a blocked URL fragment.
/// This is the browser-side detection: the address bar and link previews
/// surface the URL as plain node text.
pub fn matches_blocked_web_content(root: &SemanticNode) -> bool {
    root.visit(&mut |node| {
        signatures::BLOCKED_URL_FRAGMENTS.iter().any(|fragment| {
            contains_ignore_case(node.text_or_empty(), fragment)
                || contains_ignore_case(node.description_or_empty(), fragment)
        })
    })
}

fn find_node<'a>(
    root: &'a SemanticNode,
    predicate: &impl Fn(&SemanticNode) -> bool,
) -> Option<&'a SemanticNode> {
    if predicate(root) {
        return Some(root);
    }
    root.children
        .iter()
        .find_map(|child| find_node(child, predicate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SemanticNode;

    fn node(role: &str, description: &str) -> SemanticNode {
        let node = SemanticNode::new(role);
        if description.is_empty() {
            node
        } else {
            node.with_description(description)
        }
    }

    /// A tree carrying every checklist entry of the Shorts signature, each
    /// at a different depth.
    fn shorts_chrome_tree() -> SemanticNode {
        node("android.widget.FrameLayout", "").with_children(vec![
            node("android.widget.Button", "Subscriptions"),
            node("android.widget.HorizontalScrollView", "").with_children(vec![
                node("android.view.View", "Video Progress"),
                node("android.widget.ImageView", "Go to channel"),
            ]),
            node("android.view.ViewGroup", "").with_children(vec![
                node("android.widget.ImageView", "Search"),
                node("android.widget.ImageView", "More"),
                node("android.widget.ImageButton", "Navigate up"),
            ]),
        ])
    }

    #[test]
    fn direct_marker_hits_at_any_depth() {
        let tree = node("android.widget.FrameLayout", "").with_children(vec![node(
            "android.view.ViewGroup",
            "",
        )
        .with_children(vec![node(
            "android.view.ViewGroup",
            "See more videos using this sound",
        )])]);
        assert!(matches_short_form(&tree, &signatures::SHORTS_PLAYBACK));
    }

    #[test]
    fn direct_marker_is_case_insensitive() {
        let tree = node("android.view.viewgroup", "SEE MORE VIDEOS USING THIS SOUND");
        assert!(matches_short_form(&tree, &signatures::SHORTS_PLAYBACK));
    }

    #[test]
    fn full_checklist_matches_regardless_of_nesting() {
        assert!(matches_short_form(
            &shorts_chrome_tree(),
            &signatures::SHORTS_PLAYBACK
        ));
    }

    #[test]
    fn checklist_order_does_not_matter() {
        // Same entries as shorts_chrome_tree, shuffled into a flat list.
        let tree = node("android.widget.FrameLayout", "").with_children(vec![
            node("android.widget.ImageButton", "Navigate up"),
            node("android.widget.ImageView", "More"),
            node("android.widget.ImageView", "Search"),
            node("android.widget.ImageView", "Go to channel"),
            node("android.view.View", "Video Progress"),
            node("android.widget.HorizontalScrollView", ""),
            node("android.widget.Button", "Subscriptions"),
        ]);
        assert!(matches_short_form(&tree, &signatures::SHORTS_PLAYBACK));
    }

    #[test]
    fn one_missing_checklist_entry_rules_the_screen_out() {
        let mut tree = shorts_chrome_tree();
        // Drop the subtree holding "Video Progress" and "Go to channel".
        tree.children.remove(1);
        assert!(!matches_short_form(&tree, &signatures::SHORTS_PLAYBACK));
    }

    #[test]
    fn empty_tree_matches_nothing() {
        let tree = node("android.widget.FrameLayout", "");
        assert!(!matches_short_form(&tree, &signatures::SHORTS_PLAYBACK));
        assert!(!matches_short_form(&tree, &signatures::REELS_PLAYBACK));
        assert!(!matches_feed_post(&tree));
    }

    #[test]
    fn matching_is_idempotent_on_the_same_tree() {
        let tree = shorts_chrome_tree();
        let first = matches_short_form(&tree, &signatures::SHORTS_PLAYBACK);
        let second = matches_short_form(&tree, &signatures::SHORTS_PLAYBACK);
        assert_eq!(first, second);
    }

    #[test]
    fn reels_direct_marker_matches() {
        let tree = node("android.widget.FrameLayout", "").with_children(vec![node(
            "android.view.ViewGroup",
            "Original audio",
        )]);
        assert!(matches_short_form(&tree, &signatures::REELS_PLAYBACK));
    }

    #[test]
    fn reels_checklist_requires_every_entry() {
        let tree = node("android.widget.FrameLayout", "").with_children(vec![
            node("android.widget.ImageView", "More"),
            node("android.widget.ImageView", "Share"),
            node("android.widget.ImageView", "Comment"),
            node("android.widget.ImageView", "Like"),
        ]);
        // "Reel" group missing.
        assert!(!matches_short_form(&tree, &signatures::REELS_PLAYBACK));

        let tree = tree.with_children(vec![
            node("android.widget.ImageView", "More"),
            node("android.widget.ImageView", "Share"),
            node("android.widget.ImageView", "Comment"),
            node("android.widget.ImageView", "Like"),
            node("android.view.ViewGroup", "Reel"),
        ]);
        assert!(matches_short_form(&tree, &signatures::REELS_PLAYBACK));
    }

    #[test]
    fn feed_post_marker_detected() {
        let tree = node("android.widget.FrameLayout", "").with_children(vec![node(
            "android.view.ViewGroup",
            "Send post",
        )]);
        assert!(matches_feed_post(&tree));
    }

    #[test]
    fn home_affordance_found_by_exact_role() {
        let tree = node("android.widget.FrameLayout", "").with_children(vec![
            node("android.view.ViewGroup", "").with_children(vec![SemanticNode::new(
                "android.widget.Button",
            )
            .with_id(42)
            .with_description("Home")]),
        ]);
        let found = find_home_affordance(&tree, AppFamily::YouTube).unwrap();
        assert_eq!(found.id.0, 42);

        // Substring roles must not satisfy the exact-role requirement.
        let tree = node("android.widget.ButtonBar", "Home");
        assert!(find_home_affordance(&tree, AppFamily::YouTube).is_none());
    }

    #[test]
    fn instagram_home_affordance_is_a_frame() {
        let tree = node("android.widget.FrameLayout", "Home, tab 1 of 5");
        assert!(find_home_affordance(&tree, AppFamily::Instagram).is_some());
        assert!(find_home_affordance(&tree, AppFamily::YouTube).is_none());
    }

    #[test]
    fn families_without_home_affordance_return_none() {
        let tree = node("android.widget.FrameLayout", "Home");
        assert!(find_home_affordance(&tree, AppFamily::Twitter).is_none());
    }

    #[test]
    fn blocked_web_content_matches_url_in_node_text() {
        let tree = node("android.widget.FrameLayout", "").with_children(vec![
            SemanticNode::new("android.widget.EditText")
                .with_text("https://www.youtube.com/shorts/abc123"),
        ]);
        assert!(matches_blocked_web_content(&tree));

        let tree = node("android.widget.FrameLayout", "").with_children(vec![
            SemanticNode::new("android.widget.EditText").with_text("https://example.com"),
        ]);
        assert!(!matches_blocked_web_content(&tree));
    }
}
