//! Navigation tree types.
//!
//! Serialized with the field names the site generator's sidebar config
//! expects (`text`, `link`, `collapsed`, `items`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A sidebar entry: either a link or a collapsible group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavigationNode {
    Group {
        #[serde(rename = "text")]
        label: String,
        #[serde(rename = "collapsed")]
        collapsible: bool,
        #[serde(rename = "items")]
        children: Vec<NavigationNode>,
    },
    Leaf {
        #[serde(rename = "text")]
        label: String,
        link: String,
    },
}

impl NavigationNode {
    #[must_use]
    pub fn leaf(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self::Leaf {
            label: label.into(),
            link: link.into(),
        }
    }

    #[must_use]
    pub fn group(label: impl Into<String>, children: Vec<NavigationNode>) -> Self {
        Self::Group {
            label: label.into(),
            collapsible: true,
            children,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Group { label, .. } | Self::Leaf { label, .. } => label,
        }
    }
}

/// Route prefix (`/<safePath>/`) to that section's navigation items.
pub type SidebarDescriptor = BTreeMap<String, Vec<NavigationNode>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_site_generator_field_names() {
        let node = NavigationNode::group("notes", vec![NavigationNode::leaf("B", "/x/y")]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["text"], "notes");
        assert_eq!(json["collapsed"], true);
        assert_eq!(json["items"][0]["text"], "B");
        assert_eq!(json["items"][0]["link"], "/x/y");
        assert!(json["items"][0].get("collapsed").is_none());
    }

    #[test]
    fn untagged_deserialize_distinguishes_leaf_and_group() {
        let json = r#"[{"text":"g","collapsed":true,"items":[{"text":"l","link":"/l"}]}]"#;
        let nodes: Vec<NavigationNode> = serde_json::from_str(json).unwrap();
        assert_eq!(
            nodes,
            vec![NavigationNode::group("g", vec![NavigationNode::leaf("l", "/l")])]
        );
        assert_eq!(nodes[0].label(), "g");
    }
}
