use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One node of the navigation menu tree (event type, group, event, race or market).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationChild {
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_start_time: Option<DateTime<Utc>>,
    /// Sent either as a number or a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_winners: Option<serde_json::Value>,
    pub children: Vec<NavigationChild>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Navigation {
    pub children: Vec<NavigationChild>,
}

impl Navigation {
    /// Depth-first walk over every node in the tree.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationChild> {
        let mut stack: Vec<&NavigationChild> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn markets(&self) -> impl Iterator<Item = &NavigationChild> {
        self.iter().filter(|node| node.node_type == "MARKET")
    }
}
