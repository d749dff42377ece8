//! Hydration configuration
//!
//! All fields have defaults, so a config file only needs to name what it
//! changes:
//!
//! ```
//! use hydrakit_core::HydrationConfig;
//!
//! let config = HydrationConfig::from_json(r#"{ "verify_claim_orders": true }"#).unwrap();
//! assert!(config.verify_claim_orders);
//! assert!(config.accepts_foreign_children("head"));
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Tunables for a hydration session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrationConfig {
    /// Container names that may hold children this render never claimed
    ///
    /// Only stamped children of these containers take part in
    /// reconciliation. Matched case-insensitively against the node name.
    pub foreign_tolerant_containers: Vec<String>,

    /// Reject missing or duplicate claim orders before reordering
    ///
    /// When off, an unstamped child is ordered as if it carried claim
    /// order 0 and the pass completes with a possibly wrong order.
    pub verify_claim_orders: bool,

    /// Let text claims move the claim cursor like element claims do
    pub text_claims_update_cursor: bool,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            foreign_tolerant_containers: vec!["HEAD".to_string()],
            verify_claim_orders: cfg!(debug_assertions),
            text_claims_update_cursor: false,
        }
    }
}

impl HydrationConfig {
    /// Parse a config from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether a container with this node name may hold foreign children
    pub fn accepts_foreign_children(&self, node_name: &str) -> bool {
        self.foreign_tolerant_containers
            .iter()
            .any(|name| name.eq_ignore_ascii_case(node_name))
    }
}
