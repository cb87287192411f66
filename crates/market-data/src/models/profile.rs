use serde::{Deserialize, Serialize};

/// Provider-sourced descriptive data for a symbol.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProfile {
    /// Source of the profile (YAHOO, ...)
    pub source: Option<String>,
    /// Display name (long name, falling back to short name)
    pub name: Option<String>,
    /// Provider quote type (EQUITY, ETF, CRYPTOCURRENCY, ...)
    pub quote_type: Option<String>,
    /// Exchange code reported by the provider
    pub exchange: Option<String>,
}
