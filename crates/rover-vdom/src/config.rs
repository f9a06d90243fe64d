use crate::error::Result;
use serde::Deserialize;
use smartstring::alias::String as SmartString;

/// Tag name given to elements created without an explicit type
pub const DEFAULT_ELEMENT_TYPE: &str = "div";

/// Per-document configuration
///
/// Every field is optional in the JSON form, so `{}` yields the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Queue commands in the listener until an explicit flush
    pub batched: bool,
    /// Tag name used when an element is created with an empty type
    pub default_element_type: SmartString,
    /// Verify the children/pure-children invariant after each structural
    /// mutation and panic on divergence. Defaults to on in debug builds only.
    pub check_invariants: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            batched: false,
            default_element_type: SmartString::from(DEFAULT_ELEMENT_TYPE),
            check_invariants: cfg!(debug_assertions),
        }
    }
}

impl DocumentConfig {
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn batched(mut self, batched: bool) -> Self {
        self.batched = batched;
        self
    }
}
