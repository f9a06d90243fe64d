//! Element payload and the element half of the document API.
//!
//! The mutation methods live on [`Document`](crate::Document), split by concern:
//! child ordering in `children`, attributes and styles in `props`, handlers in
//! `events`, snapshots in `serialize`.

mod children;
mod events;
mod props;
mod serialize;

pub use events::{DomChanges, EventHandler};
pub use props::Notify;
pub use serialize::ElementJson;

use crate::value::PropMap;
use smartstring::alias::String as SmartString;
use std::collections::BTreeMap;

/// Initial state of a new element
#[derive(Debug, Clone, Default)]
pub struct ElementProps {
    /// Tag name. `None` or empty picks the document's default type.
    pub ty: Option<SmartString>,
    pub attr: PropMap,
    pub style: PropMap,
}

impl ElementProps {
    pub fn new(ty: impl Into<SmartString>) -> Self {
        Self {
            ty: Some(ty.into()),
            ..Self::default()
        }
    }

    pub fn attr(mut self, key: impl Into<SmartString>, value: impl Into<crate::PropValue>) -> Self {
        self.attr.insert(key.into(), value.into());
        self
    }

    pub fn style(mut self, key: impl Into<SmartString>, value: impl Into<crate::PropValue>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }
}

/// Element-specific node data. Child lists are kept by the arena.
pub struct ElementData {
    pub(crate) ty: SmartString,
    pub(crate) attr: PropMap,
    pub(crate) style: PropMap,
    pub(crate) class_style: PropMap,
    pub(crate) events: BTreeMap<SmartString, EventHandler>,
}

impl ElementData {
    pub(crate) fn new(ty: SmartString, attr: PropMap, style: PropMap) -> Self {
        Self {
            ty,
            attr,
            style,
            class_style: PropMap::new(),
            events: BTreeMap::new(),
        }
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn attr(&self) -> &PropMap {
        &self.attr
    }

    pub fn style(&self) -> &PropMap {
        &self.style
    }

    pub fn class_style(&self) -> &PropMap {
        &self.class_style
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.events.contains_key(event_type)
    }

    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(|k| k.as_str())
    }

    /// Class styles overlaid with inline styles; inline wins on conflict
    pub fn to_style(&self) -> PropMap {
        let mut merged = self.class_style.clone();
        merged.extend(self.style.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

impl std::fmt::Debug for ElementData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementData")
            .field("ty", &self.ty)
            .field("attr", &self.attr)
            .field("style", &self.style)
            .field("class_style", &self.class_style)
            .field("events", &self.events.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropValue;

    #[test]
    fn test_inline_style_wins_over_class_style() {
        let mut element = ElementData::new("text".into(), PropMap::new(), PropMap::new());
        element.class_style.insert("color".into(), "red".into());
        element.class_style.insert("fontSize".into(), PropValue::Int(12));
        element.style.insert("color".into(), "blue".into());

        let merged = element.to_style();
        assert_eq!(merged.get("color"), Some(&PropValue::from("blue")));
        assert_eq!(merged.get("fontSize"), Some(&PropValue::Int(12)));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_props_builder() {
        let props = ElementProps::new("image")
            .attr("src", "a.png")
            .style("width", 100);
        assert_eq!(props.ty.as_deref(), Some("image"));
        assert_eq!(props.attr.get("src"), Some(&PropValue::from("a.png")));
        assert_eq!(props.style.get("width"), Some(&PropValue::Int(100)));
    }
}
