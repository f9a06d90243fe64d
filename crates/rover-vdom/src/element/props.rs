use crate::document::Document;
use crate::node::NodeId;
use crate::value::{PropMap, PropValue};
use smartstring::alias::String as SmartString;
use tracing::warn;

/// Whether a property update is announced to the native side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notify {
    /// Skip unchanged values, announce the rest
    #[default]
    Auto,
    /// Update locally, announce nothing
    Silent,
    /// Announce even when the value is unchanged
    Force,
}

#[derive(Clone, Copy)]
enum Target {
    Attr,
    Style,
}

impl Document {
    pub fn set_attr(
        &mut self,
        node: NodeId,
        key: impl Into<SmartString>,
        value: impl Into<PropValue>,
    ) {
        self.set_attr_with(node, key, value, Notify::Auto);
    }

    pub fn set_attr_with(
        &mut self,
        node: NodeId,
        key: impl Into<SmartString>,
        value: impl Into<PropValue>,
        notify: Notify,
    ) {
        self.set_prop(node, Target::Attr, key.into(), value.into(), notify);
    }

    pub fn set_style(
        &mut self,
        node: NodeId,
        key: impl Into<SmartString>,
        value: impl Into<PropValue>,
    ) {
        self.set_style_with(node, key, value, Notify::Auto);
    }

    pub fn set_style_with(
        &mut self,
        node: NodeId,
        key: impl Into<SmartString>,
        value: impl Into<PropValue>,
        notify: Notify,
    ) {
        self.set_prop(node, Target::Style, key.into(), value.into(), notify);
    }

    /// Replace the class styles of `node`. Keys from the previous class map are
    /// cleared to `""` first, so the native side drops them unless the new map
    /// sets them again. The merged style is always re-sent.
    pub fn set_class_style(&mut self, node: NodeId, class_style: PropMap) {
        let Some(element) = self.element_mut(node) else {
            warn!(node = %node, "set_class_style: not a live element");
            return;
        };
        for value in element.class_style.values_mut() {
            *value = PropValue::empty();
        }
        element.class_style.extend(class_style);
        let merged = element.to_style();

        if let Some(listener) = self.listener_for(node) {
            listener.set_styles(node, merged);
        }
    }

    /// Class styles overlaid with inline styles
    pub fn to_style(&self, node: NodeId) -> Option<PropMap> {
        self.element(node).map(|element| element.to_style())
    }

    fn set_prop(
        &mut self,
        node: NodeId,
        target: Target,
        key: SmartString,
        value: PropValue,
        notify: Notify,
    ) {
        let Some(element) = self.element_mut(node) else {
            warn!(node = %node, key = %key, "property update on a missing element");
            return;
        };
        let map = match target {
            Target::Attr => &mut element.attr,
            Target::Style => &mut element.style,
        };
        if notify != Notify::Force && map.get(&key) == Some(&value) {
            return;
        }
        map.insert(key.clone(), value.clone());

        if notify == Notify::Silent {
            return;
        }
        if let Some(listener) = self.listener_for(node) {
            match target {
                Target::Attr => listener.set_attr(node, key, value),
                Target::Style => listener.set_style(node, key, value),
            }
        }
    }
}
