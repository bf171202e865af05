//! Overlay notifications and the listeners that receive them.
//!
//! Three notifications are cancelable: a listener returning
//! [`Propagation::Prevent`] suppresses the state change they announce.
//! Every registered listener is called even after one has vetoed.

use std::fmt;

use serde::Serialize;

use crate::region::{Region, RegionId};
use crate::selection::SelectionValue;

/// A notification emitted by the overlay.
#[derive(Debug, Clone, Copy)]
pub enum PictareaEvent<'a> {
    /// The pointer is about to hover `region`. Cancelable.
    EnterArea { region: &'a Region },
    /// The pointer is about to leave `region`. Cancelable.
    LeaveArea { region: &'a Region },
    /// `region` is about to be toggled. Cancelable.
    SelectArea {
        region: &'a Region,
        /// The region's value-key attribute, if any
        key: Option<&'a str>,
    },
    /// The selection changed after activating `region`.
    Change {
        region: &'a Region,
        selection: &'a [RegionId],
        value: Option<&'a SelectionValue>,
    },
}

impl PictareaEvent<'_> {
    /// Namespaced event name, e.g. `selectArea.pictarea`.
    pub fn name(&self) -> &'static str {
        match self {
            PictareaEvent::EnterArea { .. } => "enterArea.pictarea",
            PictareaEvent::LeaveArea { .. } => "leaveArea.pictarea",
            PictareaEvent::SelectArea { .. } => "selectArea.pictarea",
            PictareaEvent::Change { .. } => "change.pictarea",
        }
    }

    pub fn region(&self) -> &Region {
        match self {
            PictareaEvent::EnterArea { region }
            | PictareaEvent::LeaveArea { region }
            | PictareaEvent::SelectArea { region, .. }
            | PictareaEvent::Change { region, .. } => region,
        }
    }

    pub fn is_cancelable(&self) -> bool {
        !matches!(self, PictareaEvent::Change { .. })
    }

    /// Everything the event carries, by value, for hosts that forward
    /// events across a language boundary.
    pub fn payload(&self) -> EventPayload<'_> {
        let mut payload = EventPayload {
            name: self.name(),
            area: self.region().id().index(),
            key: None,
            selection: None,
            value: None,
        };
        match self {
            PictareaEvent::EnterArea { .. } | PictareaEvent::LeaveArea { .. } => {}
            PictareaEvent::SelectArea { key, .. } => payload.key = *key,
            PictareaEvent::Change {
                selection, value, ..
            } => {
                payload.selection = Some(selection.iter().map(RegionId::index).collect());
                payload.value = *value;
            }
        }
        payload
    }
}

/// Serializable snapshot of a [`PictareaEvent`].
///
/// ```json
/// { "type": "change.pictarea", "area": 2, "key": null, "selection": [1, 2], "value": ["b", "c"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload<'a> {
    #[serde(rename = "type")]
    pub name: &'static str,
    /// Index of the region in map order
    pub area: usize,
    /// Value key of the region about to be selected
    pub key: Option<&'a str>,
    /// Selected region indices after a change, oldest first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Vec<usize>>,
    /// Derived value after a change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a SelectionValue>,
}

/// A listener's verdict on a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    Prevent,
}

type ListenerFn = Box<dyn FnMut(&PictareaEvent<'_>) -> Propagation>;

/// Registered notification listeners.
#[derive(Default)]
pub struct Listeners {
    listeners: Vec<ListenerFn>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F>(&mut self, listener: F)
    where
        F: FnMut(&PictareaEvent<'_>) -> Propagation + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Call every listener. Returns `Prevent` if any listener vetoed a
    /// cancelable event; non-cancelable events always return `Continue`.
    pub fn emit(&mut self, event: &PictareaEvent<'_>) -> Propagation {
        let mut verdict = Propagation::Continue;
        for listener in &mut self.listeners {
            if listener(event) == Propagation::Prevent && event.is_cancelable() {
                verdict = Propagation::Prevent;
            }
        }
        if verdict == Propagation::Prevent {
            log::debug!("{} prevented for {}", event.name(), event.region().id());
        }
        verdict
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::AreaDefinition;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn region() -> Region {
        Region::new(RegionId(0), AreaDefinition::new("rect", "0,0,1,1"))
    }

    #[test]
    fn test_no_listeners_continue() {
        let region = region();
        let mut listeners = Listeners::new();
        assert!(listeners.is_empty());
        assert_eq!(
            listeners.emit(&PictareaEvent::EnterArea { region: &region }),
            Propagation::Continue
        );
    }

    #[test]
    fn test_every_listener_runs_after_a_veto() {
        let region = region();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();

        let log = calls.clone();
        listeners.push(move |_| {
            log.borrow_mut().push("first");
            Propagation::Prevent
        });
        let log = calls.clone();
        listeners.push(move |e| {
            log.borrow_mut().push(e.name());
            Propagation::Continue
        });

        let verdict = listeners.emit(&PictareaEvent::SelectArea {
            region: &region,
            key: Some("a"),
        });
        assert_eq!(verdict, Propagation::Prevent);
        assert_eq!(*calls.borrow(), vec!["first", "selectArea.pictarea"]);
    }

    #[test]
    fn test_payload_carries_key_selection_and_value() {
        let region = region();
        let select = PictareaEvent::SelectArea {
            region: &region,
            key: Some("a"),
        };
        assert_eq!(
            serde_json::to_value(select.payload()).unwrap(),
            serde_json::json!({ "type": "selectArea.pictarea", "area": 0, "key": "a" })
        );

        let value = SelectionValue::Multiple(vec!["a".to_string(), "c".to_string()]);
        let change = PictareaEvent::Change {
            region: &region,
            selection: &[RegionId(0), RegionId(2)],
            value: Some(&value),
        };
        assert_eq!(
            serde_json::to_value(change.payload()).unwrap(),
            serde_json::json!({
                "type": "change.pictarea",
                "area": 0,
                "key": null,
                "selection": [0, 2],
                "value": ["a", "c"]
            })
        );

        // A single-selection value of null is still reported
        let empty = SelectionValue::Single(None);
        let cleared = PictareaEvent::Change {
            region: &region,
            selection: &[],
            value: Some(&empty),
        };
        let json = serde_json::to_value(cleared.payload()).unwrap();
        assert_eq!(json["value"], serde_json::Value::Null);
        assert_eq!(json["selection"], serde_json::json!([]));
        assert!(json.as_object().unwrap().contains_key("value"));
    }

    #[test]
    fn test_change_cannot_be_prevented() {
        let region = region();
        let mut listeners = Listeners::new();
        listeners.push(|_| Propagation::Prevent);

        let event = PictareaEvent::Change {
            region: &region,
            selection: &[],
            value: None,
        };
        assert!(!event.is_cancelable());
        assert_eq!(listeners.emit(&event), Propagation::Continue);
    }
}
