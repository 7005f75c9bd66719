//! Active channel tracking.

use super::projection::Entry;

/// Shown when a rendering carries no usable name.
const UNKNOWN_CHANNEL: &str = "Unknown channel";

/// The channel currently loaded into the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveChannel {
    pub id: String,
    pub stream: String,
    /// Display name, without the live badge.
    pub name: String,
    /// Event text. Carried over from the previous selection when the
    /// originating rendering has none.
    pub event: String,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    active: Option<ActiveChannel>,
}

impl SelectionState {
    /// Make `rendering`'s channel active.
    pub fn activate(&mut self, stream: &str, rendering: &Entry) -> &ActiveChannel {
        let name = match rendering.name() {
            "" => UNKNOWN_CHANNEL.to_string(),
            n => n.to_string(),
        };
        let event = match &rendering.event {
            Some(e) if !e.is_empty() => e.clone(),
            _ => self
                .active
                .take()
                .map(|prev| prev.event)
                .unwrap_or_default(),
        };

        self.active.insert(ActiveChannel {
            id: rendering.id.clone(),
            stream: stream.to_string(),
            name,
            event,
        })
    }

    pub fn active(&self) -> Option<&ActiveChannel> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, event: Option<&str>) -> Entry {
        Entry {
            id: id.into(),
            index: 0,
            name: name.into(),
            badge: true,
            event: event.map(Into::into),
        }
    }

    #[test]
    fn test_name_taken_without_badge() {
        let mut sel = SelectionState::default();
        let active = sel.activate("https://s/a", &entry("a", "Alpha", None));
        assert_eq!(active.name, "Alpha");
        assert_eq!(active.stream, "https://s/a");
    }

    #[test]
    fn test_event_carried_over_when_origin_has_none() {
        let mut sel = SelectionState::default();
        sel.activate("s1", &entry("a", "Alpha", Some("Final")));
        let active = sel.activate("s2", &entry("b", "Beta", None));
        assert_eq!(active.id, "b");
        assert_eq!(active.event, "Final");
    }

    #[test]
    fn test_event_replaced_by_list_origin() {
        let mut sel = SelectionState::default();
        sel.activate("s1", &entry("a", "Alpha", Some("Final")));
        let active = sel.activate("s2", &entry("b", "Beta", Some("Derby")));
        assert_eq!(active.event, "Derby");
    }

    #[test]
    fn test_empty_name_falls_back() {
        let mut sel = SelectionState::default();
        let active = sel.activate("s", &entry("x", "", None));
        assert_eq!(active.name, UNKNOWN_CHANNEL);
    }
}
