//! Static render collections derived from the catalog.
//!
//! Every channel appears once on each [`Surface`], at the same index as in
//! the catalog. Marker state (active, favorited, visible) is not baked in
//! here; the controller joins it on demand.

use crate::catalog::ChannelCatalog;

/// Badge appended to channel titles on the sidebar surfaces.
pub const LIVE_BADGE: &str = "LIVE";

/// One of the three parallel renderings of the channel list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Startup picker: name only.
    Lobby,
    /// Sidebar grid: name + live badge.
    Grid,
    /// Sidebar rows: name + live badge + event text.
    List,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Lobby, Surface::Grid, Surface::List];

    pub fn slot(self) -> usize {
        match self {
            Surface::Lobby => 0,
            Surface::Grid => 1,
            Surface::List => 2,
        }
    }

    /// Name used for the persisted `lastView` value. Only the sidebar tabs persist.
    pub fn as_str(self) -> &'static str {
        match self {
            Surface::Lobby => "lobby",
            Surface::Grid => "grid",
            Surface::List => "list",
        }
    }

    /// Parse a persisted sidebar tab name.
    pub fn parse_tab(s: &str) -> Option<Self> {
        match s {
            "grid" => Some(Surface::Grid),
            "list" => Some(Surface::List),
            _ => None,
        }
    }
}

/// A single rendered channel entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    /// Catalog position. Identical across surfaces for the same id.
    pub index: usize,
    /// Channel name exactly as the catalog gives it.
    pub name: String,
    /// Whether this surface renders the live badge after the name.
    pub badge: bool,
    /// Event line. `None` on surfaces that do not render one.
    pub event: Option<String>,
}

impl Entry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_badge(&self) -> bool {
        self.badge
    }

    /// Heading as rendered, badge included.
    pub fn title(&self) -> String {
        if self.badge {
            format!("{} {}", self.name, LIVE_BADGE)
        } else {
            self.name.clone()
        }
    }
}

/// The three render collections.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    surfaces: [Vec<Entry>; 3],
}

impl Projection {
    pub fn build(catalog: &ChannelCatalog) -> Self {
        let mut lobby = Vec::with_capacity(catalog.len());
        let mut grid = Vec::with_capacity(catalog.len());
        let mut list = Vec::with_capacity(catalog.len());

        for (index, channel) in catalog.iter().enumerate() {
            lobby.push(Entry {
                id: channel.id.clone(),
                index,
                name: channel.name.clone(),
                badge: false,
                event: None,
            });
            grid.push(Entry {
                id: channel.id.clone(),
                index,
                name: channel.name.clone(),
                badge: true,
                event: None,
            });
            list.push(Entry {
                id: channel.id.clone(),
                index,
                name: channel.name.clone(),
                badge: true,
                event: Some(channel.event.clone()),
            });
        }

        Self {
            surfaces: [lobby, grid, list],
        }
    }

    pub fn entries(&self, surface: Surface) -> &[Entry] {
        &self.surfaces[surface.slot()]
    }

    /// Entry at a catalog index on the given surface.
    pub fn entry(&self, surface: Surface, index: usize) -> Option<&Entry> {
        self.surfaces[surface.slot()].get(index)
    }

    pub fn len(&self) -> usize {
        self.surfaces[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
