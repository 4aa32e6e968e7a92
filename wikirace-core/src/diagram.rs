//! Linear path diagram.
//!
//! Nodes sit on a horizontal strip at a fixed spacing; a connector sits
//! halfway between each node and its predecessor. Connector height is only
//! known once a node has been laid out, so drawing happens in two passes:
//! place every marker, then size every connector from the first node.

/// Horizontal distance between consecutive nodes, in pixels.
pub const NODE_SPACING: u32 = 100;
/// Offset of the first node from the left edge, in pixels.
pub const BASE_OFFSET: u32 = 50;

/// Surface that node and connector markers are drawn onto.
pub trait DiagramRegion {
    /// Remove every marker.
    fn clear(&mut self);

    fn place_node(&mut self, left: u32, label: &str);

    fn place_connector(&mut self, left: u32);

    /// Rendered height of the node at `index`, `None` if there is no such node.
    fn node_height(&self, index: usize) -> Option<u32>;

    fn set_connector_height(&mut self, index: usize, height: u32);

    fn node_count(&self) -> usize;

    fn connector_count(&self) -> usize;
}

/// Saturates at `u32::MAX` for paths too long to lay out.
pub fn node_left(index: usize) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(NODE_SPACING)
        .saturating_add(BASE_OFFSET)
}

/// Connector preceding the node at `index`; only defined for `index > 0`.
pub fn connector_left(index: usize) -> u32 {
    node_left(index).saturating_sub(NODE_SPACING / 2)
}

/// Clear `region` and draw `solution` onto it.
pub fn draw_solution<G: DiagramRegion + ?Sized>(region: &mut G, solution: &[String]) {
    region.clear();

    for (index, node) in solution.iter().enumerate() {
        region.place_node(node_left(index), node);
        if index > 0 {
            region.place_connector(connector_left(index));
        }
    }

    // Empty solutions have nothing to measure
    if let Some(height) = region.node_height(0) {
        for index in 0..region.connector_count() {
            region.set_connector_height(index, height);
        }
    }
}

/// A marker as recorded by the bundled regions, in placement order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Node { left: u32, label: String },
    Connector { left: u32, height: Option<u32> },
}

impl Marker {
    pub fn is_node(&self) -> bool {
        matches!(self, Marker::Node { .. })
    }

    pub fn left(&self) -> u32 {
        match self {
            Marker::Node { left, .. } | Marker::Connector { left, .. } => *left,
        }
    }
}

/// Ordered marker storage shared by the HTML and text regions.
#[derive(Debug, Clone, Default)]
pub struct MarkerList {
    markers: Vec<Marker>,
}

impl MarkerList {
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn push(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (u32, &str)> {
        self.markers.iter().filter_map(|m| match m {
            Marker::Node { left, label } => Some((*left, label.as_str())),
            Marker::Connector { .. } => None,
        })
    }

    pub fn connectors(&self) -> impl Iterator<Item = (u32, Option<u32>)> {
        self.markers.iter().filter_map(|m| match m {
            Marker::Connector { left, height } => Some((*left, *height)),
            Marker::Node { .. } => None,
        })
    }

    pub fn node_label(&self, index: usize) -> Option<&str> {
        self.nodes().nth(index).map(|(_, label)| label)
    }

    pub fn set_connector_height(&mut self, index: usize, value: u32) {
        let connector = self
            .markers
            .iter_mut()
            .filter_map(|m| match m {
                Marker::Connector { height, .. } => Some(height),
                Marker::Node { .. } => None,
            })
            .nth(index);
        if let Some(height) = connector {
            *height = Some(value);
        }
    }

    pub fn node_count(&self) -> usize {
        self.markers.iter().filter(|m| m.is_node()).count()
    }

    pub fn connector_count(&self) -> usize {
        self.markers.len() - self.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
