// HTML regions mirroring the search page markup

use crate::diagram::{DiagramRegion, Marker, MarkerList};
use crate::view::{ResultsRegion, Summary};

/// Inputs used to measure a node marker's rendered height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeMetrics {
    pub line_height_px: u32,
    /// Top plus bottom padding and border.
    pub padding_px: u32,
    pub chars_per_line: usize,
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self {
            line_height_px: 20,
            padding_px: 12,
            chars_per_line: 10,
        }
    }
}

impl NodeMetrics {
    pub fn height_of(&self, label: &str) -> u32 {
        let chars = label.chars().count();
        let per_line = self.chars_per_line.max(1);
        let lines = chars.div_ceil(per_line).max(1) as u32;
        lines * self.line_height_px + self.padding_px
    }
}

#[derive(Debug, Clone, Default)]
pub struct HtmlResults {
    inner_html: String,
}

impl HtmlResults {
    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }
}

impl ResultsRegion for HtmlResults {
    fn show_summary(&mut self, summary: &Summary) {
        self.inner_html = summary
            .lines()
            .iter()
            .map(|(label, value)| format!("<p>{}: {}</p>\n", label, escape_html(value)))
            .collect();
    }
}

#[derive(Debug, Clone, Default)]
pub struct HtmlDiagram {
    markers: MarkerList,
    metrics: NodeMetrics,
}

impl HtmlDiagram {
    pub fn new(metrics: NodeMetrics) -> Self {
        Self {
            markers: MarkerList::default(),
            metrics,
        }
    }

    pub fn markers(&self) -> &MarkerList {
        &self.markers
    }

    pub fn inner_html(&self) -> String {
        let mut html = String::new();
        for marker in self.markers.iter() {
            match marker {
                Marker::Node { left, label } => {
                    html.push_str(&format!(
                        "<div class=\"node\" style=\"left: {}px;\">{}</div>\n",
                        left,
                        escape_html(label)
                    ));
                }
                Marker::Connector { left, height } => match height {
                    Some(h) => html.push_str(&format!(
                        "<div class=\"edge\" style=\"left: {}px; height: {}px;\"></div>\n",
                        left, h
                    )),
                    None => html.push_str(&format!(
                        "<div class=\"edge\" style=\"left: {}px;\"></div>\n",
                        left
                    )),
                },
            }
        }
        html
    }
}

impl DiagramRegion for HtmlDiagram {
    fn clear(&mut self) {
        self.markers.clear();
    }

    fn place_node(&mut self, left: u32, label: &str) {
        self.markers.push(Marker::Node {
            left,
            label: label.to_string(),
        });
    }

    fn place_connector(&mut self, left: u32) {
        self.markers.push(Marker::Connector { left, height: None });
    }

    fn node_height(&self, index: usize) -> Option<u32> {
        self.markers
            .node_label(index)
            .map(|label| self.metrics.height_of(label))
    }

    fn set_connector_height(&mut self, index: usize, height: u32) {
        self.markers.set_connector_height(index, height);
    }

    fn node_count(&self) -> usize {
        self.markers.node_count()
    }

    fn connector_count(&self) -> usize {
        self.markers.connector_count()
    }
}

/// Full page fragment: results block followed by the graph container.
pub fn render_page(results: &HtmlResults, diagram: &HtmlDiagram) -> String {
    format!(
        "<div id=\"results\">\n{}</div>\n<div id=\"graph-container\">\n{}</div>\n",
        results.inner_html(),
        diagram.inner_html()
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
