// Plain-text regions for terminals

use crate::diagram::{DiagramRegion, Marker, MarkerList};
use crate::view::{ResultsRegion, Summary};
use colored::Colorize;

/// Pixels represented by one terminal column.
pub const PX_PER_COLUMN: u32 = 10;
/// Widest label line drawn inside a node before wrapping.
pub const NODE_TEXT_WIDTH: usize = 7;

const CONNECTOR_GLYPH: char = '─';

#[derive(Debug, Clone, Default)]
pub struct TextResults {
    lines: Vec<(String, String)>,
}

impl TextResults {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    pub fn render_colored(&self) -> String {
        let mut out = String::new();
        for (label, value) in &self.lines {
            out.push_str(&format!(
                "  {} {}\n",
                format!("{}:", label).bright_blue().bold(),
                value.bright_white()
            ));
        }
        out
    }
}

impl ResultsRegion for TextResults {
    fn show_summary(&mut self, summary: &Summary) {
        self.lines = summary
            .lines()
            .iter()
            .map(|(label, value)| (label.to_string(), value.to_string()))
            .collect();
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextDiagram {
    markers: MarkerList,
}

impl TextDiagram {
    pub fn markers(&self) -> &MarkerList {
        &self.markers
    }

    /// Rows of the drawn strip with trailing blanks removed.
    pub fn lines(&self) -> Vec<String> {
        if self.markers.is_empty() {
            return Vec::new();
        }

        let rows = self
            .markers
            .iter()
            .map(|m| match m {
                Marker::Node { label, .. } => wrap_label(label).len(),
                Marker::Connector { height, .. } => height.unwrap_or(1) as usize,
            })
            .max()
            .unwrap_or(1);

        let width = self
            .markers
            .iter()
            .map(|m| column(m.left()) + NODE_TEXT_WIDTH)
            .max()
            .unwrap_or(0);

        let mut canvas = vec![vec![' '; width]; rows];

        for marker in self.markers.iter() {
            match marker {
                Marker::Node { left, label } => {
                    let center = column(*left);
                    for (row, line) in wrap_label(label).iter().enumerate() {
                        let start = center.saturating_sub(line.len() / 2);
                        for (offset, c) in line.iter().enumerate() {
                            canvas[row][start + offset] = *c;
                        }
                    }
                }
                Marker::Connector { left, height } => {
                    let center = column(*left);
                    let row = (height.unwrap_or(1) as usize).saturating_sub(1) / 2;
                    for col in center.saturating_sub(1)..=center + 1 {
                        canvas[row][col] = CONNECTOR_GLYPH;
                    }
                }
            }
        }

        canvas
            .into_iter()
            .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl DiagramRegion for TextDiagram {
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

    /// Height in rows.
    fn node_height(&self, index: usize) -> Option<u32> {
        self.markers
            .node_label(index)
            .map(|label| wrap_label(label).len() as u32)
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

fn column(left: u32) -> usize {
    (left / PX_PER_COLUMN) as usize
}

fn wrap_label(label: &str) -> Vec<Vec<char>> {
    let chars: Vec<char> = label.chars().collect();
    if chars.is_empty() {
        return vec![Vec::new()];
    }
    chars
        .chunks(NODE_TEXT_WIDTH)
        .map(|chunk| chunk.to_vec())
        .collect()
}
