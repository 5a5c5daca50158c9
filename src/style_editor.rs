//! Style editor contract: turns settings-panel edits on the selected node into
//! mutations. Every edit resolves the node's style against defaults, computes one new
//! value and hands a partial style (or new node data) back to the editor.

use crate::style::{
    locked_height, normalize_rotation, opacity_from_percent, parse_color, ResolvedStyle,
};
use crate::{BorderStyle, EditorError, Node, NodeData, NodeKind, Result, StyleAttributes};

/// One user edit from the settings panel
#[derive(Debug, Clone, PartialEq)]
pub enum StyleEdit {
    Label(String),
    /// Palette swatch: background and matching text color
    Colors { background: String, text: String },
    BackgroundColor(String),
    TextColor(String),
    /// Width with height following the aspect ratio when `lock_ratio` is set
    Size { width: f64, lock_ratio: bool },
    Width(f64),
    Height(f64),
    BorderRadius(f64),
    BorderWidth(f64),
    BorderStyle(BorderStyle),
    /// Slider value 0-100
    OpacityPercent(f64),
    FontSize(f64),
    FontFamily(String),
    /// Degrees, any range
    Rotation(f64),
    Shadow(bool),
    /// Only valid on image nodes
    ImageUrl(String),
}

impl StyleEdit {
    fn name(&self) -> &'static str {
        match self {
            StyleEdit::Label(_) => "label",
            StyleEdit::Colors { .. } => "colors",
            StyleEdit::BackgroundColor(_) => "background color",
            StyleEdit::TextColor(_) => "text color",
            StyleEdit::Size { .. } => "size",
            StyleEdit::Width(_) => "width",
            StyleEdit::Height(_) => "height",
            StyleEdit::BorderRadius(_) => "border radius",
            StyleEdit::BorderWidth(_) => "border width",
            StyleEdit::BorderStyle(_) => "border style",
            StyleEdit::OpacityPercent(_) => "opacity",
            StyleEdit::FontSize(_) => "font size",
            StyleEdit::FontFamily(_) => "font family",
            StyleEdit::Rotation(_) => "rotation",
            StyleEdit::Shadow(_) => "shadow",
            StyleEdit::ImageUrl(_) => "Image URL",
        }
    }
}

/// What the editor must apply for an edit
#[derive(Debug, Clone, PartialEq)]
pub enum StyleChange {
    /// Merge into the existing style
    Patch(StyleAttributes),
    /// Replace node data (label and image edits)
    Data(NodeData),
}

/// Palette entry offered by the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub label: &'static str,
    pub background: &'static str,
    pub text: &'static str,
}

pub const PALETTE: [Swatch; 8] = [
    Swatch {
        label: "Blue",
        background: "#4DABF7",
        text: "#ffffff",
    },
    Swatch {
        label: "Yellow",
        background: "#FCC419",
        text: "#000000",
    },
    Swatch {
        label: "Green",
        background: "#40C057",
        text: "#ffffff",
    },
    Swatch {
        label: "Red",
        background: "#FA5252",
        text: "#ffffff",
    },
    Swatch {
        label: "Purple",
        background: "#7950F2",
        text: "#ffffff",
    },
    Swatch {
        label: "Black",
        background: "#212529",
        text: "#ffffff",
    },
    Swatch {
        label: "White",
        background: "#F8F9FA",
        text: "#212529",
    },
    Swatch {
        label: "Orange",
        background: "#FF922B",
        text: "#ffffff",
    },
];

impl Swatch {
    pub fn edit(&self) -> StyleEdit {
        StyleEdit::Colors {
            background: self.background.to_string(),
            text: self.text.to_string(),
        }
    }
}

/// What the settings panel shows for the selected node
#[derive(Debug, Clone, PartialEq)]
pub struct StylePanel {
    pub node_id: String,
    pub kind: NodeKind,
    pub label: String,
    pub style: ResolvedStyle,
    pub image_url: Option<String>,
    /// Image URL field is only offered for image nodes
    pub image_url_editable: bool,
}

impl StylePanel {
    pub fn for_node(node: &Node) -> Self {
        Self {
            node_id: node.id.clone(),
            kind: node.kind,
            label: node.data.label.clone(),
            style: node.style().resolve(),
            image_url: node.data.image_url.clone(),
            image_url_editable: node.kind == NodeKind::Image,
        }
    }
}

/// Compute the change for `edit` on `node`
pub fn plan_edit(node: &Node, edit: &StyleEdit, aspect_ratio: f64) -> Result<StyleChange> {
    let current = node.style().resolve();
    let mut patch = StyleAttributes::default();

    match edit {
        StyleEdit::Label(label) => {
            return Ok(StyleChange::Data(NodeData {
                label: label.clone(),
                ..node.data.clone()
            }));
        }
        StyleEdit::ImageUrl(url) => {
            if node.kind != NodeKind::Image {
                return Err(EditorError::UnsupportedEdit {
                    edit: edit.name(),
                    kind: node.kind.to_string(),
                });
            }
            return Ok(StyleChange::Data(NodeData {
                image_url: Some(url.clone()),
                ..node.data.clone()
            }));
        }
        StyleEdit::Colors { background, text } => {
            patch.background_color = Some(parse_color(background)?);
            patch.text_color = Some(parse_color(text)?);
        }
        StyleEdit::BackgroundColor(color) => patch.background_color = Some(parse_color(color)?),
        StyleEdit::TextColor(color) => patch.text_color = Some(parse_color(color)?),
        StyleEdit::Size { width, lock_ratio } => {
            let width = dimension(*width, current.width);
            patch.width = Some(width);
            if *lock_ratio {
                patch.height = Some(locked_height(width, aspect_ratio));
            }
        }
        StyleEdit::Width(width) => patch.width = Some(dimension(*width, current.width)),
        StyleEdit::Height(height) => patch.height = Some(dimension(*height, current.height)),
        StyleEdit::BorderRadius(r) => {
            patch.border_radius = Some(dimension(*r, current.border_radius))
        }
        StyleEdit::BorderWidth(w) => patch.border_width = Some(dimension(*w, current.border_width)),
        StyleEdit::BorderStyle(style) => patch.border_style = Some(*style),
        StyleEdit::OpacityPercent(percent) => patch.opacity = Some(opacity_from_percent(*percent)),
        StyleEdit::FontSize(size) => {
            patch.font_size = Some(dimension(*size, current.font_size).max(1.0))
        }
        StyleEdit::FontFamily(family) => patch.font_family = Some(family.trim().to_string()),
        StyleEdit::Rotation(degrees) => patch.rotation = Some(normalize_rotation(*degrees)),
        StyleEdit::Shadow(enabled) => patch.shadow = Some(*enabled),
    }

    Ok(StyleChange::Patch(patch))
}

/// Non-negative finite value, else keep `fallback`
fn dimension(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;
    use assert_matches::assert_matches;

    fn node(kind: NodeKind) -> Node {
        Node::new(
            format!("{}-1", kind),
            kind,
            Position::default(),
            NodeData::labeled("Node"),
        )
    }

    fn patch(edit: StyleEdit) -> StyleAttributes {
        match plan_edit(&node(NodeKind::Action), &edit, 0.7).unwrap() {
            StyleChange::Patch(p) => p,
            other => panic!("expected patch, got {:?}", other),
        }
    }

    #[test]
    fn test_opacity_stored_as_fraction() {
        assert_eq!(patch(StyleEdit::OpacityPercent(55.0)).opacity, Some(0.55));
    }

    #[test]
    fn test_locked_size() {
        let p = patch(StyleEdit::Size {
            width: 200.0,
            lock_ratio: true,
        });
        assert_eq!(p.width, Some(200.0));
        assert_eq!(p.height, Some(140.0));

        let p = patch(StyleEdit::Size {
            width: 200.0,
            lock_ratio: false,
        });
        assert_eq!(p.width, Some(200.0));
        assert_eq!(p.height, None);
    }

    #[test]
    fn test_rotation_normalized() {
        assert_eq!(patch(StyleEdit::Rotation(-45.0)).rotation, Some(315.0));
        assert_eq!(patch(StyleEdit::Rotation(720.0)).rotation, Some(0.0));
    }

    #[test]
    fn test_invalid_dimension_keeps_current() {
        assert_eq!(patch(StyleEdit::Width(f64::NAN)).width, Some(140.0));
        assert_eq!(patch(StyleEdit::Height(-10.0)).height, Some(0.0));
    }

    #[test]
    fn test_swatch_colors() {
        let p = patch(PALETTE[1].edit());
        assert_eq!(p.background_color.as_deref(), Some("#FCC419"));
        assert_eq!(p.text_color.as_deref(), Some("#000000"));
    }

    #[test]
    fn test_invalid_color() {
        let result = plan_edit(
            &node(NodeKind::Action),
            &StyleEdit::BackgroundColor("#GGG".to_string()),
            0.7,
        );
        assert_matches!(result, Err(EditorError::InvalidColor(_)));
    }

    #[test]
    fn test_label_edit_keeps_style() {
        let mut n = node(NodeKind::Flag);
        n.data.style = Some(StyleAttributes {
            shadow: Some(true),
            ..Default::default()
        });

        let change = plan_edit(&n, &StyleEdit::Label("Renamed".to_string()), 0.7).unwrap();
        assert_matches!(change, StyleChange::Data(data) => {
            assert_eq!(data.label, "Renamed");
            assert_eq!(data.style.unwrap().shadow, Some(true));
        });
    }

    #[test]
    fn test_image_url_only_on_image_nodes() {
        let edit = StyleEdit::ImageUrl("data:image/png;base64,AA==".to_string());

        assert_matches!(
            plan_edit(&node(NodeKind::Card), &edit, 0.7),
            Err(EditorError::UnsupportedEdit { .. })
        );
        assert_matches!(
            plan_edit(&node(NodeKind::Image), &edit, 0.7),
            Ok(StyleChange::Data(data)) if data.image_url.is_some()
        );
    }

    #[test]
    fn test_panel_view() {
        let panel = StylePanel::for_node(&node(NodeKind::Image));
        assert!(panel.image_url_editable);
        assert_eq!(panel.style.width, 140.0);

        assert!(!StylePanel::for_node(&node(NodeKind::Decision)).image_url_editable);
    }
}
