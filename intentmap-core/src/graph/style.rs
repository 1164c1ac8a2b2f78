use serde::Serialize;

pub const ENABLED_STROKE: &str = "#10b981";
pub const DISABLED_STROKE: &str = "#9ca3af";
pub const DISABLED_DASH: &str = "5,5";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dasharray: Option<String>,
}

/// Returns `(animated, style)` for a relation.
pub fn edge_presentation(enabled: bool) -> (bool, EdgeStyle) {
    if enabled {
        (
            true,
            EdgeStyle {
                stroke: ENABLED_STROKE.to_owned(),
                stroke_width: 2.0,
                stroke_dasharray: None,
            },
        )
    } else {
        (
            false,
            EdgeStyle {
                stroke: DISABLED_STROKE.to_owned(),
                stroke_width: 1.5,
                stroke_dasharray: Some(DISABLED_DASH.to_owned()),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{edge_presentation, DISABLED_DASH};

    #[test]
    fn enabled_relations_are_animated_and_solid() {
        let (animated, style) = edge_presentation(true);
        assert!(animated);
        assert!(style.stroke_dasharray.is_none());
        assert_eq!(style.stroke_width, 2.0);
    }

    #[test]
    fn disabled_relations_are_static_and_dashed() {
        let (animated, style) = edge_presentation(false);
        assert!(!animated);
        assert_eq!(style.stroke_dasharray.as_deref(), Some(DISABLED_DASH));
    }

    #[test]
    fn presentation_is_deterministic() {
        assert_eq!(edge_presentation(false), edge_presentation(false));
        assert_ne!(edge_presentation(true).1, edge_presentation(false).1);
    }
}
