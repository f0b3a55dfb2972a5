use serde::Deserialize;

/// Named globe looks. They share one projector and differ only in what
/// the renderer draws around the markers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    /// Silhouette and plain dot markers, label on hover
    #[default]
    Dots,
    /// Continent outlines and a lat/lon grid behind the markers
    Continents,
    /// Every visible destination labelled, enlarged hover marker
    Tooltip,
}

impl StyleKind {
    pub fn name(self) -> &'static str {
        match self {
            StyleKind::Dots => "dots",
            StyleKind::Continents => "continents",
            StyleKind::Tooltip => "tooltip",
        }
    }

    /// Cycle order for the style toggle key.
    pub fn next(self) -> Self {
        match self {
            StyleKind::Dots => StyleKind::Continents,
            StyleKind::Continents => StyleKind::Tooltip,
            StyleKind::Tooltip => StyleKind::Dots,
        }
    }
}

/// Which markers get a text label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelMode {
    /// Only hovered and selected destinations
    Focused,
    /// Every visible destination, including those in the limb slack
    All,
}

/// Drawing parameters for one look.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobeStyle {
    pub kind: StyleKind,
    /// Marker radius in dots
    pub marker_radius: i32,
    /// Marker radius while hovered or selected
    pub focus_marker_radius: i32,
    /// Radius of the ring drawn around hovered/selected markers
    pub focus_radius: i32,
    pub show_silhouette: bool,
    pub show_outlines: bool,
    pub show_graticule: bool,
    pub labels: LabelMode,
}

impl GlobeStyle {
    pub fn preset(kind: StyleKind) -> Self {
        match kind {
            StyleKind::Dots => Self {
                kind,
                marker_radius: 1,
                focus_marker_radius: 1,
                focus_radius: 3,
                show_silhouette: true,
                show_outlines: false,
                show_graticule: false,
                labels: LabelMode::Focused,
            },
            StyleKind::Continents => Self {
                kind,
                marker_radius: 1,
                focus_marker_radius: 1,
                focus_radius: 3,
                show_silhouette: true,
                show_outlines: true,
                show_graticule: true,
                labels: LabelMode::Focused,
            },
            StyleKind::Tooltip => Self {
                kind,
                marker_radius: 1,
                focus_marker_radius: 2,
                focus_radius: 4,
                show_silhouette: true,
                show_outlines: true,
                show_graticule: false,
                labels: LabelMode::All,
            },
        }
    }
}

impl Default for GlobeStyle {
    fn default() -> Self {
        Self::preset(StyleKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_visits_all() {
        let mut kind = StyleKind::Dots;
        let mut seen = vec![kind];
        for _ in 0..2 {
            kind = kind.next();
            seen.push(kind);
        }
        assert_eq!(seen, vec![StyleKind::Dots, StyleKind::Continents, StyleKind::Tooltip]);
        assert_eq!(kind.next(), StyleKind::Dots);
    }

    #[test]
    fn test_presets_differ_only_in_decoration() {
        let dots = GlobeStyle::preset(StyleKind::Dots);
        let continents = GlobeStyle::preset(StyleKind::Continents);
        assert!(!dots.show_outlines);
        assert!(continents.show_outlines && continents.show_graticule);
        let tooltip = GlobeStyle::preset(StyleKind::Tooltip);
        assert_eq!(tooltip.labels, LabelMode::All);
        assert!(tooltip.focus_marker_radius > tooltip.marker_radius);
        assert_eq!(dots.focus_marker_radius, dots.marker_radius);
    }
}
