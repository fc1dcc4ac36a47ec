/// Which view renders the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Grid,
    Notation,
}

/// Visible step counts the toolbar and config accept
pub const VISIBLE_STEPS: std::ops::RangeInclusive<usize> = 4..=64;
