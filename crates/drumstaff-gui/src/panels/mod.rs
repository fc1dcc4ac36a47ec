//! UI panels

mod drum_grid;
mod notation;
mod transport;

use drumstaff_core::{CanonicalDrum, DrumVoice};
use egui::Color32;

pub use drum_grid::DrumGridPanel;
pub use notation::NotationPanel;
pub use transport::{TransportAction, TransportPanel, TransportStatus};

/// Accent color for a drum; unknown drums are grey
pub(crate) fn voice_color(drum: &CanonicalDrum) -> Color32 {
    match drum.voice {
        Some(DrumVoice::Crash) => Color32::from_rgb(200, 200, 200),
        Some(DrumVoice::Ride) => Color32::from_rgb(180, 180, 120),
        Some(DrumVoice::ClosedHat) => Color32::from_rgb(80, 200, 80),
        Some(DrumVoice::OpenHat) => Color32::from_rgb(80, 200, 150),
        Some(DrumVoice::Snare) => Color32::from_rgb(200, 150, 80),
        Some(DrumVoice::HighTom) => Color32::from_rgb(150, 80, 200),
        Some(DrumVoice::LowTom) => Color32::from_rgb(80, 150, 200),
        Some(DrumVoice::Kick) => Color32::from_rgb(200, 80, 80),
        Some(DrumVoice::Ghost) => Color32::from_rgb(160, 140, 120),
        None => Color32::from_gray(150),
    }
}
