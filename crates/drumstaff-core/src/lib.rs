//! drumstaff-core: pattern viewport and dual-view synchronization for drum patterns

pub mod cache;
pub mod counting;
pub mod drum;
mod error;
pub mod grid;
pub mod layout;
pub mod notation;
mod pattern;
mod playback;
pub mod viewport;

pub use cache::Memo;
pub use counting::{BeatLabel, LabelEmphasis, TimeSignature};
pub use drum::{normalize, CanonicalDrum, DrumKit, DrumVoice, NoteheadKind};
pub use error::{DrumstaffError, Result};
pub use grid::{GridColumn, GridModel, GridRow};
pub use layout::{LayoutMetrics, StepMapper};
pub use notation::{NotationFrame, NotationView, VisibleNote};
pub use pattern::{Pattern, Track, MAX_STEPS};
pub use playback::{PlaybackSnapshot, StepToggle};
pub use viewport::{compute_window, ViewportRequest, Window};
