//! Canonical drum identities and the alias table that maps track names onto them
//!
//! Pattern sources spell the same drum many ways ("kick", "Kick", "Low Tom-tom",
//! "HH Closed", ...). Both views resolve a track key through [`DrumKit`] so they
//! never disagree on a drum's label, symbol or staff position.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Staff-notation glyph family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteheadKind {
    /// Filled oval (kick, snare, toms)
    Filled,
    /// Cross (closed hat, cymbals)
    X,
    /// Cross with a small circle above (open hat)
    Open,
}

/// Drum voices known to the alias table.
///
/// Declaration order matches `VOICES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrumVoice {
    Crash,
    Ride,
    ClosedHat,
    OpenHat,
    Snare,
    HighTom,
    LowTom,
    Kick,
    Ghost,
}

struct VoiceDef {
    id: &'static str,
    name: &'static str,
    symbol: &'static str,
    staff_y: Option<f32>,
    notehead: NoteheadKind,
    aliases: &'static [&'static str],
}

const VOICES: [VoiceDef; 9] = [
    VoiceDef {
        id: "crash",
        name: "Crash",
        symbol: "⊗",
        staff_y: Some(20.0),
        notehead: NoteheadKind::X,
        aliases: &["crash", "Crash", "Crash Cymbal"],
    },
    VoiceDef {
        id: "ride",
        name: "Ride",
        symbol: "⊙",
        staff_y: Some(30.0),
        notehead: NoteheadKind::X,
        aliases: &["ride", "Ride", "Ride Cymbal"],
    },
    VoiceDef {
        id: "hihat",
        name: "Hi-Hat",
        symbol: "○",
        staff_y: Some(40.0),
        notehead: NoteheadKind::X,
        aliases: &["hihat", "Hi-Hat", "HH Closed", "Closed Hat"],
    },
    VoiceDef {
        id: "openhat",
        name: "Open Hat",
        symbol: "◎",
        staff_y: Some(40.0),
        notehead: NoteheadKind::Open,
        aliases: &["openhat", "Open Hat", "HH Open", "Hi-Hat (Open)"],
    },
    VoiceDef {
        id: "snare",
        name: "Snare",
        symbol: "×",
        staff_y: Some(80.0),
        notehead: NoteheadKind::Filled,
        aliases: &["snare", "Snare"],
    },
    VoiceDef {
        id: "tom",
        name: "Tom",
        symbol: "◆",
        staff_y: Some(100.0),
        notehead: NoteheadKind::Filled,
        aliases: &["tom", "Tom", "tom-tom", "High Tom"],
    },
    VoiceDef {
        id: "low tom",
        name: "Low Tom",
        symbol: "◇",
        staff_y: Some(110.0),
        notehead: NoteheadKind::Filled,
        aliases: &["low tom", "Low Tom", "low tom-tom", "Low Tom-tom"],
    },
    VoiceDef {
        id: "kick",
        name: "Kick",
        symbol: "●",
        staff_y: Some(120.0),
        notehead: NoteheadKind::Filled,
        aliases: &["kick", "Kick"],
    },
    VoiceDef {
        id: "ghost",
        name: "Ghost Note",
        symbol: "⚬",
        staff_y: None,
        notehead: NoteheadKind::Filled,
        aliases: &["ghost", "Ghost Note", "ghost note"],
    },
];

const FALLBACK_KICK_SYMBOL: &str = "●";
const FALLBACK_SNARE_SYMBOL: &str = "×";
const FALLBACK_SYMBOL: &str = "•";

impl DrumVoice {
    pub const ALL: [DrumVoice; 9] = [
        DrumVoice::Crash,
        DrumVoice::Ride,
        DrumVoice::ClosedHat,
        DrumVoice::OpenHat,
        DrumVoice::Snare,
        DrumVoice::HighTom,
        DrumVoice::LowTom,
        DrumVoice::Kick,
        DrumVoice::Ghost,
    ];

    fn def(self) -> &'static VoiceDef {
        &VOICES[self as usize]
    }

    /// Canonical id, also usable as a track key
    pub fn id(self) -> &'static str {
        self.def().id
    }

    pub fn staff_y(self) -> Option<f32> {
        self.def().staff_y
    }

    /// Voices that have a place on the staff, top to bottom
    pub fn staff_voices() -> impl Iterator<Item = DrumVoice> {
        Self::ALL.into_iter().filter(|v| v.staff_y().is_some())
    }

    /// Grid row rank; higher sits lower. Kick is always the bottom row.
    fn row_rank(self) -> u8 {
        match self {
            DrumVoice::HighTom => 1,
            DrumVoice::LowTom => 2,
            DrumVoice::Snare => 3,
            DrumVoice::Ghost => 4,
            DrumVoice::Kick => 5,
            _ => 0,
        }
    }

    pub fn canonical(self) -> CanonicalDrum {
        let def = self.def();
        CanonicalDrum {
            id: def.id.to_string(),
            voice: Some(self),
            display_name: def.name.to_string(),
            symbol: def.symbol.to_string(),
            staff_y: def.staff_y,
            notehead: def.notehead,
        }
    }
}

/// Normalized identity of a drum track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDrum {
    pub id: String,
    /// Known voice, `None` for keys the alias table does not cover
    pub voice: Option<DrumVoice>,
    pub display_name: String,
    pub symbol: String,
    /// Vertical staff position; `None` keeps the drum out of notation
    pub staff_y: Option<f32>,
    pub notehead: NoteheadKind,
}

impl CanonicalDrum {
    fn fallback(key: &str) -> Self {
        let lower = key.to_lowercase();
        let symbol = if lower.contains("kick") {
            FALLBACK_KICK_SYMBOL
        } else if lower.contains("snare") {
            FALLBACK_SNARE_SYMBOL
        } else {
            FALLBACK_SYMBOL
        };
        Self {
            id: fold_key(key),
            voice: None,
            display_name: key.to_string(),
            symbol: symbol.to_string(),
            staff_y: None,
            notehead: NoteheadKind::Filled,
        }
    }

    pub fn on_staff(&self) -> bool {
        self.staff_y.is_some()
    }

    /// Grid row rank (see [`DrumVoice`]); unknown drums rank with the cymbals on top
    pub fn row_rank(&self) -> u8 {
        self.voice.map_or(0, DrumVoice::row_rank)
    }
}

/// Lowercase, treat `-` and `_` as spaces, collapse whitespace
pub fn fold_key(key: &str) -> String {
    key.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Precomputed alias lookup
pub struct DrumKit {
    exact: HashMap<&'static str, DrumVoice>,
    folded: HashMap<String, DrumVoice>,
}

impl Default for DrumKit {
    fn default() -> Self {
        Self::new()
    }
}

impl DrumKit {
    pub fn new() -> Self {
        let mut exact = HashMap::new();
        let mut folded = HashMap::new();
        for voice in DrumVoice::ALL {
            for &alias in voice.def().aliases {
                exact.insert(alias, voice);
                folded.insert(fold_key(alias), voice);
            }
        }
        Self { exact, folded }
    }

    /// Resolve a key to a known voice: exact spelling first, then folded
    pub fn lookup(&self, key: &str) -> Option<DrumVoice> {
        if let Some(&voice) = self.exact.get(key) {
            return Some(voice);
        }
        self.folded.get(&fold_key(key)).copied()
    }

    pub fn normalize(&self, key: &str) -> CanonicalDrum {
        match self.lookup(key) {
            Some(voice) => voice.canonical(),
            None => CanonicalDrum::fallback(key),
        }
    }
}

/// Process-wide kit, built on first use
pub fn kit() -> &'static DrumKit {
    static KIT: OnceLock<DrumKit> = OnceLock::new();
    KIT.get_or_init(DrumKit::new)
}

pub fn normalize(key: &str) -> CanonicalDrum {
    kit().normalize(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_idempotent() {
        for key in ["kick", "HH Open", "Mystery Shaker", ""] {
            assert_eq!(normalize(key), normalize(key));
        }
    }

    #[test]
    fn test_low_tom_aliases_are_equivalent() {
        let a = normalize("low tom-tom");
        assert_eq!(a, normalize("Low Tom"));
        assert_eq!(a, normalize("Low Tom-tom"));
        assert_eq!(a, normalize("LOW_TOM"));
        assert_eq!(a.display_name, "Low Tom");
        assert_eq!(a.symbol, "◇");
    }

    #[test]
    fn test_case_insensitive_fallback() {
        assert_eq!(normalize("KICK").voice, Some(DrumVoice::Kick));
        assert_eq!(normalize("hh closed").voice, Some(DrumVoice::ClosedHat));
        assert_eq!(normalize("crash  cymbal").voice, Some(DrumVoice::Crash));
    }

    #[test]
    fn test_legacy_labels() {
        let open = normalize("HH Open");
        assert_eq!(open.display_name, "Open Hat");
        assert_eq!(open.notehead, NoteheadKind::Open);
        assert_eq!(open.staff_y, Some(40.0));

        let closed = normalize("HH Closed");
        assert_eq!(closed.notehead, NoteheadKind::X);
        assert_eq!(normalize("Hi-Hat (Open)"), open);
    }

    #[test]
    fn test_unknown_key_fallback() {
        let drum = normalize("Big Kick 2");
        assert_eq!(drum.voice, None);
        assert_eq!(drum.display_name, "Big Kick 2");
        assert_eq!(drum.symbol, "●");
        assert!(!drum.on_staff());

        assert_eq!(normalize("Rim Snare").symbol, "×");
        assert_eq!(normalize("Shaker").symbol, "•");
        assert_eq!(normalize("Shaker").id, "shaker");
    }

    #[test]
    fn test_ghost_is_grid_only() {
        let ghost = normalize("ghost note");
        assert_eq!(ghost, normalize("ghost"));
        assert!(!ghost.on_staff());
    }

    #[test]
    fn test_row_rank_puts_kick_at_bottom() {
        let mut drums: Vec<_> = ["kick", "snare", "crash", "ghost", "Low Tom", "tom", "hihat"]
            .iter()
            .map(|k| normalize(k))
            .collect();
        drums.sort_by_key(|d| d.row_rank());
        let names: Vec<_> = drums.iter().map(|d| d.display_name.as_str()).collect();
        assert_eq!(names, ["Crash", "Hi-Hat", "Tom", "Low Tom", "Snare", "Ghost Note", "Kick"]);
    }

    #[test]
    fn test_voice_table_order_matches_enum() {
        for voice in DrumVoice::ALL {
            assert_eq!(voice.canonical().voice, Some(voice));
            assert_eq!(kit().lookup(voice.id()), Some(voice));
        }
    }
}
