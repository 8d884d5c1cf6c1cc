//! Fixed track catalog on the DFPlayer's SD card.
//!
//! The catalog is burned into the firmware — it is not scanned from the card
//! at runtime.  Track 5 is reserved for the alarm sound and is never offered
//! as a relax track.

/// One entry of the relax playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    /// Track number as indexed by the DFPlayer (1-based, matches filename prefix).
    pub number: u8,
    /// Display title for the frontend.
    pub title: &'static str,
    /// File name on the SD card.
    pub filename: &'static str,
}

/// The relax-music catalog.  Track numbering has a gap at 5 (alarm).
pub const RELAX_PLAYLIST: &[Track] = &[
    Track { number: 1, title: "AYAT KURSI", filename: "0001_Relax_AYAT_KURSI.mp3" },
    Track { number: 2, title: "FAN", filename: "0002_Relax_FAN.mp3" },
    Track { number: 3, title: "FROG", filename: "0003_Relax_FROG.mp3" },
    Track { number: 4, title: "OCEAN WAVES", filename: "0004_Relax_OCEAN_WAVES.mp3" },
    Track { number: 6, title: "RAINDROP", filename: "0006_Relax_RAINDROP.mp3" },
    Track { number: 7, title: "RIVER", filename: "0007_Relax_RIVER.mp3" },
    Track { number: 8, title: "VACUM CLEANER", filename: "0008_Relax_VACUM_CLEANER.mp3" },
];

/// The fixed alarm sound.  Not user-selectable.
pub const ALARM_TRACK: u8 = 5;

/// Whether `number` names a relax track.
pub fn is_relax_track(number: u8) -> bool {
    RELAX_PLAYLIST.iter().any(|t| t.number == number)
}

/// Validate a requested relax track, falling back to the first catalog entry.
pub fn valid_track_or_default(requested: u8) -> u8 {
    if is_relax_track(requested) {
        requested
    } else {
        log::warn!(
            "track {} not in catalog, falling back to track {}",
            requested,
            RELAX_PLAYLIST[0].number
        );
        RELAX_PLAYLIST[0].number
    }
}
