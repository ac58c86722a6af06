//! Static catalog of synthesis voices offered to the user.

/// A named server-side synthesis profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    /// Opaque id sent as `selectedVoiceId`.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Built-in voices. The first entry is the default selection.
pub const VOICE_CATALOG: &[Voice] = &[
    Voice {
        id: "Pw7NjARk1Tw61eca5OiP",
        name: "Oswald",
        description: "A friendly male voice that speaks clearly",
    },
    Voice {
        id: "ThT5KcBeYPX3keUQqHPh",
        name: "Dorothy",
        description: "A warm female voice that speaks gently",
    },
];

pub fn default_voice() -> &'static Voice {
    &VOICE_CATALOG[0]
}

pub fn find_by_id(id: &str) -> Option<&'static Voice> {
    VOICE_CATALOG.iter().find(|v| v.id == id)
}

/// Case-insensitive lookup by display name.
pub fn find_by_name(name: &str) -> Option<&'static Voice> {
    VOICE_CATALOG
        .iter()
        .find(|v| v.name.eq_ignore_ascii_case(name.trim()))
}

/// Resolve either an id or a display name.
pub fn resolve(key: &str) -> Option<&'static Voice> {
    find_by_id(key).or_else(|| find_by_name(key))
}
