//! Builtin speech-provider voice catalog.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Voice {
    pub id: &'static str,
    pub name: &'static str,
}

/// Default voice (Sarah).
pub const DEFAULT_VOICE_ID: &str = "EXAVITQu4vr4xnSDxMaL";

pub const BUILTIN_VOICES: &[Voice] = &[
    Voice { id: "EXAVITQu4vr4xnSDxMaL", name: "Sarah (Female)" },
    Voice { id: "21m00Tcm4TlvDq8ikWAM", name: "Rachel (Female)" },
    Voice { id: "AZnzlk1XvdvUeBnXmlld", name: "Domi (Female)" },
    Voice { id: "ErXwobaYiN019PkySvjV", name: "Antoni (Male)" },
    Voice { id: "VR6AewLTigWG4xSOukaG", name: "Arnold (Male)" },
    Voice { id: "pNInz6obpgDQGcFmaJgB", name: "Adam (Male)" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_voice_is_in_the_catalog() {
        assert!(BUILTIN_VOICES.iter().any(|v| v.id == DEFAULT_VOICE_ID));
    }
}
