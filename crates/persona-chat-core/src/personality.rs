use serde::{Deserialize, Serialize};

/// Tone tag sent with every chat request.
///
/// The catalog is fixed; `all()` returns it in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Polite,
    #[default]
    Friendly,
    Energetic,
    Mirror,
    Sarcastic,
    Professional,
}

impl Personality {
    pub fn value(&self) -> &'static str {
        match self {
            Personality::Polite => "polite",
            Personality::Friendly => "friendly",
            Personality::Energetic => "energetic",
            Personality::Mirror => "mirror",
            Personality::Sarcastic => "sarcastic",
            Personality::Professional => "professional",
        }
    }

    pub fn from_value(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "polite" => Some(Personality::Polite),
            "friendly" => Some(Personality::Friendly),
            "energetic" => Some(Personality::Energetic),
            "mirror" => Some(Personality::Mirror),
            "sarcastic" => Some(Personality::Sarcastic),
            "professional" => Some(Personality::Professional),
            _ => None,
        }
    }

    pub fn all() -> Vec<Personality> {
        vec![
            Personality::Polite,
            Personality::Friendly,
            Personality::Energetic,
            Personality::Mirror,
            Personality::Sarcastic,
            Personality::Professional,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Personality::Polite => "🎩 Polite",
            Personality::Friendly => "😊 Friendly",
            Personality::Energetic => "⚡ Energetic",
            Personality::Mirror => "🪞 Mirror",
            Personality::Sarcastic => "😏 Sarcastic",
            Personality::Professional => "💼 Professional",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Personality::Polite => "Professional & Respectful",
            Personality::Friendly => "Warm & Casual",
            Personality::Energetic => "Enthusiastic & Excited",
            Personality::Mirror => "Matches Your Energy",
            Personality::Sarcastic => "Witty & Playful",
            Personality::Professional => "Business Focused",
        }
    }

    /// Position in `all()`
    pub fn index(&self) -> usize {
        Personality::all()
            .iter()
            .position(|p| p == self)
            .unwrap_or(0)
    }
}
