//! Sound categories
//!
//! Advisory only: by convention a host plays at most one `Music` sound at a
//! time, but nothing here enforces it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AudioError;

/// Sound category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCategory {
    /// Background music
    Music,
    /// Sound effect (keep these short)
    #[default]
    Effect,
}

impl SoundCategory {
    /// Label used in configs and by hosts
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Effect => "effect",
        }
    }
}

impl fmt::Display for SoundCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundCategory {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "music" => Ok(Self::Music),
            "effect" => Ok(Self::Effect),
            other => Err(AudioError::InvalidData(format!("unknown sound category: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for category in [SoundCategory::Music, SoundCategory::Effect] {
            assert_eq!(category.as_str().parse::<SoundCategory>().unwrap(), category);
        }
        assert_eq!(SoundCategory::default(), SoundCategory::Effect);
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(matches!("ambient".parse::<SoundCategory>(), Err(AudioError::InvalidData(_))));
    }
}
