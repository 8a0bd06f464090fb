use serde::{Deserialize, Serialize};

/// The mode of a beatmap or score.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// osu!standard
    #[default]
    Osu,
    /// osu!taiko
    Taiko,
    /// osu!catch
    Catch,
    /// osu!mania
    Mania,
}

impl From<u8> for GameMode {
    fn from(mode: u8) -> Self {
        match mode {
            1 => Self::Taiko,
            2 => Self::Catch,
            3 => Self::Mania,
            _ => Self::Osu,
        }
    }
}
