use std::fmt::{Display, Formatter, Result as FmtResult, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

macro_rules! define_mod_flags {
    ( $( $variant:ident: $bit:literal, $acronym:literal, $name:literal; )* ) => {
        /// A legacy gameplay modifier with a stable bit position, two-letter
        /// acronym, and human readable name.
        #[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
        pub enum ModFlag {
            $(
                #[doc = $name]
                $variant,
            )*
        }

        impl ModFlag {
            /// Every flag in ascending bit order.
            pub const FLAGS: &'static [Self] = &[$( Self::$variant, )*];

            /// The flag's bit within a legacy mods bitmask.
            pub const fn bit(self) -> u32 {
                match self {
                    $( Self::$variant => 1 << $bit, )*
                }
            }

            /// The flag's two-letter acronym.
            pub const fn acronym(self) -> &'static str {
                match self {
                    $( Self::$variant => $acronym, )*
                }
            }

            /// The flag's human readable name.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }

            /// Look up a flag by its acronym, case-insensitively.
            pub fn from_acronym(acronym: &str) -> Option<Self> {
                $(
                    if acronym.eq_ignore_ascii_case($acronym) {
                        return Some(Self::$variant);
                    }
                )*

                None
            }
        }
    };
}

define_mod_flags! {
    NoFail: 0, "NF", "NoFail";
    Easy: 1, "EZ", "Easy";
    TouchDevice: 2, "TD", "TouchDevice";
    Hidden: 3, "HD", "Hidden";
    HardRock: 4, "HR", "HardRock";
    SuddenDeath: 5, "SD", "SuddenDeath";
    DoubleTime: 6, "DT", "DoubleTime";
    Relax: 7, "RX", "Relax";
    HalfTime: 8, "HT", "HalfTime";
    Nightcore: 9, "NC", "Nightcore";
    Flashlight: 10, "FL", "Flashlight";
    Autoplay: 11, "AT", "Autoplay";
    SpunOut: 12, "SO", "SpunOut";
    Autopilot: 13, "AP", "Autopilot";
    Perfect: 14, "PF", "Perfect";
    Key4: 15, "K4", "Key4";
    Key5: 16, "K5", "Key5";
    Key6: 17, "K6", "Key6";
    Key7: 18, "K7", "Key7";
    Key8: 19, "K8", "Key8";
    FadeIn: 20, "FI", "FadeIn";
    Random: 21, "RD", "Random";
    Cinema: 22, "CN", "Cinema";
    Target: 23, "TP", "TargetPractice";
    Key9: 24, "K9", "Key9";
    KeyCoop: 25, "CO", "KeyCoop";
    Key1: 26, "K1", "Key1";
    Key3: 27, "K3", "Key3";
    Key2: 28, "K2", "Key2";
    ScoreV2: 29, "V2", "ScoreV2";
    Mirror: 30, "MR", "Mirror";
}

/// One entry of a structured mod list as served by the osu! API,
/// e.g. `{ "acronym": "DT", "settings": { "speed_change": 1.2 } }`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ModEntry {
    /// The mod's acronym.
    pub acronym: String,
    /// Optional per-mod settings.
    #[serde(default, skip_serializing_if = "ModSettings::is_empty")]
    pub settings: ModSettings,
}

/// Settings of a [`ModEntry`].
///
/// Only `speed_change` is interpreted; all other fields are ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ModSettings {
    /// A custom clock rate for speed-changing mods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_change: Option<f64>,
}

impl ModSettings {
    fn is_empty(&self) -> bool {
        self.speed_change.is_none()
    }
}

/// The active mods of one play.
///
/// Built from exactly one of three representations, all normalizing to the
/// same bitmask for equivalent inputs:
///
/// - a legacy bitmask (`From<u32>`),
/// - an acronym string like `"HDDT"` (`From<&str>`),
/// - a structured mod list (`From<Vec<ModEntry>>`).
///
/// Immutable after construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mods {
    bits: u32,
    lazer: bool,
    explicit_rate: Option<f64>,
    entries: Option<Vec<ModEntry>>,
}

impl Mods {
    /// Mods that change the static difficulty attributes of a map.
    pub const DIFFICULTY_CHANGING: u32 = ModFlag::Easy.bit()
        | ModFlag::HardRock.bit()
        | ModFlag::DoubleTime.bit()
        | ModFlag::HalfTime.bit()
        | ModFlag::Nightcore.bit();

    /// Mods that make a play unrankable.
    pub const UNRANKED: u32 = ModFlag::Relax.bit()
        | ModFlag::Autoplay.bit()
        | ModFlag::Autopilot.bit()
        | ModFlag::Cinema.bit()
        | ModFlag::Target.bit()
        | ModFlag::ScoreV2.bit();

    /// Create mods from a legacy bitmask.
    ///
    /// Bits 0 to 30 are meaningful; the value is stored as is.
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            lazer: false,
            explicit_rate: None,
            entries: None,
        }
    }

    /// Create mods from an acronym string like `"HDDT"`.
    ///
    /// The string is scanned left to right with a growing buffer; whenever
    /// the last two characters form a known acronym, its bit is set and the
    /// buffer is cleared. The scan is greedy and never backtracks. The
    /// special token `CL` only marks the play as lazer. Characters that
    /// never become part of a token are dropped.
    pub fn from_acronyms(acronyms: &str) -> Self {
        let mut bits = 0;
        let mut lazer = false;
        let mut buf = Vec::new();

        for ch in acronyms.chars() {
            buf.push(ch);

            if buf.len() < 2 {
                continue;
            }

            let token: String = buf[buf.len() - 2..].iter().collect();

            if token.eq_ignore_ascii_case("CL") {
                lazer = true;
                buf.clear();
            } else if let Some(flag) = ModFlag::from_acronym(&token) {
                bits |= flag.bit();
                buf.clear();
            }
        }

        if !buf.is_empty() {
            let dropped: String = buf.into_iter().collect();
            debug!(%dropped, "dropping unrecognized mod characters");
        }

        Self {
            bits,
            lazer,
            explicit_rate: None,
            entries: None,
        }
    }

    /// Create mods from a structured mod list.
    ///
    /// Unrecognized acronyms contribute no bit but are kept for display.
    /// The first entry out of `DT`, `NC`, `HT`, `DC` resolves the clock
    /// rate: its `speed_change` setting if present, the mod's stock rate
    /// otherwise. A `CL` entry marks the play as lazer.
    pub fn from_entries(entries: Vec<ModEntry>) -> Self {
        let mut bits = 0;
        let mut lazer = false;
        let mut explicit_rate = None;

        for entry in &entries {
            let acronym = entry.acronym.to_ascii_uppercase();

            if acronym == "CL" {
                lazer = true;
            } else if let Some(flag) = ModFlag::from_acronym(&acronym) {
                bits |= flag.bit();
            } else if acronym != "DC" {
                debug!(acronym = %entry.acronym, "ignoring unrecognized mod acronym");
            }

            if explicit_rate.is_none() {
                explicit_rate = match acronym.as_str() {
                    "DT" | "NC" => Some(entry.settings.speed_change.unwrap_or(1.5)),
                    "HT" | "DC" => Some(entry.settings.speed_change.unwrap_or(0.75)),
                    _ => None,
                };
            }
        }

        Self {
            bits,
            lazer,
            explicit_rate,
            entries: Some(entries),
        }
    }

    /// The legacy bitmask.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Whether the play uses the modern ("lazer") scoring engine.
    pub const fn is_lazer(&self) -> bool {
        self.lazer
    }

    /// The clock rate of the play.
    ///
    /// A rate resolved from a structured mod list wins over the bit-derived
    /// one. Always exactly one positive value, `1.0` by default.
    pub fn clock_rate(&self) -> f64 {
        if let Some(rate) = self.explicit_rate {
            rate
        } else if self.intersects(ModFlag::DoubleTime.bit() | ModFlag::Nightcore.bit()) {
            1.5
        } else if self.contains(ModFlag::HalfTime) {
            0.75
        } else {
            1.0
        }
    }

    /// Whether the given flag is set.
    pub const fn contains(&self, flag: ModFlag) -> bool {
        self.bits & flag.bit() != 0
    }

    /// Whether any bit of the given mask is set.
    pub const fn intersects(&self, mask: u32) -> bool {
        self.bits & mask != 0
    }

    /// The set bits that change the static difficulty attributes of a map.
    ///
    /// Callers use this to decide whether cached difficulty attributes must
    /// be recomputed.
    pub const fn difficulty_changing_bits(&self) -> u32 {
        self.bits & Self::DIFFICULTY_CHANGING
    }
}

impl From<u32> for Mods {
    fn from(bits: u32) -> Self {
        Self::from_bits(bits)
    }
}

impl From<&str> for Mods {
    fn from(acronyms: &str) -> Self {
        Self::from_acronyms(acronyms)
    }
}

impl From<Vec<ModEntry>> for Mods {
    fn from(entries: Vec<ModEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl Display for Mods {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(ref entries) = self.entries {
            if entries.is_empty() {
                return Ok(());
            }

            f.write_char('+')?;

            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }

                f.write_str(&entry.acronym)?;

                if let Some(rate) = entry.settings.speed_change {
                    write!(f, "x{rate:.2}")?;
                }
            }

            return Ok(());
        }

        let mut bits = self.bits;

        // NC and PF imply their base mod; the game client never shows both.
        if bits & ModFlag::Nightcore.bit() != 0 {
            bits &= !ModFlag::DoubleTime.bit();
        }

        if bits & ModFlag::Perfect.bit() != 0 {
            bits &= !ModFlag::SuddenDeath.bit();
        }

        if bits == 0 {
            return Ok(());
        }

        f.write_char('+')?;

        for flag in ModFlag::FLAGS {
            if bits & flag.bit() != 0 {
                f.write_str(flag.acronym())?;
            }
        }

        Ok(())
    }
}
