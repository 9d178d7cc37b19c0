use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ConditionMain;

/// Background theme selected from the current weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    Clear,
    Clouds,
    Precipitation,
    Snow,
    Haze,
    #[default]
    Default,
}

impl ThemeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::Clear => "clear",
            ThemeId::Clouds => "clouds",
            ThemeId::Precipitation => "precipitation",
            ThemeId::Snow => "snow",
            ThemeId::Haze => "haze",
            ThemeId::Default => "default",
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a condition group to its theme. Mist and Haze map independently to
/// `haze`; unseen groups fall back to `default`.
pub fn map_theme(condition: &ConditionMain) -> ThemeId {
    match condition {
        ConditionMain::Clear => ThemeId::Clear,
        ConditionMain::Clouds => ThemeId::Clouds,
        ConditionMain::Rain | ConditionMain::Thunderstorm | ConditionMain::Drizzle => {
            ThemeId::Precipitation
        }
        ConditionMain::Snow => ThemeId::Snow,
        ConditionMain::Mist | ConditionMain::Haze => ThemeId::Haze,
        ConditionMain::Other(_) => ThemeId::Default,
    }
}
