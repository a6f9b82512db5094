use crate::core::constants::DEFAULT_SCREEN_PADDING;
use crate::core::geo::{Position, Size};
use crate::PrateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where on the screen a pop-up window is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenCorner {
    LeftBottom,
    LeftTop,
    RightBottom,
    RightTop,
    Center,
}

impl ScreenCorner {
    pub const ALL: [ScreenCorner; 5] = [
        ScreenCorner::LeftBottom,
        ScreenCorner::LeftTop,
        ScreenCorner::RightBottom,
        ScreenCorner::RightTop,
        ScreenCorner::Center,
    ];

    /// Case-insensitive lookup; `right-top`, `righttop` and `RIGHT_TOP` all match
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "leftbottom" => Some(Self::LeftBottom),
            "lefttop" => Some(Self::LeftTop),
            "rightbottom" => Some(Self::RightBottom),
            "righttop" => Some(Self::RightTop),
            "center" | "centre" => Some(Self::Center),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::LeftBottom => "left-bottom",
            Self::LeftTop => "left-top",
            Self::RightBottom => "right-bottom",
            Self::RightTop => "right-top",
            Self::Center => "center",
        }
    }

    /// Top-left corner of a `window` placed on `screen`, `padding` pixels
    /// from the edges. Centering ignores the padding.
    pub fn place(self, screen: Size, window: Size, padding: i32) -> Position {
        let right = screen.width - window.width - padding;
        let bottom = screen.height - window.height - padding;

        match self {
            Self::LeftBottom => Position::new(padding, bottom),
            Self::LeftTop => Position::new(padding, padding),
            Self::RightBottom => Position::new(right, bottom),
            Self::RightTop => Position::new(right, padding),
            Self::Center => Position::new(
                (screen.width - window.width).div_euclid(2),
                (screen.height - window.height).div_euclid(2),
            ),
        }
    }

    pub fn place_default(self, screen: Size, window: Size) -> Position {
        self.place(screen, window, DEFAULT_SCREEN_PADDING)
    }
}

/// Resolve a corner name to a window position, falling back to the origin
/// when the name is not recognised.
pub fn place_by_name(name: &str, screen: Size, window: Size) -> Position {
    match ScreenCorner::from_name(name) {
        Some(corner) => corner.place_default(screen, window),
        None => {
            log::warn!("unknown screen position {:?}, using origin", name);
            Position::ORIGIN
        }
    }
}

impl fmt::Display for ScreenCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScreenCorner {
    type Err = PrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| PrateError::Config(format!("unknown screen position {:?}", s)))
    }
}
