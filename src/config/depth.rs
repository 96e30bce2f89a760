use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Inclusive depth range within which pages are rewritten and saved
///
/// Pages shallower than `min` are still traversed for links; nothing deeper
/// than `max` is ever fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "DepthSpec")]
pub struct DepthWindow {
    pub min: u32,
    pub max: u32,
}

impl DepthWindow {
    /// Creates a window `[min, max]`
    pub fn new(min: u32, max: u32) -> ConfigResult<Self> {
        if min > max {
            return Err(ConfigError::InvalidDepth(format!(
                "minimum depth {} is greater than maximum depth {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Returns true if pages at this depth are analyzed and stored
    pub fn contains(&self, depth: u32) -> bool {
        self.min <= depth && depth <= self.max
    }
}

impl Default for DepthWindow {
    fn default() -> Self {
        Self { min: 0, max: 0 }
    }
}

/// Parses `D` (window `[0, D]`) or `MIN-MAX`
///
/// # Examples
///
/// ```
/// use site_mirror::config::DepthWindow;
///
/// let window: DepthWindow = "2".parse().unwrap();
/// assert_eq!((window.min, window.max), (0, 2));
///
/// let window: DepthWindow = "1-3".parse().unwrap();
/// assert_eq!((window.min, window.max), (1, 3));
/// ```
impl FromStr for DepthWindow {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |part: &str| {
            part.trim().parse::<u32>().map_err(|_| {
                ConfigError::InvalidDepth(format!(
                    "expected a non-negative integer or MIN-MAX, got '{}'",
                    s
                ))
            })
        };

        match s.split_once('-') {
            Some((min, max)) => Self::new(parse(min)?, parse(max)?),
            None => Self::new(0, parse(s)?),
        }
    }
}

impl fmt::Display for DepthWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Accepts both `depth = 2` and `depth = "1-2"` in TOML
#[derive(Deserialize)]
#[serde(untagged)]
enum DepthSpec {
    Max(u32),
    Text(String),
}

impl TryFrom<DepthSpec> for DepthWindow {
    type Error = ConfigError;

    fn try_from(spec: DepthSpec) -> Result<Self, Self::Error> {
        match spec {
            DepthSpec::Max(max) => Self::new(0, max),
            DepthSpec::Text(text) => text.parse(),
        }
    }
}
