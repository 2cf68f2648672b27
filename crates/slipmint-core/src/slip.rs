//! Slip record model
//!
//! The immutable per-render snapshot of everything a slip displays,
//! plus the serde-facing spec form with defaulting.

use crate::color::Color;
use rand::Rng;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Settlement state of a bet. Fill colors come from the theme palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlipStatus {
    Won,
    Lost,
    Pending,
}

impl SlipStatus {
    /// Uppercase pill text.
    pub fn label(&self) -> &'static str {
        match self {
            SlipStatus::Won => "WON",
            SlipStatus::Lost => "LOST",
            SlipStatus::Pending => "PENDING",
        }
    }
}

impl fmt::Display for SlipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlipStatus::Won => "won",
            SlipStatus::Lost => "lost",
            SlipStatus::Pending => "pending",
        };
        f.write_str(s)
    }
}

impl FromStr for SlipStatus {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "won" => Ok(SlipStatus::Won),
            "lost" => Ok(SlipStatus::Lost),
            "pending" => Ok(SlipStatus::Pending),
            _ => Err(SpecError::UnknownStatus(s.to_string())),
        }
    }
}

// Spec files accept the same case-insensitive spellings the CLI does.
impl<'de> Deserialize<'de> for SlipStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Canvas size preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlipSize {
    Widescreen,
    Square,
}

impl SlipSize {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            SlipSize::Widescreen => (1920, 1080),
            SlipSize::Square => (1080, 1080),
        }
    }
}

impl fmt::Display for SlipSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlipSize::Widescreen => "widescreen",
            SlipSize::Square => "square",
        };
        f.write_str(s)
    }
}

impl FromStr for SlipSize {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "widescreen" => Ok(SlipSize::Widescreen),
            "square" => Ok(SlipSize::Square),
            _ => Err(SpecError::UnknownSize(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for SlipSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Everything one render pass reads. Always fully populated; the renderer
/// only borrows it and never writes back.
#[derive(Debug, Clone, PartialEq)]
pub struct SlipRecord {
    pub market_question: String,
    pub status: SlipStatus,
    /// Free-text pill label. `None` draws the status label.
    pub side_label: Option<String>,
    /// Pill fill override. `None` draws the status palette color.
    pub pill_color: Option<Color>,
    pub odds: String,
    pub bet_type: String,
    pub amount: String,
    pub paid: String,
    pub bet_id: String,
    pub date_placed: String,
    pub size: SlipSize,
}

impl SlipRecord {
    /// Pill text: the free-text side label when present, else the status label.
    pub fn pill_label(&self) -> &str {
        self.side_label.as_deref().unwrap_or(self.status.label())
    }
}

impl Default for SlipRecord {
    fn default() -> Self {
        Self {
            market_question: "Will the Bills win the Super Bowl?".to_string(),
            status: SlipStatus::Won,
            side_label: None,
            pill_color: None,
            odds: "-145".to_string(),
            bet_type: "Moneyline".to_string(),
            amount: "0.95".to_string(),
            paid: "1.60".to_string(),
            bet_id: generate_bet_id(),
            date_placed: today(),
            size: SlipSize::Widescreen,
        }
    }
}

/// Generate a 9-character uppercase alphanumeric bet id.
pub fn generate_bet_id() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    (0..9)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Today's date, receipt style ("Aug 26, 2026").
pub fn today() -> String {
    chrono::Local::now().format("%b %d, %Y").to_string()
}

/// Serde-facing input form. Every field is optional; `into_record` fills
/// the gaps. Aliases accept the field names older slip files used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlipSpec {
    #[serde(alias = "eventTitle", alias = "marketQuestion")]
    pub market_question: Option<String>,
    pub status: Option<SlipStatus>,
    #[serde(alias = "sideLabel")]
    pub side_label: Option<String>,
    #[serde(alias = "pillColor")]
    pub pill_color: Option<Color>,
    #[serde(alias = "avgPrice")]
    pub odds: Option<String>,
    #[serde(alias = "betType")]
    pub bet_type: Option<String>,
    #[serde(alias = "betAmount")]
    pub amount: Option<String>,
    #[serde(alias = "toWinAmount")]
    pub paid: Option<String>,
    #[serde(alias = "betId")]
    pub bet_id: Option<String>,
    #[serde(alias = "datePlaced")]
    pub date_placed: Option<String>,
    pub size: Option<SlipSize>,
    /// Path to the optional market thumbnail, resolved by the asset layer.
    #[serde(alias = "marketImage")]
    pub market_image: Option<PathBuf>,
}

impl SlipSpec {
    /// Load a spec from a `.toml` or `.json` file.
    pub fn from_path(path: &Path) -> Result<Self, SpecError> {
        let ext = path.extension().and_then(|e| e.to_str());
        match ext {
            Some("toml") => Ok(toml::from_str(&std::fs::read_to_string(path)?)?),
            Some("json") => Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?),
            _ => Err(SpecError::UnknownFormat(path.to_path_buf())),
        }
    }

    /// Resolve into a fully populated record, defaulting absent fields.
    pub fn into_record(self) -> SlipRecord {
        let base = SlipRecord::default();
        if self.bet_id.is_none() {
            debug!("no bet id in spec, generating one");
        }
        SlipRecord {
            market_question: self.market_question.unwrap_or(base.market_question),
            status: self.status.unwrap_or(base.status),
            side_label: self.side_label,
            pill_color: self.pill_color,
            odds: self.odds.unwrap_or(base.odds),
            bet_type: self.bet_type.unwrap_or(base.bet_type),
            amount: self.amount.unwrap_or(base.amount),
            paid: self.paid.unwrap_or(base.paid),
            bet_id: self.bet_id.unwrap_or(base.bet_id),
            date_placed: self.date_placed.unwrap_or(base.date_placed),
            size: self.size.unwrap_or(base.size),
        }
    }
}

/// Slip spec parsing and field errors.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("failed to read slip spec: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid toml slip spec: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid json slip spec: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognized slip spec format: {0} (expected .toml or .json)")]
    UnknownFormat(PathBuf),

    #[error("unknown status {0:?}, expected won, lost or pending")]
    UnknownStatus(String),

    #[error("unknown size {0:?}, expected widescreen or square")]
    UnknownSize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("won".parse::<SlipStatus>().unwrap(), SlipStatus::Won);
        assert_eq!("PENDING".parse::<SlipStatus>().unwrap(), SlipStatus::Pending);
        assert!("push".parse::<SlipStatus>().is_err());
    }

    #[test]
    fn test_size_dimensions() {
        assert_eq!(SlipSize::Widescreen.dimensions(), (1920, 1080));
        assert_eq!(SlipSize::Square.dimensions(), (1080, 1080));
    }

    #[test]
    fn test_spec_toml_with_aliases() {
        let spec: SlipSpec = toml::from_str(
            r##"
            eventTitle = "Will the Bills win the Super Bowl?"
            status = "lost"
            betAmount = "100.00"
            pillColor = "#a855f7"
            "##,
        )
        .unwrap();
        let record = spec.into_record();
        assert_eq!(record.market_question, "Will the Bills win the Super Bowl?");
        assert_eq!(record.status, SlipStatus::Lost);
        assert_eq!(record.amount, "100.00");
        assert_eq!(record.pill_color, Some(Color::VIOLET));
    }

    #[test]
    fn test_spec_json() {
        let spec: SlipSpec =
            serde_json::from_str(r#"{"odds": "+215", "size": "square"}"#).unwrap();
        let record = spec.into_record();
        assert_eq!(record.odds, "+215");
        assert_eq!(record.size, SlipSize::Square);
    }

    #[test]
    fn test_spec_status_and_size_any_case() {
        let spec: SlipSpec = toml::from_str(
            r#"
            status = "Won"
            size = "SQUARE"
            "#,
        )
        .unwrap();
        let record = spec.into_record();
        assert_eq!(record.status, SlipStatus::Won);
        assert_eq!(record.size, SlipSize::Square);

        let err = toml::from_str::<SlipSpec>(r#"status = "push""#).unwrap_err();
        assert!(err.to_string().contains("unknown status"));
    }

    #[test]
    fn test_spec_bad_color_is_a_parse_error() {
        let err = toml::from_str::<SlipSpec>(r#"pillColor = "chartreuse""#).unwrap_err();
        assert!(err.to_string().contains("invalid color"));
    }

    #[test]
    fn test_empty_spec_defaults() {
        let record = SlipSpec::default().into_record();
        assert_eq!(record.bet_id.len(), 9);
        assert!(record.bet_id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!record.date_placed.is_empty());
        assert_eq!(record.status, SlipStatus::Won);
        assert_eq!(record.side_label, None);
    }

    #[test]
    fn test_unknown_format() {
        let err = SlipSpec::from_path(Path::new("slip.yaml")).unwrap_err();
        assert!(matches!(err, SpecError::UnknownFormat(_)));
    }
}
