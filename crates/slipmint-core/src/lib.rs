//! Slipmint Core - Slip Data Model
//!
//! The record a slip render reads, the status/size enums, and the
//! theme/layout configuration that parametrizes the renderer.

mod color;
mod slip;
mod theme;

pub use color::{Color, ColorParseError};
pub use slip::{generate_bet_id, today, SlipRecord, SlipSize, SlipSpec, SlipStatus, SpecError};
pub use theme::{ArtFit, BannerStyle, Layout, Rect, SlipTheme, ThemeError};
