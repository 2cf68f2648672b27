//! Slipmint Render - CPU Slip Compositor
//!
//! A software 2D pipeline that composes the full bet-slip receipt onto
//! an RGBA surface: shapes, clipped bitmaps, text and seeded confetti.

mod canvas;
mod confetti;
mod layout;
mod slip;
mod text;

pub use canvas::{Baseline, Canvas, TextAlign};
pub use confetti::{confetti, Particle, ParticleRng, ParticleShape};
pub use layout::wrap_text;
pub use slip::render_slip;
pub use text::{FontFace, RenderError};
