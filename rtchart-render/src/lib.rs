//! Plotters-based drawing for chart descriptions.
//!
//! SVG output carries its text natively. PNG output draws text only when
//! the `ttf` feature is enabled and a system font is available.

mod rendering;

pub use rendering::{render_png, render_svg, PlottersBackend};
