//! Colors shared by world visuals and the HUD.

use bevy::prelude::*;

pub struct Palette;
impl Palette {
    /// #F7F4C8
    pub const BACKGROUND: Color = Color::srgb(0.969, 0.957, 0.784);
    /// #E6B143
    pub const BOUNDARY: Color = Color::srgb(0.902, 0.694, 0.263);
    pub const PANEL: Color = Color::srgba(1.0, 1.0, 1.0, 0.7);
    /// #FF4A4A
    pub const NEXT_LABEL: Color = Color::srgb(1.0, 0.290, 0.290);
    /// #EE3333
    pub const QUIT_TEXT: Color = Color::srgb(0.933, 0.2, 0.2);
    pub const SCRIM: Color = Color::srgba(0.0, 0.0, 0.0, 0.45);
    pub const DIALOG_TEXT: Color = Color::srgb(0.2, 0.2, 0.2);
}

/// Fallback tint for a fruit whose image is missing.
#[inline]
pub fn fruit_tint(rgb: [f32; 3]) -> Color {
    Color::srgb(rgb[0], rgb[1], rgb[2])
}
