use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Grade gradient
// ---------------------------------------------------------------------------

const EASY_HUE: f32 = 210.0;
const HARD_HUE: f32 = 0.0;

/// `n` colours running from warm (hardest) to cold (easiest), matching the
/// hardest-first row order of a pyramid.
pub fn grade_gradient(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let span = (n - 1).max(1) as f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / span;
            let hue = HARD_HUE + (EASY_HUE - HARD_HUE) * t;
            hsl_to_color32(Hsl::new(hue, 0.70, 0.55))
        })
        .collect()
}

/// Muted colour for the demo pyramid, so it is not mistaken for real data.
pub fn demo_color() -> Color32 {
    hsl_to_color32(Hsl::new(EASY_HUE, 0.10, 0.55))
}

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
