use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging map for correlation values
// ---------------------------------------------------------------------------

const COOL: (u8, u8, u8) = (59, 76, 192);
const NEUTRAL: (u8, u8, u8) = (221, 221, 221);
const WARM: (u8, u8, u8) = (180, 4, 38);

/// Cell colour for undefined correlations.
pub const UNDEFINED: Color32 = Color32::DARK_GRAY;

/// Blue → grey → red for values in [-1, 1], blended in linear RGB.
/// Values outside the range are clamped.
pub fn diverging(value: f64) -> Color32 {
    let t = value.clamp(-1.0, 1.0) as f32;
    let (from, to, factor) = if t < 0.0 {
        (NEUTRAL, COOL, -t)
    } else {
        (NEUTRAL, WARM, t)
    };
    let mixed = linear(from).mix(linear(to), factor);
    to_color32(Srgb::from_linear(mixed))
}

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
    }

    fn close(c: Color32, (r, g, b): (u8, u8, u8)) -> bool {
        c.r().abs_diff(r) <= 1 && c.g().abs_diff(g) <= 1 && c.b().abs_diff(b) <= 1
    }

    #[test]
    fn test_diverging_endpoints() {
        assert!(close(diverging(-1.0), COOL));
        assert!(close(diverging(0.0), NEUTRAL));
        assert!(close(diverging(1.0), WARM));
        assert_eq!(diverging(5.0), diverging(1.0));
    }

    #[test]
    fn test_diverging_sign_picks_hue() {
        let warm = diverging(0.8);
        let cool = diverging(-0.8);
        assert!(warm.r() > warm.b());
        assert!(cool.b() > cool.r());
    }
}
