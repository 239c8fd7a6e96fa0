use eframe::egui::{Color32, FontId, Painter};

/// Horizontal advance plus vertical extents around the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

/// Measures rendered text. Swappable so the headless export and tests do
/// not need a font system.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f32, bold: bool) -> TextExtent;
}

/// Monospace-ish estimate: every character advances `0.6 · size`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedAdvanceMeasure;

impl TextMeasure for FixedAdvanceMeasure {
    fn measure(&self, text: &str, font_size: f32, bold: bool) -> TextExtent {
        let advance = if bold { 0.65 } else { 0.6 };
        TextExtent {
            width: text.chars().count() as f32 * font_size * advance,
            ascent: font_size * 0.8,
            descent: font_size * 0.2,
        }
    }
}

/// Lays text out through egui's font system.
pub struct PainterMeasure<'a> {
    painter: &'a Painter,
}

impl<'a> PainterMeasure<'a> {
    pub fn new(painter: &'a Painter) -> Self {
        Self { painter }
    }
}

impl TextMeasure for PainterMeasure<'_> {
    fn measure(&self, text: &str, font_size: f32, _bold: bool) -> TextExtent {
        let galley = self.painter.layout_no_wrap(
            text.to_owned(),
            FontId::proportional(font_size),
            Color32::WHITE,
        );
        let size = galley.size();
        TextExtent {
            width: size.x,
            ascent: size.y * 0.8,
            descent: size.y * 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_advance_scales_with_length_and_size() {
        let extent = FixedAdvanceMeasure.measure("abcd", 10.0, false);
        assert!((extent.width - 24.0).abs() < 1e-5);
        assert!((extent.ascent - 8.0).abs() < 1e-5);
        assert!((extent.descent - 2.0).abs() < 1e-5);

        let bold = FixedAdvanceMeasure.measure("abcd", 10.0, true);
        assert!(bold.width > extent.width);
    }
}
