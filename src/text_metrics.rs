//! Label width estimation for the layout engine.
//!
//! The engine only needs a half-width per label, so the estimator is a small
//! trait: the default implementation is the character-count heuristic the
//! editor has always used, and [`FontMetricsEstimator`] replaces it with real
//! glyph advances from a system font when one is available.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::sync::Mutex;
use ttf_parser::Face;

/// Estimates the rendered half-width of a feature label. The layout engine
/// clamps the result to half the configured maximum node width.
pub trait NodeWidthEstimator {
    fn half_width(&self, label: &str) -> i32;
}

/// `scale_text * character count`. Works for a normal distribution of
/// letters but underestimates labels made of wide glyphs; swap in
/// [`FontMetricsEstimator`] for pixel-accurate widths.
#[derive(Debug, Clone, Copy)]
pub struct CharCountEstimator {
    pub scale_text: i32,
}

impl CharCountEstimator {
    pub fn new(scale_text: i32) -> Self {
        Self { scale_text }
    }
}

impl NodeWidthEstimator for CharCountEstimator {
    fn half_width(&self, label: &str) -> i32 {
        self.scale_text * label.chars().count() as i32
    }
}

/// Measures labels against a system sans-serif face. Falls back to the
/// character-count heuristic when no usable font is found.
#[derive(Debug)]
pub struct FontMetricsEstimator {
    font_size: f32,
    fallback: CharCountEstimator,
}

impl FontMetricsEstimator {
    pub fn new(font_size: f32, fallback: CharCountEstimator) -> Self {
        Self {
            font_size,
            fallback,
        }
    }
}

impl NodeWidthEstimator for FontMetricsEstimator {
    fn half_width(&self, label: &str) -> i32 {
        match measure_text_width(label, self.font_size) {
            Some(width) => (width / 2.0).ceil() as i32,
            None => self.fallback.half_width(label),
        }
    }
}

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Width of `text` in pixels at the given size, using the process-wide font
/// cache. `None` if no system font could be loaded.
pub fn measure_text_width(text: &str, font_size: f32) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size)
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    face: Option<Option<FontData>>,
}

struct FontData {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            face: None,
        }
    }

    fn measure(&mut self, text: &str, font_size: f32) -> Option<f32> {
        if self.face.is_none() {
            let loaded = self.load_face();
            self.face = Some(loaded);
        }
        let font = self.face.as_ref()?.as_ref()?;
        let face = Face::parse(&font.data, font.index).ok()?;
        let scale = font_size / font.units_per_em.max(1) as f32;
        let fallback = font_size * 0.56;

        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' || ch == '\t' {
                width += fallback;
                continue;
            }
            match face.glyph_index(ch) {
                Some(glyph) => {
                    let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
                    if advance == 0 {
                        width += fallback;
                    } else {
                        width += advance as f32 * scale;
                    }
                }
                None => width += fallback,
            }
        }
        Some(width.max(0.0))
    }

    fn load_face(&mut self) -> Option<FontData> {
        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }
        let query = Query {
            families: &[Family::SansSerif],
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded: Option<FontData> = None;
        self.db.with_face_data(id, |data, index| {
            if let Ok(face) = Face::parse(data, index) {
                loaded = Some(FontData {
                    data: data.to_vec(),
                    index,
                    units_per_em: face.units_per_em(),
                });
            }
        });
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_count_scales_with_length() {
        let estimator = CharCountEstimator::new(3);
        assert_eq!(estimator.half_width(""), 0);
        assert_eq!(estimator.half_width("bread"), 15);
        assert_eq!(estimator.half_width("sandwich"), 24);
    }

    #[test]
    fn zero_font_size_measures_zero() {
        let estimator = FontMetricsEstimator::new(0.0, CharCountEstimator::new(3));
        assert_eq!(estimator.half_width("abc"), 0);
    }

    #[test]
    fn empty_text_measures_zero() {
        assert_eq!(measure_text_width("", 12.0), Some(0.0));
    }
}
