//! Font lookup, text measurement and text drawing
//!
//! Fonts are located by family name among the system font directories.
//! When no font file matches, widths are estimated and text is not drawn.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use image::Rgba;
use imageproc::drawing::{draw_text_mut, text_size};
use tiny_skia::Pixmap;

use super::image::with_rgba;
use crate::domain::TextAnnotation;

/// Average glyph advance as a fraction of the font size, used without a font file
pub const ESTIMATED_ADVANCE: f32 = 0.6;

/// Depth limit when scanning font directories
const MAX_SCAN_DEPTH: usize = 4;

/// Measures rendered text width in surface pixels
pub trait TextMeasure {
    fn text_width(&self, text: &str, font: &str, size: f32) -> f32;
}

/// Width estimate from character count alone
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMeasure;

impl TextMeasure for EstimatedMeasure {
    fn text_width(&self, text: &str, _font: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * ESTIMATED_ADVANCE
    }
}

/// Cache of fonts resolved by family name
pub struct FontBook {
    dirs: Vec<PathBuf>,
    files: RefCell<Option<Vec<PathBuf>>>,
    fonts: RefCell<HashMap<String, Option<FontArc>>>,
}

impl FontBook {
    /// Font book over the platform's usual font directories
    pub fn system() -> Self {
        Self::with_dirs(system_font_dirs())
    }

    /// Font book without any font files: measurement is always estimated
    pub fn empty() -> Self {
        Self::with_dirs(Vec::new())
    }

    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            files: RefCell::new(None),
            fonts: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve a CSS-like family list ("Arial, sans-serif") to a loaded font
    pub fn font(&self, family: &str) -> Option<FontArc> {
        if let Some(cached) = self.fonts.borrow().get(family) {
            return cached.clone();
        }
        let resolved = self.resolve(family);
        match &resolved {
            Some(_) => log::debug!("Resolved font family {family:?}"),
            None => log::warn!("No font file for {family:?}, text widths will be estimated"),
        }
        self.fonts
            .borrow_mut()
            .insert(family.to_string(), resolved.clone());
        resolved
    }

    fn resolve(&self, family: &str) -> Option<FontArc> {
        let files = self.font_files();
        if files.is_empty() {
            return None;
        }
        for candidate in family_candidates(family) {
            for path in &files {
                let stem = path.file_stem().and_then(|s| s.to_str()).map(normalize_name);
                if stem.as_deref() != Some(candidate.as_str()) {
                    continue;
                }
                match std::fs::read(path).map(FontArc::try_from_vec) {
                    Ok(Ok(font)) => return Some(font),
                    Ok(Err(err)) => {
                        log::debug!("Skipping unreadable font {}: {err}", path.display())
                    }
                    Err(err) => log::debug!("Cannot read {}: {err}", path.display()),
                }
            }
        }
        None
    }

    fn font_files(&self) -> Vec<PathBuf> {
        if let Some(files) = self.files.borrow().as_ref() {
            return files.clone();
        }
        let mut files = Vec::new();
        for dir in &self.dirs {
            collect_font_files(dir, 0, &mut files);
        }
        *self.files.borrow_mut() = Some(files.clone());
        files
    }

    /// Draw a text annotation with its top-left corner at the anchor
    pub fn draw_text(&self, pixmap: &mut Pixmap, text: &TextAnnotation) {
        if text.content.is_empty() {
            return;
        }
        let Some(font) = self.font(&text.font) else {
            return;
        };
        with_rgba(pixmap, |img| {
            draw_text_mut(
                img,
                Rgba(text.color.to_rgba_u8()),
                text.anchor.x.round() as i32,
                text.anchor.y.round() as i32,
                PxScale::from(text.font_size),
                &font,
                &text.content,
            );
        });
    }
}

impl TextMeasure for FontBook {
    fn text_width(&self, text: &str, font: &str, size: f32) -> f32 {
        match self.font(font) {
            Some(f) => text_size(PxScale::from(size), &f, text).0 as f32,
            None => EstimatedMeasure.text_width(text, font, size),
        }
    }
}

fn system_font_dirs() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Some(fonts) = dirs::font_dir() {
        paths.push(fonts);
    }
    paths
}

fn collect_font_files(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_font_files(&path, depth + 1, out);
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
        {
            out.push(path);
        }
    }
}

/// Lowercase alphanumerics only: "DejaVu Sans-Bold" -> "dejavusansbold"
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// File-stem candidates for a family list, most specific first
fn family_candidates(family: &str) -> Vec<String> {
    const SANS: &[&str] = &[
        "arial",
        "helvetica",
        "dejavusans",
        "liberationsans",
        "notosans",
        "segoeui",
    ];
    const SERIF: &[&str] = &[
        "timesnewroman",
        "times",
        "dejavuserif",
        "liberationserif",
        "notoserif",
    ];
    const MONO: &[&str] = &[
        "couriernew",
        "menlo",
        "dejavusansmono",
        "liberationmono",
        "notosansmono",
    ];

    let mut candidates = Vec::new();
    let mut push = |name: String| {
        if !candidates.contains(&name) {
            candidates.push(name);
        }
    };

    for part in family.split(',') {
        let name = normalize_name(part.trim().trim_matches(|c: char| c == '"' || c == '\''));
        let generic = match name.as_str() {
            "sansserif" => Some(SANS),
            "serif" => Some(SERIF),
            "monospace" => Some(MONO),
            _ => None,
        };
        match generic {
            Some(list) => {
                for n in list {
                    push(n.to_string());
                    push(format!("{n}regular"));
                }
            }
            None if !name.is_empty() => {
                push(format!("{name}regular"));
                push(name);
            }
            None => {}
        }
    }

    for n in SANS {
        push(n.to_string());
        push(format!("{n}regular"));
    }
    candidates
}
