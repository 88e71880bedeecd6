//! Length parsing and the unit context.
//!
//! The internal unit is centimeters. SVG user units default to 90 dpi pixels,
//! so most suffixed units are expressed as a ratio over [`PIXELS_PER_CM`].
//! `em`/`ex` are relative to the current font size and `%` to the viewport
//! diagonal; both live in the per-call [`UnitContext`] rather than any global
//! state, so independent imports cannot contaminate each other.

use std::fmt;

/// SVG user units (90 dpi pixels) per centimeter.
pub const PIXELS_PER_CM: f64 = 35.43307;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LengthError {
    #[error("no numeric value in length {text:?}")]
    Malformed { text: String },

    #[error("unknown unit {unit:?} in length {text:?}")]
    UnknownUnit { unit: String, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// No suffix: the value is already in the scaled document coordinate space.
    None,
    Em,
    Ex,
    Px,
    Pt,
    Pc,
    Cm,
    Mm,
    In,
    Percent,
}

impl LengthUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::None => "",
            LengthUnit::Em => "em",
            LengthUnit::Ex => "ex",
            LengthUnit::Px => "px",
            LengthUnit::Pt => "pt",
            LengthUnit::Pc => "pc",
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
            LengthUnit::In => "in",
            LengthUnit::Percent => "%",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "" => Some(LengthUnit::None),
            "em" => Some(LengthUnit::Em),
            "ex" => Some(LengthUnit::Ex),
            "px" => Some(LengthUnit::Px),
            "pt" => Some(LengthUnit::Pt),
            "pc" => Some(LengthUnit::Pc),
            "cm" => Some(LengthUnit::Cm),
            "mm" => Some(LengthUnit::Mm),
            "in" => Some(LengthUnit::In),
            "%" => Some(LengthUnit::Percent),
            _ => None,
        }
    }
}

/// A number plus the unit it was written in. Resolution to centimeters is
/// deferred so the original spelling survives re-serialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Parses a decimal number with an optional unit suffix or trailing `%`.
    pub fn parse(text: &str) -> Result<Self, LengthError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(LengthError::Malformed {
                text: text.to_string(),
            });
        }

        let (number, suffix) = if let Some(stripped) = trimmed.strip_suffix('%') {
            (stripped, "%")
        } else {
            let split = trimmed
                .rfind(|c: char| !c.is_ascii_alphabetic())
                .map_or(0, |i| i + 1);
            (&trimmed[..split], &trimmed[split..])
        };

        let unit = LengthUnit::from_suffix(suffix).ok_or_else(|| LengthError::UnknownUnit {
            unit: suffix.to_string(),
            text: text.to_string(),
        })?;
        let value = number
            .trim()
            .parse::<f64>()
            .map_err(|_| LengthError::Malformed {
                text: text.to_string(),
            })?;
        Ok(Self { value, unit })
    }

    /// Converts to internal centimeters under the given context.
    pub fn resolve(&self, ctx: &UnitContext) -> f64 {
        match self.unit {
            LengthUnit::None => self.value * ctx.user_scale,
            LengthUnit::Em => self.value * ctx.font_size,
            LengthUnit::Ex => self.value * ctx.font_size * 2.0,
            LengthUnit::Px => self.value * 1.0 / PIXELS_PER_CM,
            LengthUnit::Pt => self.value * 1.25 / PIXELS_PER_CM,
            LengthUnit::Pc => self.value * 15.0 / PIXELS_PER_CM,
            LengthUnit::Cm => self.value * 35.43307 / PIXELS_PER_CM,
            LengthUnit::Mm => self.value * 3.543307 / PIXELS_PER_CM,
            LengthUnit::In => self.value * 90.0 / PIXELS_PER_CM,
            LengthUnit::Percent => self.value * ctx.view_length / 100.0,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Parses and resolves in one step.
pub fn parse_length(text: &str, ctx: &UnitContext) -> Result<f64, LengthError> {
    Ok(Length::parse(text)?.resolve(ctx))
}

/// Parse-call-scoped unit state. Constructed fresh per import/export call and
/// threaded by parameter; never shared between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitContext {
    /// Factor applied to unit-less numbers (the document coordinate scale).
    pub user_scale: f64,
    /// Current font size in centimeters, for `em`/`ex`.
    pub font_size: f64,
    /// Viewport diagonal in user units, for `%`.
    pub view_length: f64,
}

impl Default for UnitContext {
    fn default() -> Self {
        Self {
            user_scale: 1.0,
            font_size: 0.7,
            view_length: 32.0,
        }
    }
}

impl UnitContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the document-level scale from the root element's `width`,
    /// `height` (already resolved to centimeters) and `viewBox`.
    ///
    /// The user scale becomes the ratio of the document size to the viewBox
    /// size (geometric mean when both axes are known), and the viewport
    /// diagonal for `%` lengths is derived from the viewBox. Applied in a
    /// fixed order regardless of attribute order in the file.
    pub fn set_document_extents(
        &mut self,
        width_cm: Option<f64>,
        height_cm: Option<f64>,
        view_box: Option<[f64; 4]>,
    ) {
        // viewBox is "min-x min-y width height".
        let Some([_, _, w, h]) = view_box else {
            return;
        };
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        match (width_cm, height_cm) {
            (Some(wc), Some(hc)) => self.user_scale = ((wc / w) * (hc / h)).sqrt(),
            (Some(wc), None) => self.user_scale = wc / w,
            (None, Some(hc)) => self.user_scale = hc / h,
            (None, None) => {}
        }
        self.view_length = (w * h).sqrt();
    }
}
