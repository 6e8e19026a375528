//! Run configuration
//!
//! A [`Config`] is built once at startup (defaults, then an optional JSON file,
//! then command-line overrides), validated, and passed by reference to every
//! component. Nothing here is mutated after the batch starts.

use crate::{CertError, Result};
use pdf_core::StandardFont;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Font family used for a field
///
/// Maps one-to-one onto the standard PDF fonts supported by `pdf-core`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum FontFamily {
    #[default]
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesRomanBold,
    Courier,
    CourierBold,
}

impl From<FontFamily> for StandardFont {
    fn from(family: FontFamily) -> Self {
        match family {
            FontFamily::Helvetica => StandardFont::Helvetica,
            FontFamily::HelveticaBold => StandardFont::HelveticaBold,
            FontFamily::TimesRoman => StandardFont::TimesRoman,
            FontFamily::TimesRomanBold => StandardFont::TimesRomanBold,
            FontFamily::Courier => StandardFont::Courier,
            FontFamily::CourierBold => StandardFont::CourierBold,
        }
    }
}

/// RGB Color for text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    /// Red component (0.0 - 1.0)
    pub r: f32,
    /// Green component (0.0 - 1.0)
    pub g: f32,
    /// Blue component (0.0 - 1.0)
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    fn is_valid(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for pdf_core::Color {
    fn from(color: Color) -> Self {
        pdf_core::Color::rgb(color.r, color.g, color.b)
    }
}

/// Where and how a single field is drawn
///
/// The anchor is the horizontal center of the text and its baseline, in PDF
/// points measured from the bottom-left corner of the page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StyleDescriptor {
    #[serde(rename = "anchorX")]
    pub anchor_x: f64,

    #[serde(rename = "anchorY")]
    pub anchor_y: f64,

    /// Nominal font size in points
    #[serde(rename = "fontSize")]
    pub font_size: f32,

    /// Smallest size long text may shrink to (defaults to half the nominal size)
    #[serde(rename = "minFontSize", default)]
    pub min_font_size: Option<f32>,

    #[serde(rename = "fontFamily", default)]
    pub font_family: FontFamily,

    #[serde(default)]
    pub color: Color,
}

impl StyleDescriptor {
    fn validate(&self, field: &str) -> Result<()> {
        if self.font_size.is_nan() || self.font_size <= 0.0 {
            return Err(CertError::Config(format!(
                "{field}: fontSize must be positive, got {}",
                self.font_size
            )));
        }

        if let Some(min) = self.min_font_size {
            if min.is_nan() || min <= 0.0 || min > self.font_size {
                return Err(CertError::Config(format!(
                    "{field}: minFontSize must be in (0, {}], got {min}",
                    self.font_size
                )));
            }
        }

        if !self.color.is_valid() {
            return Err(CertError::Config(format!(
                "{field}: color components must be within [0, 1]"
            )));
        }

        if !self.anchor_x.is_finite() || !self.anchor_y.is_finite() {
            return Err(CertError::Config(format!("{field}: anchor must be finite")));
        }

        Ok(())
    }
}

/// Styles for the three drawn fields
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Styles {
    pub name: StyleDescriptor,
    pub date: StyleDescriptor,
    pub issuer: StyleDescriptor,
}

impl Default for Styles {
    // Positions assume an A4 landscape template (842 x 595 pt)
    fn default() -> Self {
        Self {
            name: StyleDescriptor {
                anchor_x: 421.0,
                anchor_y: 300.0,
                font_size: 36.0,
                min_font_size: Some(18.0),
                font_family: FontFamily::HelveticaBold,
                color: Color::rgb(0.1, 0.2, 0.5),
            },
            date: StyleDescriptor {
                anchor_x: 421.0,
                anchor_y: 220.0,
                font_size: 16.0,
                min_font_size: None,
                font_family: FontFamily::Helvetica,
                color: Color::rgb(0.2, 0.2, 0.2),
            },
            issuer: StyleDescriptor {
                anchor_x: 421.0,
                anchor_y: 160.0,
                font_size: 16.0,
                min_font_size: None,
                font_family: FontFamily::TimesRomanBold,
                color: Color::black(),
            },
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Template PDF (read only)
    #[serde(rename = "templatePath")]
    pub template_path: PathBuf,

    /// Directory certificates are written to (created if missing)
    #[serde(rename = "outputDir")]
    pub output_dir: PathBuf,

    /// Delimited recipient list
    #[serde(rename = "inputPath")]
    pub input_path: PathBuf,

    /// Field delimiter of the recipient list
    pub delimiter: char,

    /// Log file truncated at the start of each run; `null` disables it
    #[serde(rename = "logFile")]
    pub log_file: Option<PathBuf>,

    /// Issuer text drawn on every certificate
    pub issuer: String,

    /// Template page the fields are drawn on (1-indexed)
    pub page: usize,

    pub styles: Styles,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("template.pdf"),
            output_dir: PathBuf::from("certificates"),
            input_path: PathBuf::from("recipients.csv"),
            delimiter: ',',
            log_file: Some(PathBuf::from("certificate_generation.log")),
            issuer: "Certification Committee".to_string(),
            page: 1,
            styles: Styles::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CertError::Config(e.to_string()))
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| CertError::io(path, e))?;
        serde_json::from_str(&json)
            .map_err(|e| CertError::Config(format!("{}: {e}", path.display())))
    }

    /// Check the configuration before any work starts
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(CertError::Config(format!(
                "delimiter must be a single ASCII character other than a quote or newline, got {:?}",
                self.delimiter
            )));
        }

        if self.page == 0 {
            return Err(CertError::Config("page numbers start at 1".to_string()));
        }

        self.styles.name.validate("styles.name")?;
        self.styles.date.validate("styles.date")?;
        self.styles.issuer.validate("styles.issuer")?;

        Ok(())
    }

    /// Delimiter as the byte the row parser expects
    ///
    /// Only meaningful after [`Config::validate`] succeeded.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}
