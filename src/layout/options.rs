//! Render configuration.

use serde::{Deserialize, Serialize};

/// Output page size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFormat {
    /// Just the slip, 210 × 105 mm.
    #[default]
    Slip,
    /// A4 portrait with the slip at the bottom edge.
    A4,
}

/// How the receipt and payment part are separated from each other (and,
/// on an A4 page, from the invoice above).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorStyle {
    /// No lines; for pre-perforated paper.
    None,
    Solid,
    #[default]
    SolidWithScissors,
    Dashed,
    DashedWithScissors,
}

impl SeparatorStyle {
    pub fn has_line(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn is_dashed(&self) -> bool {
        matches!(self, Self::Dashed | Self::DashedWithScissors)
    }

    pub fn has_scissors(&self) -> bool {
        matches!(self, Self::SolidWithScissors | Self::DashedWithScissors)
    }
}

/// Sans-serif family the slip is set in. Text fitting always uses
/// Helvetica metrics; the permitted families are metric-compatible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    #[default]
    Helvetica,
    Arial,
    LiberationSans,
    Frutiger,
}

impl FontFamily {
    /// CSS `font-family` value.
    pub fn css_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica,Arial,sans-serif",
            Self::Arial => "Arial,Helvetica,sans-serif",
            Self::LiberationSans => "'Liberation Sans',Arial,sans-serif",
            Self::Frutiger => "Frutiger,Arial,sans-serif",
        }
    }
}

/// Configuration for slip rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub page_format: PageFormat,
    #[serde(default)]
    pub separator: SeparatorStyle,
    #[serde(default)]
    pub font_family: FontFamily,
}

/// Builder for [`RenderOptions`].
///
/// ```
/// use qrbill::layout::{PageFormat, RenderOptionsBuilder, SeparatorStyle};
///
/// let options = RenderOptionsBuilder::new()
///     .page_format(PageFormat::A4)
///     .separator(SeparatorStyle::Dashed)
///     .build();
/// assert_eq!(options.page_format, PageFormat::A4);
/// ```
#[derive(Debug, Default)]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn page_format(mut self, format: PageFormat) -> Self {
        self.options.page_format = format;
        self
    }

    /// Set the separator line style.
    pub fn separator(mut self, style: SeparatorStyle) -> Self {
        self.options.separator = style;
        self
    }

    /// Set the font family.
    pub fn font_family(mut self, family: FontFamily) -> Self {
        self.options.font_family = family;
        self
    }

    pub fn build(self) -> RenderOptions {
        self.options
    }
}
