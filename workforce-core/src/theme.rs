//! Dashboard style tokens.
//!
//! The theme source returns a flat map of tokens. Any missing or empty
//! token falls back to the built-in palette; tab colors fall back to the
//! card and text colors first.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_BACKGROUND: &str = "#5b0d55";
pub const DEFAULT_PANEL_BACKGROUND: &str = "#7a1b73";
pub const DEFAULT_CARD_BACKGROUND: &str = "#6a1665";
pub const DEFAULT_BORDER: &str = "rgba(255,255,255,0.25)";
pub const DEFAULT_TEXT: &str = "#ffffff";
pub const DEFAULT_MUTED_TEXT: &str = "rgba(255,255,255,0.70)";
pub const DEFAULT_KPI_VALUE: &str = "#ffffff";
pub const DEFAULT_CHART_PALETTE: &str =
    "#1E90FF,#22C55E,#F59E0B,#EF4444,#A855F7,#06B6D4,#F97316,#84CC16";
pub const DEFAULT_CHART_HEIGHT: u32 = 260;
pub const DEFAULT_TAB_ACTIVE_BG: &str = "#1E90FF";
pub const DEFAULT_TAB_ACTIVE_TEXT: &str = "#ffffff";

/// Raw token map as delivered by the theme source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeTokens {
    pub page_background: Option<String>,
    pub panel_background: Option<String>,
    pub card_background: Option<String>,
    pub border_color: Option<String>,
    pub text_color: Option<String>,
    pub muted_text_color: Option<String>,
    pub kpi_value_color: Option<String>,
    pub chart_palette: Option<String>,
    pub chart_height: Option<serde_json::Value>,
    pub tab_bg_color: Option<String>,
    pub tab_text_color: Option<String>,
    pub tab_active_bg_color: Option<String>,
    pub tab_active_text_color: Option<String>,
}

fn token<'a>(value: &'a Option<String>) -> Option<&'a str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ThemeTokens {
    pub fn page_background(&self) -> &str {
        token(&self.page_background).unwrap_or(DEFAULT_PAGE_BACKGROUND)
    }

    pub fn panel_background(&self) -> &str {
        token(&self.panel_background).unwrap_or(DEFAULT_PANEL_BACKGROUND)
    }

    pub fn card_background(&self) -> &str {
        token(&self.card_background).unwrap_or(DEFAULT_CARD_BACKGROUND)
    }

    pub fn border_color(&self) -> &str {
        token(&self.border_color).unwrap_or(DEFAULT_BORDER)
    }

    pub fn text_color(&self) -> &str {
        token(&self.text_color).unwrap_or(DEFAULT_TEXT)
    }

    pub fn muted_text_color(&self) -> &str {
        token(&self.muted_text_color).unwrap_or(DEFAULT_MUTED_TEXT)
    }

    pub fn kpi_value_color(&self) -> &str {
        token(&self.kpi_value_color).unwrap_or(DEFAULT_KPI_VALUE)
    }

    pub fn tab_bg_color(&self) -> &str {
        token(&self.tab_bg_color)
            .or_else(|| token(&self.card_background))
            .unwrap_or(DEFAULT_CARD_BACKGROUND)
    }

    pub fn tab_text_color(&self) -> &str {
        token(&self.tab_text_color)
            .or_else(|| token(&self.text_color))
            .unwrap_or(DEFAULT_TEXT)
    }

    pub fn tab_active_bg_color(&self) -> &str {
        token(&self.tab_active_bg_color).unwrap_or(DEFAULT_TAB_ACTIVE_BG)
    }

    pub fn tab_active_text_color(&self) -> &str {
        token(&self.tab_active_text_color).unwrap_or(DEFAULT_TAB_ACTIVE_TEXT)
    }

    /// Chart series colors, in order. Never empty.
    pub fn palette(&self) -> Vec<String> {
        let parsed: Vec<String> = token(&self.chart_palette)
            .unwrap_or(DEFAULT_CHART_PALETTE)
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if parsed.is_empty() {
            DEFAULT_CHART_PALETTE.split(',').map(str::to_string).collect()
        } else {
            parsed
        }
    }

    /// Accepts a number or numeric string; anything else uses the default.
    pub fn chart_height(&self) -> u32 {
        match &self.chart_height {
            Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|h| u32::try_from(h).ok()),
            Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|h| *h > 0)
        .unwrap_or(DEFAULT_CHART_HEIGHT)
    }
}

/// A parsed CSS color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// Parse `#rgb`, `#rrggbb`, `rgb(r,g,b)` or `rgba(r,g,b,a)`.
    pub fn parse(css: &str) -> Option<Self> {
        let css = css.trim();
        if let Some(hex) = css.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        let inner = css
            .strip_prefix("rgba(")
            .or_else(|| css.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let channel = |i: usize| parts.get(i).and_then(|p| p.parse::<u8>().ok());
        let a = match parts.len() {
            3 => 1.0,
            4 => parts[3].parse::<f32>().ok()?.clamp(0.0, 1.0),
            _ => return None,
        };
        Some(Self {
            r: channel(0)?,
            g: channel(1)?,
            b: channel(2)?,
            a,
        })
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let byte = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
        Some(Self {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: 1.0,
        })
    }

    /// Composite over an opaque background.
    pub fn over(self, background: Rgba) -> (u8, u8, u8) {
        let mix = |fg: u8, bg: u8| -> u8 {
            (f32::from(fg) * self.a + f32::from(bg) * (1.0 - self.a)).round() as u8
        };
        (
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_map_uses_defaults() {
        let t = ThemeTokens::default();
        assert_eq!(t.page_background(), "#5b0d55");
        assert_eq!(t.tab_bg_color(), "#6a1665");
        assert_eq!(t.chart_height(), 260);
        assert_eq!(t.palette().len(), 8);
    }

    #[test]
    fn tab_colors_fall_back_to_card_and_text() {
        let t: ThemeTokens = serde_json::from_value(json!({
            "card_background": "#111111",
            "text_color": "#eeeeee",
            "tab_bg_color": ""
        }))
        .unwrap();
        assert_eq!(t.tab_bg_color(), "#111111");
        assert_eq!(t.tab_text_color(), "#eeeeee");
    }

    #[test]
    fn chart_height_accepts_strings() {
        let t: ThemeTokens = serde_json::from_value(json!({"chart_height": "320"})).unwrap();
        assert_eq!(t.chart_height(), 320);
        let t: ThemeTokens = serde_json::from_value(json!({"chart_height": "tall"})).unwrap();
        assert_eq!(t.chart_height(), 260);
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let t: ThemeTokens =
            serde_json::from_value(json!({"enable_custom_theme": 1, "text_color": "#000"})).unwrap();
        assert_eq!(t.text_color(), "#000");
    }

    #[test]
    fn parses_css_colors() {
        assert_eq!(
            Rgba::parse("#1E90FF"),
            Some(Rgba { r: 30, g: 144, b: 255, a: 1.0 })
        );
        assert_eq!(Rgba::parse("#fff").map(|c| c.r), Some(255));
        let c = Rgba::parse("rgba(255,255,255,0.25)").unwrap();
        assert_eq!(c.a, 0.25);
        assert!(Rgba::parse("blue").is_none());
    }

    #[test]
    fn alpha_composites_over_background() {
        let fg = Rgba::parse("rgba(255,255,255,0.5)").unwrap();
        let bg = Rgba::parse("#000000").unwrap();
        assert_eq!(fg.over(bg), (128, 128, 128));
    }
}
