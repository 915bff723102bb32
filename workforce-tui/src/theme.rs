//! Terminal palette derived from the dashboard theme tokens.
//!
//! Tokens are CSS colors. Translucent ones are composited over the page
//! background so every terminal color is opaque. The RAG colors are fixed
//! and do not follow the tokens.

use ratatui::style::{Color, Modifier, Style};

use workforce_core::payload::RagStatus;
use workforce_core::theme::{Rgba, DEFAULT_PAGE_BACKGROUND};
use workforce_core::ThemeTokens;

const GREEN: Color = Color::Rgb(0, 200, 83);
const AMBER: Color = Color::Rgb(255, 171, 0);
const RED: Color = Color::Rgb(255, 82, 82);

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub panel: Color,
    pub card: Color,
    pub border: Color,
    pub text: Color,
    pub muted: Color,
    pub kpi: Color,
    pub tab_bg: Color,
    pub tab_text: Color,
    pub tab_active_bg: Color,
    pub tab_active_text: Color,
    pub series: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_tokens(&ThemeTokens::default())
    }
}

impl Palette {
    pub fn from_tokens(tokens: &ThemeTokens) -> Self {
        let base = Rgba::parse(tokens.page_background())
            .or_else(|| Rgba::parse(DEFAULT_PAGE_BACKGROUND))
            .unwrap_or(Rgba {
                r: 0,
                g: 0,
                b: 0,
                a: 1.0,
            });
        let color = |css: &str| match Rgba::parse(css) {
            Some(c) => {
                let (r, g, b) = c.over(base);
                Color::Rgb(r, g, b)
            }
            None => Color::Reset,
        };
        Self {
            background: color(tokens.page_background()),
            panel: color(tokens.panel_background()),
            card: color(tokens.card_background()),
            border: color(tokens.border_color()),
            text: color(tokens.text_color()),
            muted: color(tokens.muted_text_color()),
            kpi: color(tokens.kpi_value_color()),
            tab_bg: color(tokens.tab_bg_color()),
            tab_text: color(tokens.tab_text_color()),
            tab_active_bg: color(tokens.tab_active_bg_color()),
            tab_active_text: color(tokens.tab_active_text_color()),
            series: tokens.palette().iter().map(|c| color(c)).collect(),
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.tab_active_bg)
    }

    pub fn accent_bold(&self) -> Style {
        self.accent().add_modifier(Modifier::BOLD)
    }

    pub fn kpi(&self) -> Style {
        Style::default().fg(self.kpi).add_modifier(Modifier::BOLD)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(AMBER)
    }

    pub fn negative(&self) -> Style {
        Style::default().fg(RED)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.tab_active_text)
            .bg(self.tab_active_bg)
    }

    pub fn panel_border(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.tab_active_bg)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn panel_title(&self, active: bool) -> Style {
        if active {
            self.accent_bold()
        } else {
            self.muted()
        }
    }

    pub fn tab(&self, active: bool) -> Style {
        if active {
            Style::default()
                .fg(self.tab_active_text)
                .bg(self.tab_active_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.tab_text).bg(self.tab_bg)
        }
    }

    /// Color of the `n`th chart series, cycling through the palette.
    pub fn series(&self, n: usize) -> Color {
        if self.series.is_empty() {
            self.text
        } else {
            self.series[n % self.series.len()]
        }
    }

    pub fn rag(&self, status: RagStatus) -> Style {
        match status {
            RagStatus::Green => Style::default().fg(GREEN),
            RagStatus::Amber => Style::default().fg(AMBER),
            RagStatus::Red => Style::default().fg(RED),
            RagStatus::Unknown => self.muted(),
        }
    }

    /// Style for a signed variance figure.
    pub fn variance(&self, variance: Option<f64>) -> Style {
        self.rag(RagStatus::from_variance(variance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tokens_give_opaque_colors() {
        let p = Palette::default();
        assert_eq!(p.background, Color::Rgb(0x5b, 0x0d, 0x55));
        assert_eq!(p.text, Color::Rgb(255, 255, 255));
        assert_eq!(p.tab_active_bg, Color::Rgb(0x1e, 0x90, 0xff));
        assert_eq!(p.series.len(), 8);
    }

    #[test]
    fn translucent_tokens_blend_over_background() {
        let p = Palette::default();
        // rgba(255,255,255,0.70) over #5b0d55
        let Color::Rgb(r, g, b) = p.muted else {
            panic!("expected rgb, got {:?}", p.muted);
        };
        assert!(r > 0x5b && r < 255);
        assert!(g > 0x0d && g < 255);
        assert!(b > 0x55 && b < 255);
    }

    #[test]
    fn unparseable_token_resets() {
        let tokens = ThemeTokens {
            text_color: Some("var(--text)".into()),
            ..ThemeTokens::default()
        };
        assert_eq!(Palette::from_tokens(&tokens).text, Color::Reset);
    }

    #[test]
    fn rag_colors() {
        let p = Palette::default();
        assert_eq!(p.variance(Some(1.0)).fg, Some(GREEN));
        assert_eq!(p.variance(Some(-1.0)).fg, Some(AMBER));
        assert_eq!(p.variance(Some(-5.0)).fg, Some(RED));
        assert_eq!(p.variance(None), p.muted());
    }

    #[test]
    fn series_cycles() {
        let p = Palette::default();
        assert_eq!(p.series(0), p.series(p.series.len()));
    }
}
