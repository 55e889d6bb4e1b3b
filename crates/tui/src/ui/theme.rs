use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub border: Color,
    pub positive: Color,
    pub warning: Color,
    pub negative: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(80, 160, 160),
            border: Color::Rgb(60, 70, 80),
            positive: Color::Rgb(95, 175, 95),
            warning: Color::Rgb(210, 170, 80),
            negative: Color::Rgb(200, 110, 70),
            error: Color::Rgb(200, 80, 80),
        }
    }
}
