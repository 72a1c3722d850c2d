use ratatui::style::Color;

/// Colours for one theme. Widgets never hard-code colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub success: Color,
    pub error: Color,
    pub bar_background: Color,
}

impl Palette {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Reset,
            text: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            border: Color::DarkGray,
            success: Color::Green,
            error: Color::Red,
            bar_background: Color::Rgb(30, 30, 30),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 250),
            text: Color::Black,
            muted: Color::Gray,
            accent: Color::Blue,
            border: Color::Gray,
            success: Color::Rgb(0, 128, 0),
            error: Color::Rgb(180, 0, 0),
            bar_background: Color::Rgb(225, 225, 225),
        }
    }
}
