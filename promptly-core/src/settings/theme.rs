/// Reads the terminal's light/dark hint from `COLORFGBG` (set by rxvt,
/// Konsole, iTerm2 and others as `fg;bg` or `fg;default;bg`).
///
/// Background colours 0-6 and 8 are dark in the standard 16 colour
/// palette. Without a usable hint, dark is assumed.
pub fn ambient_dark_mode() -> bool {
    parse_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()).unwrap_or(true)
}

pub(crate) fn parse_colorfgbg(value: Option<&str>) -> Option<bool> {
    let background = value?.rsplit(';').next()?.trim();
    let index: u8 = background.parse().ok()?;
    Some(matches!(index, 0..=6 | 8))
}
