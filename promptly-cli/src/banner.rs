use promptly_core::session::TemplateInfo;

pub struct BannerInfo {
    pub version: String,
    pub provider: Option<String>,
    /// Shown when `provider` is `None`
    pub credential_env: String,
    pub mode: String,
    pub dark_mode: bool,
}

pub fn print_startup_banner(info: &BannerInfo) {
    let art = [
        r"    _____   ",
        r"   |     |  ",
        r"   | >_  |  ",
        r"   |_____|  ",
        r"     \ \    ",
        r"            ",
    ];

    let title = format!("\x1b[1;35mPromptly\x1b[0m v{}", info.version);

    let provider_line = match &info.provider {
        Some(p) => format!("\x1b[90mProvider:\x1b[0m \x1b[32m{p}\x1b[0m"),
        None => format!(
            "\x1b[90mProvider:\x1b[0m \x1b[33mno API key (set {})\x1b[0m",
            info.credential_env
        ),
    };
    let mode_line = format!("\x1b[90mMode:\x1b[0m     \x1b[36m{}\x1b[0m", info.mode);
    let theme_line = format!(
        "\x1b[90mTheme:\x1b[0m    {}",
        if info.dark_mode { "dark" } else { "light" }
    );

    let info_lines: [&str; 6] = [&title, "", &provider_line, &mode_line, &theme_line, ""];

    println!();
    for (art_line, info_line) in art.iter().zip(info_lines) {
        println!("\x1b[33m{art_line}\x1b[0m  {info_line}");
    }

    println!(
        "  \x1b[90m/help\x1b[0m commands  \x1b[90m/modes\x1b[0m modes  \x1b[90m/quit\x1b[0m exit"
    );
    println!();
}

pub fn format_template_list(templates: &[TemplateInfo], selected: &str) -> String {
    templates
        .iter()
        .map(|t| {
            let marker = if t.id == selected { "*" } else { " " };
            format!("{marker} {:<9} {:<10} {}", t.id, t.name, t.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
