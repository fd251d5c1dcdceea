use yansi::Paint;

/// Color palette for consistent theming
pub struct ColorPalette {
    pub muted: (u8, u8, u8),   // paths, verbose listings
    pub heading: (u8, u8, u8), // banners, section markers
    pub ok: (u8, u8, u8),      // resolved counts
    pub alert: (u8, u8, u8),   // warnings, cancellations
}

impl ColorPalette {
    pub const CATPPUCCIN: Self = Self {
        muted: (108, 112, 134),   // Gray
        heading: (148, 226, 213), // Teal
        ok: (166, 227, 161),      // Green
        alert: (243, 139, 168),   // Pink
    };
}

/// Formatting context shared by the command outputs
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            palette: ColorPalette::CATPPUCCIN,
        }
    }

    pub fn from_env() -> Self {
        let use_color = std::env::var("NO_COLOR").is_err();
        Self::new(use_color)
    }

    fn paint(&self, text: &str, rgb: (u8, u8, u8), bold: bool) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let (r, g, b) = rgb;
        let painted = Paint::rgb(text, r, g, b);
        if bold { painted.bold().to_string() } else { painted.to_string() }
    }

    pub fn format_header(&self, text: &str) -> String {
        self.paint(text, self.palette.heading, true)
    }

    pub fn format_path(&self, text: &str) -> String {
        self.paint(text, self.palette.muted, false)
    }

    pub fn format_ok(&self, text: &str) -> String {
        self.paint(text, self.palette.ok, true)
    }

    pub fn format_alert(&self, text: &str) -> String {
        self.paint(text, self.palette.alert, true)
    }

    /// Selector banner: a title underlined with `=`.
    pub fn banner(&self, title: &str) -> String {
        format!(
            "{}\n{}\n",
            self.format_header(title),
            "=".repeat(title.chars().count().max(43))
        )
    }
}
