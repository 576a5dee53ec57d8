//! Visual tokens shared with the host's style sheet.
//!
//! Effects never pick concrete colors on their own. They refer to a
//! [`ColorRole`] and the host resolves it through a [`Theme`], either by role
//! or by CSS-style token name (`--primary`, `--success`, ...).

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// Named color roles defined by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Primary,
    Secondary,
    Success,
    Error,
    Warning,
}

impl ColorRole {
    pub const ALL: [ColorRole; 5] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Success,
        ColorRole::Error,
        ColorRole::Warning,
    ];

    /// The style-sheet token this role is published under.
    pub fn token(self) -> &'static str {
        match self {
            ColorRole::Primary => "--primary",
            ColorRole::Secondary => "--secondary",
            ColorRole::Success => "--success",
            ColorRole::Error => "--error",
            ColorRole::Warning => "--warning",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.token() == token)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    /// Family name behind the `--font-heading` token.
    pub heading_font: String,
}

impl Theme {
    pub fn color(&self, role: ColorRole) -> Color {
        match role {
            ColorRole::Primary => self.primary,
            ColorRole::Secondary => self.secondary,
            ColorRole::Success => self.success,
            ColorRole::Error => self.error,
            ColorRole::Warning => self.warning,
        }
    }

    /// Resolve a color token. Unknown tokens resolve to `None`, and callers
    /// simply skip the styling.
    pub fn resolve(&self, token: &str) -> Option<Color> {
        ColorRole::from_token(token).map(|role| self.color(role))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::from_hex(0x0066CC),
            secondary: Color::from_hex(0x00A86B),
            success: Color::from_hex(0x28A745),
            error: Color::from_hex(0xDC3545),
            warning: Color::from_hex(0xFFC107),
            heading_font: "Poppins".to_string(),
        }
    }
}
