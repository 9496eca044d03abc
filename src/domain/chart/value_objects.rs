use std::fmt;

/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// CSS color string for the 2D canvas context
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            self.to_string()
        } else {
            let hex = self.to_hex();
            format!(
                "rgba({}, {}, {}, {:.3})",
                (hex >> 16) & 0xFF,
                (hex >> 8) & 0xFF,
                hex & 0xFF,
                self.a.clamp(0.0, 1.0)
            )
        }
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self { a: alpha, ..*self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

/// Fixed visual theme applied when a chart instance is created
#[derive(Debug, Clone, PartialEq)]
pub struct ChartTheme {
    pub background: Color,
    pub text: Color,
    pub grid: Color,
    pub border: Color,
    pub up: Color,
    pub down: Color,
    pub font: &'static str,
}

impl ChartTheme {
    pub fn dark() -> Self {
        Self {
            background: Color::from_hex(0x0f1419),
            text: Color::from_hex(0xd9d9d9),
            grid: Color::from_hex(0x1e2329),
            border: Color::from_hex(0x2b2b43),
            up: Color::from_hex(0x26a69a),
            down: Color::from_hex(0xef5350),
            font: "12px -apple-system, BlinkMacSystemFont, sans-serif",
        }
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Chart creation settings
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub height: u32,
    pub theme: ChartTheme,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { height: 500, theme: ChartTheme::dark() }
    }
}
