//! Projections of a Sensu check status onto card presentation.

/// Check status as reported by Sensu. Any code outside 0..=2 is `Undefined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Resolved,
    Warning,
    Critical,
    Undefined(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Yellow,
    Red,
}

impl From<u32> for Status {
    fn from(code: u32) -> Self {
        match code {
            0 => Status::Resolved,
            1 => Status::Warning,
            2 => Status::Critical,
            other => Status::Undefined(other),
        }
    }
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Resolved => "Resolved",
            Status::Warning => "Warning",
            Status::Critical => "Critical",
            Status::Undefined(_) => "Undefined",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Status::Resolved => Color::Green,
            Status::Warning => Color::Yellow,
            Status::Critical => Color::Red,
            Status::Undefined(_) => Color::Yellow,
        }
    }

    pub fn icon(self) -> char {
        match self {
            Status::Resolved => '\u{2705}',
            Status::Warning => '\u{26A0}',
            Status::Critical => '\u{274C}',
            Status::Undefined(_) => '\u{26A0}',
        }
    }

    /// Colored circle used where a plain icon would not carry the color.
    pub fn marker(self) -> char {
        self.color().marker()
    }
}

impl Color {
    /// `themeColor` value for connector cards.
    pub fn hex(self) -> &'static str {
        match self {
            Color::Green => "2EB886",
            Color::Yellow => "DAA038",
            Color::Red => "A30200",
        }
    }

    pub fn marker(self) -> char {
        match self {
            Color::Green => '\u{1F7E2}',
            Color::Yellow => '\u{1F7E1}',
            Color::Red => '\u{1F534}',
        }
    }
}
