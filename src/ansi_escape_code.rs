use std::fmt;

use crate::color::Rgb;

macro_rules! ansi_escape_code {
    ($name:ident, $value:expr) => {
        pub struct $name;

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str($value)
            }
        }
    };
}

// Cursor Functions
ansi_escape_code!(SetCursorHome, "\x1B[H");
ansi_escape_code!(CursorVisible, "\x1B[?25h");
ansi_escape_code!(CursorInvisible, "\x1B[?25l");

// Erase Functions
ansi_escape_code!(EraseScreen, "\x1B[2J");

// Common Private Modes
ansi_escape_code!(EnableAltBuffer, "\x1B[?1049h");
ansi_escape_code!(DisableAltBuffer, "\x1B[?1049l");

// Graphics
ansi_escape_code!(Reset, "\x1B[0m");

/// 1-based row and column.
pub struct SetCursorPos(pub u16, pub u16);

impl fmt::Display for SetCursorPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1B[{};{}H", self.0, self.1)
    }
}

pub struct SetForeground(pub Rgb);

impl fmt::Display for SetForeground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1B[38;2;{};{};{}m", self.0.r, self.0.g, self.0.b)
    }
}

pub struct SetBackground(pub Rgb);

impl fmt::Display for SetBackground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1B[48;2;{};{};{}m", self.0.r, self.0.g, self.0.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_render() {
        assert_eq!(SetCursorHome.to_string(), "\x1B[H");
        assert_eq!(SetCursorPos(3, 7).to_string(), "\x1B[3;7H");
        assert_eq!(SetForeground(Rgb::new(1, 2, 3)).to_string(), "\x1B[38;2;1;2;3m");
        assert_eq!(SetBackground(Rgb::new(0, 0, 0)).to_string(), "\x1B[48;2;0;0;0m");
    }
}
