use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 0, g: 200, b: 150 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const TCP: Color = Color::Cyan;
pub const UDP: Color = Color::Magenta;
