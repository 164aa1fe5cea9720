//! Color constants for the terminal user interface.

use ratatui::style::Color;

// Accent colors for the two input flows.
// The default chrome uses native colors.

/// Used for the add flow (entry boxes and status bar).
pub const GREEN: Color = Color::Rgb(40, 167, 69);
/// Used for the edit flow (edit box and status bar).
pub const BLUE: Color = Color::Rgb(0, 123, 255);
