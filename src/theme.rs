//! Terminal theme & spinner helpers for the plain line client.
//!
//! Respects the `NO_COLOR` env-var and the `--no-color` CLI flag.
//!
//! # Palette
//!
//! | Token          | Hex       | Usage                          |
//! |----------------|-----------|--------------------------------|
//! | accent         | `#3D8BFF` | headings, the prompt           |
//! | accent_bright  | `#6BA6FF` | emphasis, user echo            |
//! | info           | `#8FB8E8` | informational lines            |
//! | success        | `#2FBF71` | success states                 |
//! | warn           | `#FFB020` | warnings, status lines         |
//! | error          | `#E23D2D` | errors, failures               |
//! | muted          | `#8B8B8B` | de-emphasis, raw frame dumps   |

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

// ── Global color toggle ─────────────────────────────────────────────────────

static COLOR_DISABLED: AtomicBool = AtomicBool::new(false);

/// Call once at startup (after CLI parsing) to disable colour globally.
pub fn disable_color() {
    COLOR_DISABLED.store(true, Ordering::Relaxed);
    colored::control::set_override(false);
}

/// Initialise the colour system. Checks `NO_COLOR` and the optional
/// `--no-color` flag.
pub fn init_color(no_color_flag: bool) {
    if no_color_flag
        || std::env::var("NO_COLOR")
            .map(|v| !v.is_empty())
            .unwrap_or(false)
    {
        disable_color();
    }
}

fn is_color() -> bool {
    !COLOR_DISABLED.load(Ordering::Relaxed)
}

// ── Palette ─────────────────────────────────────────────────────────────────

pub mod palette {
    pub const ACCENT: (u8, u8, u8) = (0x3D, 0x8B, 0xFF);
    pub const ACCENT_BRIGHT: (u8, u8, u8) = (0x6B, 0xA6, 0xFF);
    pub const INFO: (u8, u8, u8) = (0x8F, 0xB8, 0xE8);
    pub const SUCCESS: (u8, u8, u8) = (0x2F, 0xBF, 0x71);
    pub const WARN: (u8, u8, u8) = (0xFF, 0xB0, 0x20);
    pub const ERROR: (u8, u8, u8) = (0xE2, 0x3D, 0x2D);
    pub const MUTED: (u8, u8, u8) = (0x8B, 0x8B, 0x8B);
}

// ── Themed formatting helpers ───────────────────────────────────────────────
//
// Each function returns a `String` so callers can `println!("{}", info("…"))`.

fn apply(text: &str, rgb: (u8, u8, u8)) -> String {
    if is_color() {
        text.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        text.to_string()
    }
}

fn apply_bold(text: &str, rgb: (u8, u8, u8)) -> String {
    if is_color() {
        text.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        text.to_string()
    }
}

/// Primary accent (the prompt, headings).
pub fn accent(text: &str) -> String {
    apply(text, palette::ACCENT)
}

/// Bright accent (user echo, emphasis).
pub fn accent_bright(text: &str) -> String {
    apply(text, palette::ACCENT_BRIGHT)
}

/// Informational lines.
pub fn info(text: &str) -> String {
    apply(text, palette::INFO)
}

/// Success state.
pub fn success(text: &str) -> String {
    apply(text, palette::SUCCESS)
}

/// Warning / attention.
pub fn warn(text: &str) -> String {
    apply(text, palette::WARN)
}

/// Error / failure.
pub fn error(text: &str) -> String {
    apply(text, palette::ERROR)
}

/// De-emphasis / metadata.
pub fn muted(text: &str) -> String {
    apply(text, palette::MUTED)
}

/// Bold heading in accent colour.
pub fn heading(text: &str) -> String {
    apply_bold(text, palette::ACCENT)
}

/// Dimmed text (terminal dim attribute).
pub fn dim(text: &str) -> String {
    if is_color() {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

// ── TUI palette ─────────────────────────────────────────────────────────────

/// The same palette as ratatui colours, plus surfaces used only by the TUI.
#[cfg(feature = "tui")]
pub mod tui_palette {
    use ratatui::style::Color;

    pub const ACCENT: Color = Color::Rgb(0x3D, 0x8B, 0xFF);
    pub const ACCENT_BRIGHT: Color = Color::Rgb(0x6B, 0xA6, 0xFF);
    pub const TEXT: Color = Color::Rgb(0xE6, 0xE6, 0xE6);
    pub const INFO: Color = Color::Rgb(0x8F, 0xB8, 0xE8);
    pub const SUCCESS: Color = Color::Rgb(0x2F, 0xBF, 0x71);
    pub const WARN: Color = Color::Rgb(0xFF, 0xB0, 0x20);
    pub const ERROR: Color = Color::Rgb(0xE2, 0x3D, 0x2D);
    pub const MUTED: Color = Color::Rgb(0x8B, 0x8B, 0x8B);

    /// Background for inline and fenced code.
    pub const SURFACE: Color = Color::Rgb(0x23, 0x28, 0x30);
    /// Subtle backgrounds for chat bubbles.
    pub const BG_USER: Color = Color::Rgb(0x1A, 0x22, 0x2E);
    pub const BG_ASSISTANT: Color = Color::Rgb(0x16, 0x1A, 0x20);
}

// ── Spinner ─────────────────────────────────────────────────────────────────

/// Braille spinner frames shared with the TUI loading line.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Start a steadily ticking spinner with the given message. The caller
/// clears it with `finish_and_clear` as soon as the first reply event
/// lands.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&SPINNER_FRAMES),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
