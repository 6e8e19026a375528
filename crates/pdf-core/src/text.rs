//! Text rendering utilities

use crate::document::Color;
use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Generate PDF operators for text insertion
///
/// Emits one `BT ... ET` block drawing `text_hex` (already a `<...>` hex
/// string) with its baseline at `y`. `x` is interpreted according to `align`.
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let x = match align {
        Align::Left => x,
        Align::Center => x - ctx.text_width / 2.0,
        Align::Right => x - ctx.text_width,
    };
    let Color { r, g, b } = ctx.color;

    // Fill color, font, position, show
    format!(
        "BT\n{r} {g} {b} rg\n/{} {} Tf\n{x} {y} Td\n{text_hex} Tj\nET\n",
        ctx.font_name, ctx.font_size
    )
    .into_bytes()
}

/// Encode text as a WinAnsiEncoding hex string (e.g., "<4A6F>")
///
/// Characters that have no WinAnsi code point are replaced with `?`.
pub fn encode_win_ansi_hex(text: &str) -> String {
    let mut hex = String::with_capacity(text.len() * 2 + 2);
    hex.push('<');
    for c in text.chars() {
        hex.push_str(&format!("{:02X}", win_ansi_code(c)));
    }
    hex.push('>');
    hex
}

/// WinAnsiEncoding code for a character
fn win_ansi_code(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}
