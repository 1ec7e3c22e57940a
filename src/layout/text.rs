use crate::config::LayoutConfig;
use crate::text_metrics;

/// Cuts `text` to `max_chars` characters and appends an ellipsis when shortened.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut out: String = text.chars().take(max_chars).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}

/// Greedy word wrap: a word moves to a new line when appending it (plus the
/// trailing separator already on the line) would exceed `max_chars`. Single
/// words longer than the limit stay whole on their own line.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        if current.chars().count() + word.chars().count() > max_chars {
            if !current.trim().is_empty() {
                lines.push(current.trim().to_string());
            }
            current.clear();
        }
        current.push_str(word);
        current.push(' ');
    }
    if !current.trim().is_empty() {
        lines.push(current.trim().to_string());
    }
    lines
}

/// Background width for an edge label. Uses real glyph advances when a font
/// is available and the `chars × label_char_width` estimate otherwise.
pub fn label_background_width(
    text: &str,
    font_size: f32,
    font_family: &str,
    config: &LayoutConfig,
) -> f32 {
    let measured = if config.fast_text_metrics {
        None
    } else {
        text_metrics::measure_text_width(text, font_size, font_family)
    };
    let width = measured.unwrap_or_else(|| estimate_text_width(text, config));
    width + config.label_margin
}

pub fn estimate_text_width(text: &str, config: &LayoutConfig) -> f32 {
    text.chars().count() as f32 * config.label_char_width
}
