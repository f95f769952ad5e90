//! Cart entry formatting for the cart view (HTML) and the order message (text)

use std::fmt::Write;

use cart_shared::constants::{CURRENCY_SYMBOL, GREENS_PREFIX, OPTIONS_SEPARATOR, SAUCES_PREFIX};

use crate::domain::{CartEntry, LineAddon};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionSegment<'a> {
    Greens(&'a str),
    Sauces(&'a str),
}

/// Recognized `Key: value` pieces of an options string; anything else is ignored.
fn decode_options(options: &str) -> Vec<OptionSegment<'_>> {
    options
        .split(OPTIONS_SEPARATOR)
        .map(str::trim)
        .filter_map(|piece| {
            if let Some(value) = piece.strip_prefix(GREENS_PREFIX) {
                Some(OptionSegment::Greens(value.trim()))
            } else {
                piece
                    .strip_prefix(SAUCES_PREFIX)
                    .map(|value| OptionSegment::Sauces(value.trim()))
            }
        })
        .filter(|segment| match segment {
            OptionSegment::Greens(v) | OptionSegment::Sauces(v) => !v.is_empty(),
        })
        .collect()
}

/// Build the options string stored on a cart entry.
pub fn encode_options(greens: Option<&str>, sauce: Option<&str>) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(greens) = greens.map(str::trim).filter(|g| !g.is_empty()) {
        parts.push(format!("{} {}", GREENS_PREFIX, greens));
    }
    if let Some(sauce) = sauce.map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(format!("{} {}", SAUCES_PREFIX, sauce));
    }
    parts.join(OPTIONS_SEPARATOR)
}

pub fn strip_angle_brackets(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

/// Remove characters the messaging app treats as markup.
pub fn strip_message_markup(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '*' | '_' | '~' | '`'))
        .collect()
}

pub fn format_price(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}

fn visible_addons(addons: &[LineAddon]) -> impl Iterator<Item = &LineAddon> + '_ {
    addons.iter().filter(|a| a.quantity > 0)
}

fn push_html_group(html: &mut String, class: &str, label: &str, addons: &[LineAddon]) {
    let mut items = visible_addons(addons).peekable();
    if items.peek().is_none() {
        return;
    }
    let _ = write!(
        html,
        "<div class=\"option-group {}\"><span class=\"option-label\">{}</span>",
        class, label
    );
    for addon in items {
        let _ = write!(
            html,
            "<div class=\"option-item\">{} × {}</div>",
            strip_angle_brackets(&addon.name),
            addon.quantity
        );
    }
    html.push_str("</div>");
}

/// HTML block describing an entry's greens, sauces, extras and drinks.
/// Empty when the entry has none of them.
pub fn format_options_html(entry: &CartEntry) -> String {
    let mut html = String::new();

    for segment in decode_options(&entry.options) {
        let (class, label, value) = match segment {
            OptionSegment::Greens(v) => ("greens", "🥬 Greens:", v),
            OptionSegment::Sauces(v) => ("sauces", "🌶️ Sauces:", v),
        };
        let _ = write!(
            html,
            "<div class=\"option-line {}\"><span class=\"option-label\">{}</span> {}</div>",
            class,
            label,
            strip_angle_brackets(value)
        );
    }

    push_html_group(&mut html, "extras", "➕ Extras:", &entry.extras);
    push_html_group(&mut html, "drinks", "🥤 Drinks:", &entry.drinks);

    if html.is_empty() {
        return html;
    }
    format!("<div class=\"item-options\">{}</div>", html)
}

fn push_text_group(lines: &mut Vec<String>, label: &str, addons: &[LineAddon]) {
    let mut items = visible_addons(addons).peekable();
    if items.peek().is_none() {
        return;
    }
    lines.push(format!("   {}", label));
    for addon in items {
        lines.push(format!(
            "      • {} × {}",
            strip_message_markup(&addon.name),
            addon.quantity
        ));
    }
}

/// Plain-text lines for the order message, one customization per line.
pub fn format_options_text(entry: &CartEntry) -> String {
    let mut lines = Vec::new();

    for segment in decode_options(&entry.options) {
        match segment {
            OptionSegment::Greens(v) => {
                lines.push(format!("   🥬 Greens: {}", strip_message_markup(v)))
            }
            OptionSegment::Sauces(v) => {
                lines.push(format!("   🌶️ Sauces: {}", strip_message_markup(v)))
            }
        }
    }

    push_text_group(&mut lines, "➕ Extras:", &entry.extras);
    push_text_group(&mut lines, "🥤 Drinks:", &entry.drinks);

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(options: &str, extras: Vec<LineAddon>, drinks: Vec<LineAddon>) -> CartEntry {
        CartEntry {
            id: "e1".to_string(),
            product_id: "burger".to_string(),
            name: "Burger".to_string(),
            base_price: 85.0,
            base_product_price: 85.0,
            quantity: 1,
            options: options.to_string(),
            extras,
            drinks,
            image: String::new(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_encode_options() {
        assert_eq!(encode_options(None, None), "");
        assert_eq!(encode_options(Some("Lettuce"), None), "Greens: Lettuce");
        assert_eq!(
            encode_options(Some("Lettuce"), Some("Peri-Peri")),
            "Greens: Lettuce | Sauces: Peri-Peri"
        );
        assert_eq!(encode_options(Some("  "), Some("BBQ")), "Sauces: BBQ");
    }

    #[test]
    fn test_empty_entry_formats_to_empty() {
        let e = entry("", vec![], vec![]);
        assert_eq!(format_options_html(&e), "");
        assert_eq!(format_options_text(&e), "");
    }

    #[test]
    fn test_unrecognized_segments_ignored() {
        let e = entry("Size: Large | Sauces: BBQ", vec![], vec![]);
        let text = format_options_text(&e);
        assert_eq!(text, "   🌶️ Sauces: BBQ");
        assert!(!format_options_html(&e).contains("Large"));
    }

    #[test]
    fn test_text_lists_addons_and_strips_markup() {
        let e = entry(
            "Greens: *Lettuce*",
            vec![LineAddon::new("Extra_Cheese", 10.0, 2)],
            vec![LineAddon::new("`Coke`", 18.0, 1)],
        );
        let text = format_options_text(&e);
        assert_eq!(
            text,
            "   🥬 Greens: Lettuce\n   ➕ Extras:\n      • ExtraCheese × 2\n   🥤 Drinks:\n      • Coke × 1"
        );
    }

    #[test]
    fn test_html_sanitizes_names() {
        let e = entry("", vec![LineAddon::new("<b>Bacon</b>", 15.0, 1)], vec![]);
        let html = format_options_html(&e);
        assert!(html.starts_with("<div class=\"item-options\">"));
        assert!(html.contains("<div class=\"option-item\">bBacon/b × 1</div>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_html_decodes_greens_and_sauces() {
        let e = entry("Greens: Lettuce | Sauces: <i>BBQ</i>", vec![], vec![]);
        let html = format_options_html(&e);
        assert_eq!(
            html,
            "<div class=\"item-options\">\
             <div class=\"option-line greens\"><span class=\"option-label\">🥬 Greens:</span> Lettuce</div>\
             <div class=\"option-line sauces\"><span class=\"option-label\">🌶️ Sauces:</span> iBBQ/i</div>\
             </div>"
        );
        assert!(!html.contains("<i>"));
    }

    #[test]
    fn test_zero_quantity_addons_skipped() {
        let e = entry("", vec![LineAddon::new("Cheese", 10.0, 0)], vec![]);
        assert_eq!(format_options_html(&e), "");
        assert_eq!(format_options_text(&e), "");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(170.0), "R170.00");
        assert_eq!(format_price(0.1 + 0.2), "R0.30");
    }
}
