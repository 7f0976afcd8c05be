//! HTML receipt rendering.
//!
//! The receipt is a self-contained HTML document shown by the web frontend
//! once it arrives on the visualization topic. It depends only on the order
//! data and the time it was issued.

use barista_types::{CupSize, Order};
use chrono::{DateTime, Local};
use std::fmt::Write;

const SHOP_NAME: &str = "Murf Coffee Shop";

const DEFAULT_DRINK_COLOR: &str = "#c49a6c";

/// Cup height and width in pixels.
fn cup_dimensions(size: Option<CupSize>) -> (u32, u32) {
    match size.unwrap_or(CupSize::Medium) {
        CupSize::Small => (180, 110),
        CupSize::Medium => (220, 130),
        CupSize::Large => (260, 150),
    }
}

fn drink_color(drink_type: Option<&str>) -> &'static str {
    match drink_type.unwrap_or("latte") {
        "latte" => "#c49a6c",
        "cappuccino" => "#b88a5e",
        "espresso" => "#3e2723",
        "americano" => "#5d4037",
        "mocha" => "#6d4c41",
        "flat white" => "#d4a574",
        _ => DEFAULT_DRINK_COLOR,
    }
}

fn has_whipped_cream(extras: &[String]) -> bool {
    extras
        .iter()
        .any(|extra| extra.contains("whipped") || extra.contains("cream"))
}

/// Returns the receipt order number: the trailing six digits of the
/// `YYYYMMDDHHMMSS` timestamp.
pub fn order_number(issued_at: DateTime<Local>) -> String {
    let stamp = issued_at.format("%Y%m%d%H%M%S").to_string();
    stamp[stamp.len() - 6..].to_string()
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Capitalizes the first letter of every word and lowercases the rest.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn display_field(value: Option<&str>) -> String {
    escape_html(&value.map(title_case).unwrap_or_else(|| "N/A".to_string()))
}

fn detail_row(out: &mut String, label: &str, value: &str, accent: &str) {
    let _ = write!(
        out,
        r#"<div style="display: flex; justify-content: space-between; margin: 12px 0; padding: 12px; background: #fafafa; border-radius: 10px; border-left: 4px solid {accent};"><strong style="color: #555;">{label}</strong><span style="color: #222; font-weight: 600;">{value}</span></div>"#
    );
}

/// Renders the receipt for `order` as issued at `issued_at`.
pub fn render_receipt(order: &Order, issued_at: DateTime<Local>) -> String {
    let (height, width) = cup_dimensions(order.size());
    let color = drink_color(order.drink_type());

    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(
        "<style>@keyframes slideIn { from { opacity: 0; transform: translateY(20px); } \
         to { opacity: 1; transform: translateY(0); } } \
         .coffee-container { animation: slideIn 0.6s ease-out; }</style>\n",
    );
    html.push_str("</head>\n<body style=\"margin: 0; padding: 0;\">\n");
    html.push_str(
        "<div class=\"coffee-container\" style=\"display: flex; flex-direction: column; \
         align-items: center; padding: 30px; background: linear-gradient(135deg, #667eea 0%, \
         #764ba2 100%); border-radius: 20px; font-family: 'Segoe UI', sans-serif;\">\n",
    );
    html.push_str("<h2 style=\"color: white;\">Your Perfect Coffee</h2>\n");

    // Cup, optional topping, handle and saucer.
    let _ = writeln!(
        html,
        r#"<div class="cup" style="position: relative; width: {width}px; height: {height}px; background: linear-gradient(165deg, {color} 0%, {color}dd 100%); border-radius: 8px 8px 35px 35px; border: 3px solid rgba(139,111,71,0.8);">"#
    );
    html.push_str(
        "<div style=\"position: absolute; top: 0; left: 0; right: 0; height: 22%; \
         background: linear-gradient(180deg, rgba(255,248,240,0.95) 0%, transparent 100%); \
         border-radius: 8px 8px 50% 50%;\"></div>\n",
    );
    if has_whipped_cream(order.extras()) {
        let _ = writeln!(
            html,
            r#"<div class="whipped-cream" style="position: absolute; top: -22px; left: 50%; transform: translateX(-50%); width: {}px; height: 35px; background: linear-gradient(180deg, #ffffff 0%, #f5f0e8 100%); border-radius: 50%;"></div>"#,
            width.saturating_sub(10)
        );
    }
    html.push_str(
        "<div style=\"position: absolute; right: -38px; top: 30%; width: 45px; height: 42%; \
         border: 4px solid rgba(139,111,71,0.9); border-left: none; \
         border-radius: 0 45% 45% 0;\"></div>\n</div>\n",
    );
    let _ = writeln!(
        html,
        r#"<div class="saucer" style="width: {}px; height: 16px; background: #8b6f47; border-radius: 50%; margin: 6px 0 35px;"></div>"#,
        width + 50
    );

    // Order details.
    html.push_str(
        "<div style=\"background: white; padding: 25px; border-radius: 18px; width: 100%; \
         max-width: 450px;\">\n<h3 style=\"margin-top: 0; color: #4a2c2a;\">Order Summary</h3>\n",
    );
    detail_row(&mut html, "Customer:", &escape_html(order.name().unwrap_or("N/A")), "#667eea");
    detail_row(&mut html, "Drink:", &display_field(order.drink_type()), "#d4a574");
    detail_row(
        &mut html,
        "Size:",
        &display_field(order.size().map(CupSize::as_str)),
        "#52c41a",
    );
    detail_row(&mut html, "Milk:", &display_field(order.milk()), "#faad14");

    if order.extras().is_empty() {
        html.push_str(
            "<div class=\"extras\" style=\"margin: 12px 0; padding: 12px;\"><strong>Extras:</strong> \
             <span style=\"color: #999; font-style: italic;\">None</span></div>\n",
        );
    } else {
        html.push_str(
            "<div class=\"extras\" style=\"margin: 12px 0; padding: 12px;\"><strong>Extras:</strong>\n<ul>\n",
        );
        for extra in order.extras() {
            let _ = writeln!(html, "<li>{}</li>", escape_html(&title_case(extra)));
        }
        html.push_str("</ul>\n</div>\n");
    }

    let _ = writeln!(
        html,
        r#"<div style="margin-top: 25px; padding-top: 20px; border-top: 2px dashed #ddd; text-align: center;"><p class="order-number" style="color: #667eea; font-weight: bold; font-size: 22px;">Order #{}</p><p style="color: #999; font-size: 14px;">{}</p></div>"#,
        order_number(issued_at),
        issued_at.format("%B %d, %Y at %I:%M %p")
    );
    html.push_str("</div>\n");
    let _ = writeln!(
        html,
        r#"<p style="color: white; margin-top: 25px;">Thank you for ordering from {SHOP_NAME}!</p>"#
    );
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issued_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 11, 4, 14, 7, 9).unwrap()
    }

    fn order_with(size: Option<CupSize>, drink: &str, extras: &[&str]) -> Order {
        let mut order = Order::new();
        order.set_drink_type(drink);
        if let Some(size) = size {
            order.set_size(size);
        }
        order.set_milk("oat milk");
        order.set_name("Jamie");
        for extra in extras {
            order.add_extra(extra);
        }
        order
    }

    #[test]
    fn order_number_is_trailing_six_digits() {
        assert_eq!(order_number(issued_at()), "140709");
    }

    #[test]
    fn cup_is_sized_by_order_size() {
        let small = render_receipt(&order_with(Some(CupSize::Small), "latte", &[]), issued_at());
        let large = render_receipt(&order_with(Some(CupSize::Large), "latte", &[]), issued_at());
        let unset = render_receipt(&order_with(None, "latte", &[]), issued_at());

        assert!(small.contains("width: 110px; height: 180px"));
        assert!(large.contains("width: 150px; height: 260px"));
        assert!(unset.contains("width: 130px; height: 220px"));
    }

    #[test]
    fn drink_color_follows_drink_type() {
        let espresso = render_receipt(&order_with(None, "Espresso", &[]), issued_at());
        let unknown = render_receipt(&order_with(None, "chai", &[]), issued_at());

        assert!(espresso.contains("#3e2723"));
        assert!(unknown.contains(DEFAULT_DRINK_COLOR));
    }

    #[test]
    fn extras_render_as_list_or_none() {
        let with_extras = render_receipt(
            &order_with(Some(CupSize::Medium), "latte", &["vanilla syrup", "extra shot"]),
            issued_at(),
        );
        assert!(with_extras.contains("<li>Vanilla Syrup</li>\n<li>Extra Shot</li>"));

        let without = render_receipt(&order_with(Some(CupSize::Medium), "latte", &[]), issued_at());
        assert!(!without.contains("<ul>"));
        assert!(without.contains("font-style: italic;\">None</span>"));
    }

    #[test]
    fn whipped_cream_topping_only_when_requested() {
        let plain = render_receipt(&order_with(None, "mocha", &["extra shot"]), issued_at());
        let topped = render_receipt(&order_with(None, "mocha", &["whipped cream"]), issued_at());

        assert!(!plain.contains("whipped-cream"));
        assert!(topped.contains("class=\"whipped-cream\""));
    }

    #[test]
    fn receipt_shows_order_details_and_date() {
        let html = render_receipt(
            &order_with(Some(CupSize::Medium), "flat white", &[]),
            issued_at(),
        );

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(">Jamie</span>"));
        assert!(html.contains(">Flat White</span>"));
        assert!(html.contains(">Medium</span>"));
        assert!(html.contains(">Oat Milk</span>"));
        assert!(html.contains("Order #140709"));
        assert!(html.contains("November 04, 2025 at 02:07 PM"));
        assert!(html.contains(SHOP_NAME));
    }

    #[test]
    fn missing_fields_render_as_not_available() {
        let html = render_receipt(&Order::new(), issued_at());
        assert!(html.contains(">N/A</span>"));
    }

    #[test]
    fn customer_text_is_escaped() {
        let mut order = order_with(None, "latte", &["<b>cream</b>"]);
        order.set_name("<script>alert(1)</script>");
        let html = render_receipt(&order, issued_at());

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;B&gt;Cream&lt;/B&gt;"));
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("oat milk"), "Oat Milk");
        assert_eq!(title_case("EXTRA shot"), "Extra Shot");
        assert_eq!(title_case("half-caf"), "Half-Caf");
    }
}
