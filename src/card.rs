use chrono::NaiveDate;

use crate::icons;
use crate::locale;
use crate::stats::Stats;
use crate::theme::CardTheme;
use crate::wrap::split_lines;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

// Fixed card geometry. Three 165px columns inside a 495x195 frame; every
// column centers its text at local x 81.5 under its translate group.
const CARD_WIDTH: u32 = 495;
const CARD_HEIGHT: u32 = 195;
const COLUMN_LEFT_X: u32 = 1;
const COLUMN_CENTER_X: u32 = 166;
const COLUMN_RIGHT_X: u32 = 331;

// Character budgets and first-line offsets for wrapped slots.
const LABEL_MAX_CHARS: usize = 24;
const LABEL_LINE_OFFSET: i32 = -9;
const RANGE_MAX_CHARS: usize = 28;
const RANGE_LINE_OFFSET: i32 = 0;
const MESSAGE_MAX_CHARS: usize = 34;

/// A finished vector document and the content type it should be served as.
#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub body: String,
    pub content_type: &'static str,
}

impl RenderedCard {
    fn svg(body: String) -> Self {
        Self {
            body,
            content_type: SVG_CONTENT_TYPE,
        }
    }
}

/// Render the stats card.
///
/// `today` drives the current-year rule of the date formatter; it is the
/// same injected date the streak computation ran against. Rendering never
/// fails: garbage color values are emitted as authored.
pub fn generate_card(stats: &Stats, theme: &CardTheme, today: NaiveDate) -> RenderedCard {
    let locale = locale::lookup(&theme.locale);
    let pattern = theme.date_format.as_deref();

    let total_range = format!(
        "{} {} {}",
        locale::format_date(stats.first_contribution, today, locale, pattern),
        locale.separator,
        locale.present,
    );
    let current_range = locale::format_range(
        stats.current_streak.start,
        stats.current_streak.end,
        today,
        locale,
        pattern,
    );
    let longest_range = locale::format_range(
        stats.longest_streak.start,
        stats.longest_streak.end,
        today,
        locale,
        pattern,
    );

    let left = side_column(
        COLUMN_LEFT_X,
        &stats.total_contributions.to_string(),
        locale.total_contributions,
        &total_range,
        theme,
        ["0.6", "0.7", "0.8"],
    );
    let right = side_column(
        COLUMN_RIGHT_X,
        &stats.longest_streak.length.to_string(),
        locale.longest_streak,
        &longest_range,
        theme,
        ["0.8", "0.9", "1.0"],
    );
    let center = center_column(
        &stats.current_streak.length.to_string(),
        locale.current_streak,
        &current_range,
        theme,
    );

    let body = format!(
        "{header}\
         {rules}\
         {left}{center}{right}\
         </g>\n</svg>\n",
        header = frame(theme),
        rules = column_rules(theme),
        left = left,
        center = center,
        right = right,
    );
    RenderedCard::svg(body)
}

/// Render the error card: same frame, one centered message slot.
pub fn generate_error_card(message: &str, theme: &CardTheme) -> RenderedCard {
    let message = split_lines(&escape_xml(message), MESSAGE_MAX_CHARS, RANGE_LINE_OFFSET);
    let body = format!(
        "{header}\
         <g style='isolation: isolate'>\n\
         <g transform='translate({center}, 90)'>\n\
         <text x='81.5' y='8' stroke-width='0' text-anchor='middle' fill='#{fill}' \
         stroke='none' font-family='\"Segoe UI\", Ubuntu, sans-serif' font-weight='400' \
         font-size='14px' font-style='normal'>{message}</text>\n\
         </g>\n</g>\n\
         </g>\n</svg>\n",
        header = frame(theme),
        center = COLUMN_CENTER_X,
        fill = theme.side_labels,
        message = message,
    );
    RenderedCard::svg(body)
}

/// Opening tag, styles, clip path, and the frame rectangle. Every card
/// starts with this and closes the outer clip group itself.
fn frame(theme: &CardTheme) -> String {
    let border_opacity = if theme.hide_border { "0" } else { "1" };
    format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}' viewBox='0 0 {w} {h}'>\n\
         <style>{style}</style>\n\
         <defs>\n\
         <clipPath id='outer_rectangle'>\n\
         <rect width='{w}' height='{h}' rx='{radius}'/>\n\
         </clipPath>\n\
         <mask id='ring_gap'>\n\
         <rect width='{w}' height='{h}' fill='white'/>\n\
         <ellipse cx='247.5' cy='31' rx='13' ry='18'/>\n\
         </mask>\n\
         </defs>\n\
         <g clip-path='url(#outer_rectangle)'>\n\
         <g style='isolation: isolate'>\n\
         <rect stroke='#{border}' fill='#{background}' rx='{radius}' x='0.5' y='0.5' \
         width='{rect_w}' height='{rect_h}' stroke-opacity='{border_opacity}'/>\n\
         </g>\n",
        w = CARD_WIDTH,
        h = CARD_HEIGHT,
        style = style_block(theme),
        radius = theme.border_radius,
        border = theme.border,
        background = theme.background,
        rect_w = CARD_WIDTH - 1,
        rect_h = CARD_HEIGHT - 1,
        border_opacity = border_opacity,
    )
}

fn style_block(theme: &CardTheme) -> String {
    let mut style = String::from(
        "\n@keyframes currstreak { 0% { font-size: 3px; opacity: 0.2; } \
         80% { font-size: 34px; opacity: 1; } 100% { font-size: 28px; opacity: 1; } }\n\
         @keyframes fadein { 0% { opacity: 0; } 100% { opacity: 1; } }\n",
    );
    if !theme.extras.is_empty() {
        style.push_str(":root { ");
        for (name, value) in &theme.extras {
            style.push_str(&format!("--{}: #{}; ", name, value));
        }
        style.push_str("}\n");
    }
    style
}

fn column_rules(theme: &CardTheme) -> String {
    format!(
        "<g style='isolation: isolate'>\n\
         <line x1='165' y1='28' x2='165' y2='170' vector-effect='non-scaling-stroke' \
         stroke-width='1' stroke='#{stroke}' stroke-linejoin='miter' stroke-linecap='square' \
         stroke-miterlimit='3'/>\n\
         <line x1='330' y1='28' x2='330' y2='170' vector-effect='non-scaling-stroke' \
         stroke-width='1' stroke='#{stroke}' stroke-linejoin='miter' stroke-linecap='square' \
         stroke-miterlimit='3'/>\n\
         </g>\n",
        stroke = theme.stroke,
    )
}

/// Left and right columns share one shape: big number, label, date range,
/// staggered fade-ins.
fn side_column(
    x: u32,
    number: &str,
    label: &str,
    range: &str,
    theme: &CardTheme,
    delays: [&str; 3],
) -> String {
    format!(
        "<g style='isolation: isolate'>\n\
         <g transform='translate({x}, 48)'>\n\
         <text x='81.5' y='32' stroke-width='0' text-anchor='middle' fill='#{num_fill}' \
         stroke='none' font-family='\"Segoe UI\", Ubuntu, sans-serif' font-weight='700' \
         font-size='28px' font-style='normal' style='opacity: 0; animation: fadein 0.5s \
         linear forwards {d1}s'>{number}</text>\n\
         </g>\n\
         <g transform='translate({x}, 84)'>\n\
         <text x='81.5' y='32' stroke-width='0' text-anchor='middle' fill='#{label_fill}' \
         stroke='none' font-family='\"Segoe UI\", Ubuntu, sans-serif' font-weight='400' \
         font-size='14px' font-style='normal' style='opacity: 0; animation: fadein 0.5s \
         linear forwards {d2}s'>{label}</text>\n\
         </g>\n\
         <g transform='translate({x}, 114)'>\n\
         <text x='81.5' y='32' stroke-width='0' text-anchor='middle' fill='#{range_fill}' \
         stroke='none' font-family='\"Segoe UI\", Ubuntu, sans-serif' font-weight='400' \
         font-size='12px' font-style='normal' style='opacity: 0; animation: fadein 0.5s \
         linear forwards {d3}s'>{range}</text>\n\
         </g>\n\
         </g>\n",
        x = x,
        num_fill = theme.side_nums,
        label_fill = theme.side_labels,
        range_fill = theme.dates,
        number = number,
        label = split_lines(label, LABEL_MAX_CHARS, LABEL_LINE_OFFSET),
        range = split_lines(range, RANGE_MAX_CHARS, RANGE_LINE_OFFSET),
        d1 = delays[0],
        d2 = delays[1],
        d3 = delays[2],
    )
}

/// Center column: the current streak number inside the accent ring, the
/// flame over the ring gap, bold label and range below.
fn center_column(number: &str, label: &str, range: &str, theme: &CardTheme) -> String {
    format!(
        "<g style='isolation: isolate'>\n\
         <g mask='url(#ring_gap)'>\n\
         <circle cx='247.5' cy='71' r='40' fill='none' stroke='#{ring}' stroke-width='5' \
         style='opacity: 0; animation: fadein 0.5s linear forwards 0.4s'/>\n\
         </g>\n\
         <g transform='translate(235, 19.5) scale(1.6)' stroke-width='0' \
         style='opacity: 0; animation: fadein 0.5s linear forwards 0.6s'>\n\
         <g fill='#{fire}'>{flame}</g>\n\
         </g>\n\
         <g transform='translate({x}, 48)'>\n\
         <text x='81.5' y='33' stroke-width='0' text-anchor='middle' fill='#{num_fill}' \
         stroke='none' font-family='\"Segoe UI\", Ubuntu, sans-serif' font-weight='700' \
         font-size='28px' font-style='normal' style='animation: currstreak 0.6s linear \
         forwards'>{number}</text>\n\
         </g>\n\
         <g transform='translate({x}, 108)'>\n\
         <text x='81.5' y='32' stroke-width='0' text-anchor='middle' fill='#{label_fill}' \
         stroke='none' font-family='\"Segoe UI\", Ubuntu, sans-serif' font-weight='700' \
         font-size='14px' font-style='normal' style='opacity: 0; animation: fadein 0.5s \
         linear forwards 0.9s'>{label}</text>\n\
         </g>\n\
         <g transform='translate({x}, 145)'>\n\
         <text x='81.5' y='21' stroke-width='0' text-anchor='middle' fill='#{range_fill}' \
         stroke='none' font-family='\"Segoe UI\", Ubuntu, sans-serif' font-weight='400' \
         font-size='12px' font-style='normal' style='opacity: 0; animation: fadein 0.5s \
         linear forwards 0.9s'>{range}</text>\n\
         </g>\n\
         </g>\n",
        x = COLUMN_CENTER_X,
        ring = theme.ring,
        fire = theme.fire,
        flame = icons::flame(),
        num_fill = theme.curr_streak_num,
        label_fill = theme.curr_streak_label,
        range_fill = theme.dates,
        number = number,
        label = split_lines(label, LABEL_MAX_CHARS, LABEL_LINE_OFFSET),
        range = split_lines(range, RANGE_MAX_CHARS, RANGE_LINE_OFFSET),
    )
}

/// Minimal escaping for text that can carry request-supplied content.
fn escape_xml(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '\'' => "&apos;".to_string(),
            '"' => "&quot;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{ActivityRecord, compute_stats};
    use crate::theme;
    use std::collections::HashMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_stats() -> Stats {
        let records: Vec<ActivityRecord> = (1..=5)
            .map(|day| ActivityRecord {
                date: d(2023, 5, day),
                count: day,
            })
            .collect();
        compute_stats(&records, d(2023, 5, 5)).unwrap()
    }

    fn default_theme() -> CardTheme {
        theme::fallback(&HashMap::new())
    }

    #[test]
    fn card_contains_every_dynamic_slot() {
        let stats = sample_stats();
        let card = generate_card(&stats, &default_theme(), d(2023, 5, 5));

        assert_eq!(card.content_type, "image/svg+xml");
        assert!(card.body.contains(">15</text>")); // total contributions
        assert!(card.body.contains(">5</text>")); // both streak lengths
        assert!(card.body.contains("Total Contributions"));
        assert!(card.body.contains("Current Streak"));
        assert!(card.body.contains("Longest Streak"));
        assert!(card.body.contains("May 1 – May 5")); // current year, no year part
        assert!(card.body.contains("May 1 – Present"));
    }

    #[test]
    fn theme_colors_reach_the_template() {
        let mut params = HashMap::new();
        params.insert("background".to_string(), "000000".to_string());
        params.insert("ring".to_string(), "ABC123".to_string());
        let theme = theme::fallback(&params);

        let card = generate_card(&sample_stats(), &theme, d(2023, 5, 5));
        assert!(card.body.contains("fill='#000000'"));
        assert!(card.body.contains("stroke='#ABC123'"));
    }

    #[test]
    fn border_radius_is_applied() {
        let mut params = HashMap::new();
        params.insert("border_radius".to_string(), "16".to_string());
        let theme = theme::fallback(&params);

        let card = generate_card(&sample_stats(), &theme, d(2023, 5, 5));
        assert!(card.body.contains("rx='16'"));
    }

    #[test]
    fn hidden_border_drops_stroke_opacity() {
        let mut params = HashMap::new();
        params.insert("hide_border".to_string(), "true".to_string());
        let theme = theme::fallback(&params);

        let card = generate_card(&sample_stats(), &theme, d(2023, 5, 5));
        assert!(card.body.contains("stroke-opacity='0'"));
    }

    #[test]
    fn extras_become_css_custom_properties() {
        let mut params = HashMap::new();
        params.insert("accent".to_string(), "123456".to_string());
        let theme = theme::fallback(&params);

        let card = generate_card(&sample_stats(), &theme, d(2023, 5, 5));
        assert!(card.body.contains("--accent: #123456;"));
    }

    #[test]
    fn error_card_centers_the_message() {
        let card = generate_error_card("An unknown error occurred", &default_theme());
        assert!(card.body.contains("An unknown error occurred"));
        assert!(card.body.contains("text-anchor='middle'"));
        assert!(!card.body.contains("Current Streak"));
    }

    #[test]
    fn error_card_escapes_markup_in_messages() {
        let card = generate_error_card("no <user> \"found\"", &default_theme());
        assert!(card.body.contains("no &lt;user&gt; &quot;found&quot;"));
        assert!(!card.body.contains("<user>"));
    }

    #[test]
    fn long_error_message_wraps() {
        let card = generate_error_card(
            "Could not find a user with the username example",
            &default_theme(),
        );
        assert!(card.body.contains("<tspan x='81.5' dy='0'>"));
        assert!(card.body.contains("<tspan x='81.5' dy='16'>"));
    }
}
