use std::collections::{BTreeMap, HashMap};

use log::warn;

use crate::error::{Error, Result};

/// Request keys with meaning of their own; everything else in the query
/// string is treated as an extra color property.
pub const RESERVED_PARAMS: [&str; 7] = [
    "user",
    "type",
    "theme",
    "locale",
    "date_format",
    "hide_border",
    "border_radius",
];

const DEFAULT_BORDER_RADIUS: f64 = 4.5;

/// A named preset: the base color layer under per-request overrides.
pub struct Preset {
    pub name: &'static str,
    pub background: &'static str,
    pub border: &'static str,
    pub stroke: &'static str,
    pub ring: &'static str,
    pub fire: &'static str,
    pub curr_streak_num: &'static str,
    pub side_nums: &'static str,
    pub curr_streak_label: &'static str,
    pub side_labels: &'static str,
    pub dates: &'static str,
}

pub const DEFAULT: Preset = Preset {
    name: "default",
    background: "FFFEFE",
    border: "E4E2E2",
    stroke: "E4E2E2",
    ring: "FB8C00",
    fire: "FB8C00",
    curr_streak_num: "151515",
    side_nums: "151515",
    curr_streak_label: "FB8C00",
    side_labels: "151515",
    dates: "464646",
};

pub const DARK: Preset = Preset {
    name: "dark",
    background: "151515",
    border: "E4E2E2",
    stroke: "E4E2E2",
    ring: "FB8C00",
    fire: "FB8C00",
    curr_streak_num: "FEFEFE",
    side_nums: "FEFEFE",
    curr_streak_label: "FB8C00",
    side_labels: "FEFEFE",
    dates: "9E9E9E",
};

const HIGH_CONTRAST: Preset = Preset {
    name: "highcontrast",
    background: "000000",
    border: "FFFFFF",
    stroke: "FFFFFF",
    ring: "FFEB3B",
    fire: "E53935",
    curr_streak_num: "FFFFFF",
    side_nums: "FFFFFF",
    curr_streak_label: "FFEB3B",
    side_labels: "FFFFFF",
    dates: "FFFFFF",
};

const TRANSPARENT: Preset = Preset {
    name: "transparent",
    background: "FFFFFF00",
    border: "E4E2E2",
    stroke: "E4E2E2",
    ring: "FB8C00",
    fire: "FB8C00",
    curr_streak_num: "151515",
    side_nums: "151515",
    curr_streak_label: "FB8C00",
    side_labels: "151515",
    dates: "464646",
};

const RADICAL: Preset = Preset {
    name: "radical",
    background: "141321",
    border: "A9FEF7",
    stroke: "A9FEF7",
    ring: "FE428E",
    fire: "F8D847",
    curr_streak_num: "A9FEF7",
    side_nums: "A9FEF7",
    curr_streak_label: "FE428E",
    side_labels: "A9FEF7",
    dates: "A9FEF7",
};

const TOKYONIGHT: Preset = Preset {
    name: "tokyonight",
    background: "1A1B27",
    border: "70A5FD",
    stroke: "70A5FD",
    ring: "BF91F3",
    fire: "FF9E64",
    curr_streak_num: "70A5FD",
    side_nums: "70A5FD",
    curr_streak_label: "BF91F3",
    side_labels: "70A5FD",
    dates: "A9B1D6",
};

const DRACULA: Preset = Preset {
    name: "dracula",
    background: "282A36",
    border: "BD93F9",
    stroke: "BD93F9",
    ring: "FF79C6",
    fire: "FFB86C",
    curr_streak_num: "F8F8F2",
    side_nums: "F8F8F2",
    curr_streak_label: "FF79C6",
    side_labels: "F8F8F2",
    dates: "6272A4",
};

const GRUVBOX: Preset = Preset {
    name: "gruvbox",
    background: "282828",
    border: "EBDBB2",
    stroke: "EBDBB2",
    ring: "FABD2F",
    fire: "FE8019",
    curr_streak_num: "EBDBB2",
    side_nums: "EBDBB2",
    curr_streak_label: "FABD2F",
    side_labels: "8EC07C",
    dates: "A89984",
};

const MONOKAI: Preset = Preset {
    name: "monokai",
    background: "272822",
    border: "F8F8F2",
    stroke: "F8F8F2",
    ring: "EB1F6A",
    fire: "E7604A",
    curr_streak_num: "F1F1EB",
    side_nums: "F1F1EB",
    curr_streak_label: "EB1F6A",
    side_labels: "F1F1EB",
    dates: "75715E",
};

const NORD: Preset = Preset {
    name: "nord",
    background: "2E3440",
    border: "81A1C1",
    stroke: "81A1C1",
    ring: "88C0D0",
    fire: "EBCB8B",
    curr_streak_num: "D8DEE9",
    side_nums: "D8DEE9",
    curr_streak_label: "88C0D0",
    side_labels: "D8DEE9",
    dates: "81A1C1",
};

const PRESETS: [&Preset; 10] = [
    &DEFAULT,
    &DARK,
    &HIGH_CONTRAST,
    &TRANSPARENT,
    &RADICAL,
    &TOKYONIGHT,
    &DRACULA,
    &GRUVBOX,
    &MONOKAI,
    &NORD,
];

/// Fully resolved per-request theme, ready for the card template.
///
/// Colors are stored as hex digits without the leading `#`; unparseable
/// values pass through as authored.
#[derive(Debug, Clone, PartialEq)]
pub struct CardTheme {
    pub background: String,
    pub border: String,
    pub stroke: String,
    pub ring: String,
    pub fire: String,
    pub curr_streak_num: String,
    pub side_nums: String,
    pub curr_streak_label: String,
    pub side_labels: String,
    pub dates: String,
    pub border_radius: f64,
    pub hide_border: bool,
    pub locale: String,
    pub date_format: Option<String>,
    /// User-named color accents outside the fixed schema, by name.
    pub extras: BTreeMap<String, String>,
}

/// Layer request parameters over the preset named by `theme` over the
/// defaults. Fails with [`Error::UnknownTheme`] when the preset name is not
/// bundled; callers downgrade to [`fallback`] instead of aborting.
pub fn resolve(params: &HashMap<String, String>) -> Result<CardTheme> {
    let preset = match params.get("theme") {
        Some(name) => PRESETS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| Error::UnknownTheme(name.clone()))?,
        None => &DEFAULT,
    };
    Ok(resolve_with(preset, params))
}

/// [`resolve`] against the default preset, ignoring the `theme` parameter.
pub fn fallback(params: &HashMap<String, String>) -> CardTheme {
    resolve_with(&DEFAULT, params)
}

fn resolve_with(preset: &Preset, params: &HashMap<String, String>) -> CardTheme {
    let color = |key: &str, base: &'static str| -> String {
        params
            .get(key)
            .map(|value| normalize_color(value))
            .unwrap_or_else(|| base.to_string())
    };

    let border_radius = match params.get("border_radius") {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable border_radius {:?}", raw);
            DEFAULT_BORDER_RADIUS
        }),
        None => DEFAULT_BORDER_RADIUS,
    };

    let extras = params
        .iter()
        .filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_str()) && !is_schema_color(key))
        .map(|(key, value)| (sanitize_name(key), normalize_color(value)))
        .filter(|(key, _)| !key.is_empty())
        .collect();

    CardTheme {
        background: color("background", preset.background),
        border: color("border", preset.border),
        stroke: color("stroke", preset.stroke),
        ring: color("ring", preset.ring),
        fire: color("fire", preset.fire),
        curr_streak_num: color("currStreakNum", preset.curr_streak_num),
        side_nums: color("sideNums", preset.side_nums),
        curr_streak_label: color("currStreakLabel", preset.curr_streak_label),
        side_labels: color("sideLabels", preset.side_labels),
        dates: color("dates", preset.dates),
        border_radius,
        hide_border: matches!(
            params.get("hide_border").map(String::as_str),
            Some("true") | Some("1")
        ),
        locale: params.get("locale").cloned().unwrap_or_default(),
        date_format: params.get("date_format").filter(|f| !f.is_empty()).cloned(),
        extras,
    }
}

fn is_schema_color(key: &str) -> bool {
    matches!(
        key,
        "background"
            | "border"
            | "stroke"
            | "ring"
            | "fire"
            | "currStreakNum"
            | "sideNums"
            | "currStreakLabel"
            | "sideLabels"
            | "dates"
    )
}

/// Strip a leading `#` and a fully-opaque `FF` alpha channel; an 8-digit
/// value with any other alpha, and anything that is not hex at all, passes
/// through unchanged.
fn normalize_color(value: &str) -> String {
    let value = value.strip_prefix('#').unwrap_or(value);
    if value.len() == 8
        && value.chars().all(|c| c.is_ascii_hexdigit())
        && value[6..].eq_ignore_ascii_case("ff")
    {
        return value[..6].to_string();
    }
    value.to_string()
}

/// Extra property names end up in CSS; keep them to identifier characters.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
