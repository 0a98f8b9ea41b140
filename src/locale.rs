use chrono::{Datelike, NaiveDate};
use log::warn;

/// A bundled locale: card labels, name tables, and date conventions.
///
/// The tables live in the binary and are immutable after startup; lookups
/// hand out `'static` references.
pub struct Locale {
    pub tag: &'static str,
    pub total_contributions: &'static str,
    pub current_streak: &'static str,
    pub longest_streak: &'static str,
    pub present: &'static str,
    /// Default date pattern in the mini-language below.
    pub date_format: &'static str,
    /// Separator placed between the endpoints of a date range.
    pub separator: &'static str,
    pub months_short: [&'static str; 12],
    pub months_full: [&'static str; 12],
    /// Sunday-first.
    pub weekdays_short: [&'static str; 7],
}

pub const EN: Locale = Locale {
    tag: "en",
    total_contributions: "Total Contributions",
    current_streak: "Current Streak",
    longest_streak: "Longest Streak",
    present: "Present",
    date_format: "M j[, Y]",
    separator: "\u{2013}",
    months_short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    months_full: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    weekdays_short: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
};

const DE: Locale = Locale {
    tag: "de",
    total_contributions: "Gesamte Beiträge",
    current_streak: "Aktuelle Serie",
    longest_streak: "Längste Serie",
    present: "Heute",
    date_format: "j. M[ Y]",
    separator: "\u{2013}",
    months_short: [
        "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.",
        "Dez.",
    ],
    months_full: [
        "Januar",
        "Februar",
        "März",
        "April",
        "Mai",
        "Juni",
        "Juli",
        "August",
        "September",
        "Oktober",
        "November",
        "Dezember",
    ],
    weekdays_short: ["So.", "Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa."],
};

const ES: Locale = Locale {
    tag: "es",
    total_contributions: "Contribuciones totales",
    current_streak: "Racha actual",
    longest_streak: "Racha más larga",
    present: "Presente",
    date_format: "j M[ Y]",
    separator: "\u{2013}",
    months_short: [
        "ene.", "feb.", "mar.", "abr.", "may.", "jun.", "jul.", "ago.", "sept.", "oct.", "nov.",
        "dic.",
    ],
    months_full: [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ],
    weekdays_short: ["dom.", "lun.", "mar.", "mié.", "jue.", "vie.", "sáb."],
};

const FR: Locale = Locale {
    tag: "fr",
    total_contributions: "Contributions totales",
    current_streak: "Série actuelle",
    longest_streak: "Plus longue série",
    present: "Présent",
    date_format: "j M[ Y]",
    separator: "\u{2013}",
    months_short: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
        "déc.",
    ],
    months_full: [
        "janvier",
        "février",
        "mars",
        "avril",
        "mai",
        "juin",
        "juillet",
        "août",
        "septembre",
        "octobre",
        "novembre",
        "décembre",
    ],
    weekdays_short: ["dim.", "lun.", "mar.", "mer.", "jeu.", "ven.", "sam."],
};

const JA: Locale = Locale {
    tag: "ja",
    total_contributions: "総コントリビューション数",
    current_streak: "現在のストリーク",
    longest_streak: "最長のストリーク",
    present: "現在",
    date_format: "[Y年]n月j日",
    separator: "～",
    months_short: [
        "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    ],
    months_full: [
        "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    ],
    weekdays_short: ["日", "月", "火", "水", "木", "金", "土"],
};

const PT_BR: Locale = Locale {
    tag: "pt_br",
    total_contributions: "Total de contribuições",
    current_streak: "Sequência atual",
    longest_streak: "Maior sequência",
    present: "Presente",
    date_format: "j/n[/Y]",
    separator: "-",
    months_short: [
        "jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.",
        "dez.",
    ],
    months_full: [
        "janeiro",
        "fevereiro",
        "março",
        "abril",
        "maio",
        "junho",
        "julho",
        "agosto",
        "setembro",
        "outubro",
        "novembro",
        "dezembro",
    ],
    weekdays_short: ["dom.", "seg.", "ter.", "qua.", "qui.", "sex.", "sáb."],
};

const VI: Locale = Locale {
    tag: "vi",
    total_contributions: "Tổng số đóng góp",
    current_streak: "Chuỗi đóng góp hiện tại",
    longest_streak: "Chuỗi đóng góp dài nhất",
    present: "Hiện tại",
    date_format: "j/n[/Y]",
    separator: "-",
    months_short: [
        "thg 1", "thg 2", "thg 3", "thg 4", "thg 5", "thg 6", "thg 7", "thg 8", "thg 9", "thg 10",
        "thg 11", "thg 12",
    ],
    months_full: [
        "tháng 1",
        "tháng 2",
        "tháng 3",
        "tháng 4",
        "tháng 5",
        "tháng 6",
        "tháng 7",
        "tháng 8",
        "tháng 9",
        "tháng 10",
        "tháng 11",
        "tháng 12",
    ],
    weekdays_short: ["CN", "T2", "T3", "T4", "T5", "T6", "T7"],
};

const ZH: Locale = Locale {
    tag: "zh",
    total_contributions: "总贡献数",
    current_streak: "当前连续天数",
    longest_streak: "最长连续天数",
    present: "至今",
    date_format: "[Y年]n月j日",
    separator: "～",
    months_short: [
        "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    ],
    months_full: [
        "一月",
        "二月",
        "三月",
        "四月",
        "五月",
        "六月",
        "七月",
        "八月",
        "九月",
        "十月",
        "十一月",
        "十二月",
    ],
    weekdays_short: ["周日", "周一", "周二", "周三", "周四", "周五", "周六"],
};

const LOCALES: [&Locale; 8] = [&EN, &DE, &ES, &FR, &JA, &PT_BR, &VI, &ZH];

/// Resolve a locale tag, case-insensitively and with `-`/`_` treated alike.
/// Unknown tags fall back to `en`.
pub fn lookup(tag: &str) -> &'static Locale {
    let tag = tag.to_ascii_lowercase().replace('-', "_");
    LOCALES
        .iter()
        .find(|l| l.tag == tag)
        .copied()
        .unwrap_or(&EN)
}

/// Recognized single-character tokens of the date-format mini-language.
/// Everything else in a pattern is a literal.
const TOKENS: &str = "YymndjMFD";

#[derive(Debug)]
enum Segment {
    Literal(char),
    Token(char),
    /// Bracketed group, included only when the date is not in the current
    /// year (the year the computation is evaluated in).
    Group(Vec<Segment>),
}

/// Parse a pattern into segments. `None` on unbalanced brackets.
fn parse_pattern(pattern: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut group: Option<Vec<Segment>> = None;

    for c in pattern.chars() {
        match c {
            '[' if group.is_some() => return None,
            '[' => group = Some(Vec::new()),
            ']' => match group.take() {
                Some(inner) => segments.push(Segment::Group(inner)),
                None => return None,
            },
            _ => {
                let segment = if TOKENS.contains(c) {
                    Segment::Token(c)
                } else {
                    Segment::Literal(c)
                };
                match group.as_mut() {
                    Some(inner) => inner.push(segment),
                    None => segments.push(segment),
                }
            }
        }
    }

    group.is_none().then_some(segments)
}

fn render_segments(segments: &[Segment], date: NaiveDate, today: NaiveDate, locale: &Locale, out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Literal(c) => out.push(*c),
            Segment::Token(c) => render_token(*c, date, locale, out),
            Segment::Group(inner) => {
                if date.year() != today.year() {
                    render_segments(inner, date, today, locale, out);
                }
            }
        }
    }
}

fn render_token(token: char, date: NaiveDate, locale: &Locale, out: &mut String) {
    match token {
        'Y' => out.push_str(&date.year().to_string()),
        'y' => out.push_str(&format!("{:02}", date.year().rem_euclid(100))),
        'm' => out.push_str(&format!("{:02}", date.month())),
        'n' => out.push_str(&date.month().to_string()),
        'd' => out.push_str(&format!("{:02}", date.day())),
        'j' => out.push_str(&date.day().to_string()),
        'M' => out.push_str(locale.months_short[date.month0() as usize]),
        'F' => out.push_str(locale.months_full[date.month0() as usize]),
        'D' => out.push_str(locale.weekdays_short[date.weekday().num_days_from_sunday() as usize]),
        // parse_pattern only emits tokens from TOKENS
        _ => out.push(token),
    }
}

/// Format a date with the locale's default pattern, or `pattern_override`
/// when one is supplied. A malformed override degrades to the locale default
/// instead of failing the render.
pub fn format_date(
    date: NaiveDate,
    today: NaiveDate,
    locale: &Locale,
    pattern_override: Option<&str>,
) -> String {
    let segments = match pattern_override.filter(|p| !p.is_empty()) {
        Some(pattern) => parse_pattern(pattern).unwrap_or_else(|| {
            warn!("Malformed date_format {:?}, using {} default", pattern, locale.tag);
            parse_pattern(locale.date_format).unwrap_or_default()
        }),
        None => parse_pattern(locale.date_format).unwrap_or_default(),
    };

    let mut out = String::new();
    render_segments(&segments, date, today, locale, &mut out);
    out
}

/// Format a date range as `"<start> <sep> <end>"` with the locale's
/// separator; a range of a single day renders as that one date.
pub fn format_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    locale: &Locale,
    pattern_override: Option<&str>,
) -> String {
    let first = format_date(start, today, locale, pattern_override);
    if start == end {
        return first;
    }
    let last = format_date(end, today, locale, pattern_override);
    format!("{} {} {}", first, locale.separator, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const TODAY: NaiveDate = match NaiveDate::from_ymd_opt(2023, 6, 15) {
        Some(date) => date,
        None => panic!(),
    };

    #[test]
    fn en_default_pattern_includes_year_for_past_years() {
        let locale = lookup("en");
        assert_eq!(
            format_date(d(2019, 3, 28), TODAY, locale, None),
            "Mar 28, 2019"
        );
    }

    #[test]
    fn bracket_group_is_dropped_in_the_current_year() {
        let locale = lookup("en");
        assert_eq!(format_date(d(2023, 4, 12), TODAY, locale, None), "Apr 12");
        assert_eq!(
            format_date(d(2023, 4, 12), TODAY, locale, Some("[Y-]m-d")),
            "04-12"
        );
        assert_eq!(
            format_date(d(2019, 3, 28), TODAY, locale, Some("[Y-]m-d")),
            "2019-03-28"
        );
    }

    #[test]
    fn ja_uses_its_bundled_default_pattern() {
        let locale = lookup("ja");
        assert_eq!(
            format_date(d(2016, 8, 10), TODAY, locale, None),
            "2016年8月10日"
        );
        assert_eq!(format_date(d(2023, 8, 10), TODAY, locale, None), "8月10日");
    }

    #[test]
    fn override_beats_the_locale_default() {
        let locale = lookup("ja");
        assert_eq!(
            format_date(d(2016, 8, 10), TODAY, locale, Some("Y/m/d")),
            "2016/08/10"
        );
    }

    #[test]
    fn unknown_locale_falls_back_to_en() {
        assert_eq!(lookup("tlh").tag, "en");
        assert_eq!(lookup("").tag, "en");
    }

    #[test]
    fn locale_tags_normalize_case_and_dashes() {
        assert_eq!(lookup("PT-BR").tag, "pt_br");
        assert_eq!(lookup("Ja").tag, "ja");
    }

    #[test]
    fn unknown_pattern_characters_are_literal() {
        let locale = lookup("en");
        assert_eq!(
            format_date(d(2019, 3, 28), TODAY, locale, Some("j x M!")),
            "28 x Mar!"
        );
    }

    #[test]
    fn malformed_pattern_degrades_to_locale_default() {
        let locale = lookup("en");
        assert_eq!(
            format_date(d(2019, 3, 28), TODAY, locale, Some("[Y-m-d")),
            "Mar 28, 2019"
        );
        assert_eq!(
            format_date(d(2019, 3, 28), TODAY, locale, Some("]Y[")),
            "Mar 28, 2019"
        );
    }

    #[test]
    fn range_joins_with_the_locale_separator() {
        let locale = lookup("en");
        assert_eq!(
            format_range(d(2019, 3, 28), d(2019, 4, 12), TODAY, locale, None),
            "Mar 28, 2019 – Apr 12, 2019"
        );
    }

    #[test]
    fn single_day_range_renders_once() {
        let locale = lookup("en");
        assert_eq!(
            format_range(d(2019, 3, 28), d(2019, 3, 28), TODAY, locale, None),
            "Mar 28, 2019"
        );
    }

    #[test]
    fn weekday_and_full_month_tokens() {
        let locale = lookup("en");
        // 2019-03-28 was a Thursday
        assert_eq!(
            format_date(d(2019, 3, 28), TODAY, locale, Some("D, F j")),
            "Thu, March 28"
        );
    }
}
