/// Horizontal anchor of wrapped lines; the card centers every column's text
/// at local x 81.5 inside its translated group.
const LINE_X: &str = "81.5";

/// Vertical distance between the first and second line.
const LINE_PITCH: i32 = 16;

/// Lay out a label within a character budget.
///
/// Returns the text unchanged when it needs no split. Otherwise produces two
/// `<tspan>` fragments: the split happens at a manually inserted `\n` when
/// one is present, else at the last space at or before `max_chars`. A single
/// word longer than the budget is left whole rather than hyphenated. Width
/// is counted in characters, not bytes, so multi-byte scripts wrap the same
/// as ASCII. Only the first manual line break is honored.
pub fn split_lines(text: &str, max_chars: usize, line1_offset: i32) -> String {
    let chars: Vec<char> = text.chars().collect();

    let split_at = match chars.iter().position(|&c| c == '\n') {
        Some(i) => Some(i),
        None if chars.len() > max_chars => chars[..=max_chars].iter().rposition(|&c| c == ' '),
        None => None,
    };

    let Some(index) = split_at else {
        return text.to_string();
    };

    let line1: String = chars[..index].iter().collect();
    let line2: String = chars[index + 1..].iter().collect();
    format!(
        "<tspan x='{x}' dy='{offset}'>{line1}</tspan><tspan x='{x}' dy='{pitch}'>{line2}</tspan>",
        x = LINE_X,
        offset = line1_offset,
        pitch = LINE_PITCH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_label_passes_through() {
        assert_eq!(
            split_lines("Total Contributions", 24, -9),
            "Total Contributions"
        );
    }

    #[test]
    fn long_label_splits_at_word_boundary() {
        assert_eq!(
            split_lines("Chuỗi đóng góp hiện tại", 22, -9),
            "<tspan x='81.5' dy='-9'>Chuỗi đóng góp hiện</tspan><tspan x='81.5' dy='16'>tại</tspan>"
        );
    }

    #[test]
    fn manual_break_wins_over_word_boundary() {
        assert_eq!(
            split_lines("Chuỗi đóng góp\nhiện tại", 22, -9),
            "<tspan x='81.5' dy='-9'>Chuỗi đóng góp</tspan><tspan x='81.5' dy='16'>hiện tại</tspan>"
        );
    }

    #[test]
    fn date_range_at_budget_passes_through() {
        assert_eq!(
            split_lines("Mar 28, 2019 – Apr 12, 2019", 28, 0),
            "Mar 28, 2019 – Apr 12, 2019"
        );
    }

    #[test]
    fn long_date_range_splits_at_last_fitting_space() {
        assert_eq!(
            split_lines("19 de dez. de 2021 - 14 de mar.", 24, 0),
            "<tspan x='81.5' dy='0'>19 de dez. de 2021 - 14</tspan><tspan x='81.5' dy='16'>de mar.</tspan>"
        );
    }

    #[test]
    fn boundary_space_exactly_at_budget_is_used() {
        // space sits at index 5 == budget
        assert_eq!(
            split_lines("abcde fgh", 5, 0),
            "<tspan x='81.5' dy='0'>abcde</tspan><tspan x='81.5' dy='16'>fgh</tspan>"
        );
    }

    #[test]
    fn single_overlong_word_stays_whole() {
        assert_eq!(
            split_lines("Beitragsstatistiken", 10, -9),
            "Beitragsstatistiken"
        );
    }

    #[test]
    fn only_the_first_manual_break_splits() {
        assert_eq!(
            split_lines("a\nb\nc", 22, 0),
            "<tspan x='81.5' dy='0'>a</tspan><tspan x='81.5' dy='16'>b\nc</tspan>"
        );
    }
}
