//! Static SVG path data for the card (Octicons).

/// Flame mark shown at the top of the current-streak ring.
pub fn flame() -> &'static str {
    r#"<path d="M9.533.753V.752c.217 2.385 1.463 3.626 2.653 4.81C13.37 6.74 14.498 7.863 14.498 10c0 3.5-3 6-6.5 6S1.5 13.512 1.5 10c0-1.298.536-2.56 1.425-3.286.376-.308.862 0 1.035.454.283.744.72 1.102 1.206 1.12.69.026 1.379-.603 1.379-1.788 0-1.346-.366-2.322-.721-3.095-.22-.479-.206-1.048.254-1.309C7.423 1.34 9.32-.643 9.533.753Z"/>"#
}
