// Highlighting of the beautiful part of an identifier
use crate::classifier::{BeautyKind, Classification};
use colored::Color;

const ANSI_RESET: &str = "\x1b[0m";

/// How matched spans are marked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Bold terminal colors, one color per kind
    Ansi,
    /// Bracket pairs, for pipes and logs
    Brackets,
}

fn kind_color(kind: BeautyKind) -> Color {
    match kind {
        BeautyKind::Repeated => Color::BrightRed,
        BeautyKind::Ascending => Color::BrightGreen,
        BeautyKind::Descending => Color::BrightYellow,
        BeautyKind::Palindrome => Color::BrightBlue,
        BeautyKind::SpecialNumber => Color::BrightMagenta,
    }
}

/// Opening and closing marker for a kind.
///
/// ANSI codes are written out directly instead of going through `Colorize`,
/// which would drop them when stdout is not a terminal.
pub fn markers(kind: BeautyKind, style: MarkerStyle) -> (String, &'static str) {
    match style {
        MarkerStyle::Ansi => (
            format!("\x1b[1;{}m", kind_color(kind).to_fg_str()),
            ANSI_RESET,
        ),
        MarkerStyle::Brackets => {
            let (open, close) = match kind {
                BeautyKind::Repeated => ("[", "]"),
                BeautyKind::Ascending => ("<", ">"),
                BeautyKind::Descending => ("{", "}"),
                BeautyKind::Palindrome => ("(", ")"),
                BeautyKind::SpecialNumber => ("|", "|"),
            };
            (open.to_string(), close)
        }
    }
}

/// Wrap the matched part of `id` in the kind's marker.
///
/// Repeated runs are marked at every occurrence, other kinds only at the first.
/// A part that does not occur leaves the identifier untouched.
pub fn highlight(id: &str, classification: &Classification, style: MarkerStyle) -> String {
    let part = classification.part.as_str();
    if part.is_empty() {
        return id.to_string();
    }

    let (open, close) = markers(classification.kind, style);
    let mut highlighted = String::with_capacity(id.len() + open.len() + close.len());
    let mut cursor = 0;

    // the cursor walks the source, so inserted markers are never searched
    while let Some(offset) = id[cursor..].find(part) {
        let start = cursor + offset;
        let end = start + part.len();

        highlighted.push_str(&id[cursor..start]);
        highlighted.push_str(&open);
        highlighted.push_str(part);
        highlighted.push_str(close);
        cursor = end;

        if classification.kind != BeautyKind::Repeated {
            break;
        }
    }

    highlighted.push_str(&id[cursor..]);
    highlighted
}

/// Remove every marker of `style` from `text`
#[allow(dead_code)]
pub fn strip_markers(text: &str, style: MarkerStyle) -> String {
    BeautyKind::ALL.iter().fold(text.to_string(), |acc, kind| {
        let (open, close) = markers(*kind, style);
        acc.replace(open.as_str(), "").replace(close, "")
    })
}
