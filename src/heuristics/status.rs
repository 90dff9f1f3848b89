use super::StatusLetter;
use crate::catalog;
use regex::Regex;
use std::sync::LazyLock;

/// Letters followed by digits, e.g. `BIG02`, `BIG2`, `IT101`, `N104`.
static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{1,4})(\d{1,3})\b").expect("code pattern is valid"));

/// Ways a status letter is set apart from the surrounding text; `#` stands for the letter.
const LETTER_PATTERNS: &[&str] = &[
    "(#)", "[#]", "{#}", "<#>", "|#|", "\"#\"", "'#'", " # ", "\t#\t", " #\t", "\t# ", ",#,",
];

static PATTERNS_BY_LETTER: LazyLock<Vec<(StatusLetter, Vec<String>)>> = LazyLock::new(|| {
    [StatusLetter::M, StatusLetter::O, StatusLetter::X]
        .into_iter()
        .map(|letter| {
            let c = letter.as_str();
            let patterns = LETTER_PATTERNS.iter().map(|p| p.replace('#', c)).collect();
            (letter, patterns)
        })
        .collect()
});

/// All catalog field codes mentioned on a line, in order of first mention.
///
/// A token with three digits is read as a tag ending in a digit (`IT1` + `01`);
/// otherwise 2-4 letters and a 1-2 digit position are zero-padded (`BIG2` -> `BIG02`).
pub(super) fn codes_in_line(line: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for cap in CODE_RE.captures_iter(line) {
        let (letters, digits) = (&cap[1], &cap[2]);
        let code = match (letters.len(), digits.len()) {
            (1..=3, 3) => format!("{letters}{digits}"),
            (2..=4, 1..=2) => match digits.parse::<u32>() {
                Ok(pos) => format!("{letters}{pos:02}"),
                Err(_) => continue,
            },
            _ => continue,
        };
        if catalog::lookup(&code).is_some() && !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

/// Status letter set apart by brackets, quotes, bars or whitespace.
/// `M` is checked before `O`, and `O` before `X`.
pub(super) fn delimited_letter(line: &str) -> Option<StatusLetter> {
    PATTERNS_BY_LETTER
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| line.contains(p.as_str())))
        .map(|(letter, _)| *letter)
}

/// A bare `M`, `O` or `X` among the last three tokens of the line.
pub(super) fn trailing_letter(line: &str) -> Option<StatusLetter> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let tail = &tokens[tokens.len().saturating_sub(3)..];
    tail.iter()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .find_map(StatusLetter::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_in_line() {
        assert_eq!(
            codes_in_line("BIG01 Invoice Date, BIG2 Invoice Number"),
            vec!["BIG01", "BIG02"]
        );
        assert_eq!(codes_in_line("N104 and IT101 per loop"), vec!["N104", "IT101"]);
        assert_eq!(codes_in_line("BIG01 again BIG01"), vec!["BIG01"]);
    }

    #[test]
    fn test_unknown_codes_are_dropped() {
        assert!(codes_in_line("BEG01 Purchase Order Type ZZZ99").is_empty());
        assert!(codes_in_line("see page 12, item A1").is_empty());
    }

    #[test]
    fn test_delimited_letter_precedence() {
        assert_eq!(delimited_letter("BIG02 Invoice Number (M) AN"), Some(StatusLetter::M));
        assert_eq!(delimited_letter("BIG04 PO Number [O]"), Some(StatusLetter::O));
        assert_eq!(delimited_letter("REF03 |X| Description"), Some(StatusLetter::X));
        assert_eq!(delimited_letter("BIG03 O then M AN 8/8"), Some(StatusLetter::M));
        assert_eq!(delimited_letter("BIG03 Order Date"), None);
    }

    #[test]
    fn test_trailing_letter() {
        assert_eq!(trailing_letter("BIG02 Invoice Number M."), Some(StatusLetter::M));
        assert_eq!(trailing_letter("BIG04 Purchase Order Number\tO"), Some(StatusLetter::O));
        assert_eq!(trailing_letter("X BIG04 Purchase Order Number here"), None);
        assert_eq!(trailing_letter(""), None);
    }
}
