//! Brazilian-format input masks and date conversions.
//!
//! Forms edit dates as `dd/mm/aaaa` and phones as `(DD) NNNNN-NNNN`; the API
//! speaks ISO dates and bare digits. Everything here is pure string work.

use chrono::{Datelike, Months, NaiveDate};

/// Longest name accepted by the user form.
pub const NAME_MAX_CHARS: usize = 60;

const MONTHS_PT_BR: [&str; 12] = [
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
];

pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Progressive phone mask, capped at 11 digits (DDD + 9-digit mobile).
pub fn format_phone_br(value: &str) -> String {
    let d: String = digits_only(value).chars().take(11).collect();
    match d.len() {
        0 => String::new(),
        1..=2 => format!("({}", d),
        3..=6 => format!("({}) {}", &d[..2], &d[2..]),
        7..=10 => format!("({}) {}-{}", &d[..2], &d[2..6], &d[6..]),
        _ => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]),
    }
}

/// Progressive `dd/mm/aaaa` mask, capped at 8 digits.
pub fn mask_date_br(value: &str) -> String {
    let d: String = digits_only(value).chars().take(8).collect();
    match d.len() {
        0..=2 => d,
        3..=4 => format!("{}/{}", &d[..2], &d[2..]),
        _ => format!("{}/{}/{}", &d[..2], &d[2..4], &d[4..]),
    }
}

/// True for exactly `dd/mm/aaaa` (shape only, not calendar validity).
pub fn is_date_br(value: &str) -> bool {
    let b = value.as_bytes();
    b.len() == 10
        && b[2] == b'/'
        && b[5] == b'/'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 2 || i == 5 || c.is_ascii_digit())
}

/// `dd/mm/aaaa` → `aaaa-mm-dd`.
pub fn br_to_iso(value: &str) -> Option<String> {
    if !is_date_br(value) {
        return None;
    }
    Some(format!("{}-{}-{}", &value[6..10], &value[3..5], &value[..2]))
}

/// First `aaaa-mm-dd` found anywhere in the value (timestamps included) → `dd/mm/aaaa`.
pub fn iso_to_br(value: &str) -> Option<String> {
    let iso = find_iso_date(value.trim())?;
    Some(format!("{}/{}/{}", &iso[8..10], &iso[5..7], &iso[..4]))
}

fn find_iso_date(value: &str) -> Option<&str> {
    let bytes = value.as_bytes();
    if bytes.len() < 10 {
        return None;
    }
    (0..=bytes.len() - 10).find_map(|start| {
        let w = &bytes[start..start + 10];
        let shaped = w[4] == b'-'
            && w[7] == b'-'
            && w.iter()
                .enumerate()
                .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
        // all-ASCII window, so the byte range is a char boundary
        shaped.then(|| &value[start..start + 10])
    })
}

fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(find_iso_date(value.trim())?, "%Y-%m-%d").ok()
}

/// Adds whole years; Feb 29 lands on Feb 28 in non-leap targets.
pub fn add_years_to_iso(value: &str, years: u32) -> Option<String> {
    let date = parse_iso_date(value)?;
    let shifted = date.checked_add_months(Months::new(years.checked_mul(12)?))?;
    Some(shifted.format("%Y-%m-%d").to_string())
}

/// `2024-03-05` → `05 de março de 2024`.
pub fn format_date_long_pt_br(value: &str) -> Option<String> {
    let date = parse_iso_date(value)?;
    let month = MONTHS_PT_BR[date.month0() as usize];
    Some(format!("{:02} de {} de {}", date.day(), month, date.year()))
}

fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c.is_whitespace() || c == '-' || c == '\'' || c == '\u{2019}'
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

pub fn is_valid_name(value: &str) -> bool {
    value.chars().all(is_name_char)
}

/// Drops disallowed characters, collapses repeated separators, strips
/// leading separators and truncates to [`NAME_MAX_CHARS`].
pub fn sanitize_name(value: &str) -> String {
    let kept: Vec<char> = value.chars().filter(|c| is_name_char(*c)).collect();

    let mut out: Vec<char> = Vec::with_capacity(kept.len());
    let mut i = 0;
    while i < kept.len() {
        let c = kept[i];
        let class: fn(char) -> bool = if c.is_whitespace() {
            char::is_whitespace
        } else if c == '-' {
            |x| x == '-'
        } else if is_apostrophe(c) {
            is_apostrophe
        } else {
            out.push(c);
            i += 1;
            continue;
        };

        let mut end = i + 1;
        while end < kept.len() && class(kept[end]) {
            end += 1;
        }
        if end - i >= 2 {
            out.push(if c.is_whitespace() {
                ' '
            } else if c == '-' {
                '-'
            } else {
                '\''
            });
        } else {
            out.push(c);
        }
        i = end;
    }

    out.into_iter()
        .skip_while(|c| c.is_whitespace() || *c == '-' || is_apostrophe(*c))
        .take(NAME_MAX_CHARS)
        .collect()
}
