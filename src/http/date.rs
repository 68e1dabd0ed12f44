//! HTTP date codec.
//!
//! Clients still send every date layout HTTP has ever allowed in
//! `If-Modified-Since`, so parsing walks an ordered list of layouts and
//! takes the first that matches. Matching is lenient: runs of whitespace
//! are interchangeable (`"Nov  6"` and `"Nov 6"` both match), day and month
//! names are case-insensitive and may be short or long, and numeric fields
//! that are out of range roll over instead of failing (`Nov 31` is `Dec 1`).
//! Text following a complete date is ignored.
//!
//! Rendering always produces the IMF-fixdate form, which is also the second
//! parse layout, so a rendered date always parses back to the same second.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Parse layouts, tried in order.
///
/// The directives are a small strftime subset: `%a`/`%A` weekday name,
/// `%b` month name, `%d` day, `%H:%M:%S` time, `%Y` year, `%y` two digit
/// year, `%Z` zone. A space matches one or more whitespace characters.
const LAYOUTS: &[&str] = &[
    // Sun Nov 6 08:49:37 GMT 1994
    "%a %b %d %H:%M:%S %Z %Y",
    // Sun, 06 Nov 1994 08:49:37 GMT (RFC 1123)
    "%a, %d %b %Y %H:%M:%S %Z",
    // Sunday, 06-Nov-94 08:49:37 GMT (RFC 850)
    "%A, %d-%b-%y %H:%M:%S %Z",
    // Sun Nov  6 08:49:37 1994 (asctime)
    "%a %b %d %H:%M:%S %Y",
];

const RENDER_LAYOUT: &str = "%a, %d %b %Y %H:%M:%S GMT";

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Zone abbreviations and their offset east of UTC in seconds.
const ZONES: &[(&str, i64)] = &[
    ("gmt", 0),
    ("utc", 0),
    ("ut", 0),
    ("z", 0),
    ("est", -5 * 3600),
    ("edt", -4 * 3600),
    ("cst", -6 * 3600),
    ("cdt", -5 * 3600),
    ("mst", -7 * 3600),
    ("mdt", -6 * 3600),
    ("pst", -8 * 3600),
    ("pdt", -7 * 3600),
];

/// Parses an HTTP date in any of the accepted layouts.
///
/// Returns `None` only when no layout matches. A date without a zone is
/// read as UTC.
///
/// # Example
///
/// ```
/// # use fileserve::http::date::parse_http_date;
/// let a = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
/// let b = parse_http_date("Sunday, 06-Nov-94 08:49:37 GMT").unwrap();
/// let c = parse_http_date("Sun Nov  6 08:49:37 1994").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(b, c);
/// assert!(parse_http_date("yesterday").is_none());
/// ```
pub fn parse_http_date(text: &str) -> Option<DateTime<Utc>> {
    let current_year = i64::from(Utc::now().year());
    LAYOUTS
        .iter()
        .find_map(|layout| parse_layout(layout, text, current_year))
}

/// Renders `instant` as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn format_http_date(instant: DateTime<Utc>) -> String {
    instant.format(RENDER_LAYOUT).to_string()
}

#[derive(Debug, Default)]
struct Fields {
    year: i64,
    month: u32,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
    offset: i64,
}

impl Fields {
    fn instant(&self) -> Option<DateTime<Utc>> {
        let year = i32::try_from(self.year).ok()?;
        let first_of_month = NaiveDate::from_ymd_opt(year, self.month, 1)?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
            .timestamp();

        let secs = first_of_month
            + (self.day - 1) * 86_400
            + self.hour * 3_600
            + self.minute * 60
            + self.second
            - self.offset;

        DateTime::from_timestamp(secs, 0)
    }
}

fn parse_layout(layout: &str, text: &str, current_year: i64) -> Option<DateTime<Utc>> {
    let mut fields = Fields::default();
    let mut rest = text.trim();
    let mut pattern = layout.chars();

    while let Some(c) = pattern.next() {
        rest = match c {
            '%' => {
                let directive = pattern.next()?;
                match directive {
                    'a' | 'A' => take_name(rest, &WEEKDAYS)?.1,
                    'b' => {
                        let (index, rest) = take_name(rest, &MONTHS)?;
                        fields.month = u32::try_from(index).ok()? + 1;
                        rest
                    }
                    'd' => take_number(rest, 2, &mut fields.day)?,
                    'H' => take_number(rest, 2, &mut fields.hour)?,
                    'M' => take_number(rest, 2, &mut fields.minute)?,
                    'S' => take_number(rest, 2, &mut fields.second)?,
                    'Y' => take_number(rest, 4, &mut fields.year)?,
                    'y' => {
                        let before = rest;
                        let rest = take_number(rest, 4, &mut fields.year)?;
                        if before.len() - rest.len() == 2 {
                            fields.year = expand_two_digit_year(fields.year, current_year);
                        }
                        rest
                    }
                    'Z' => {
                        let (offset, rest) = take_zone(rest)?;
                        fields.offset = offset;
                        rest
                    }
                    _ => return None,
                }
            }
            ' ' => {
                let trimmed = rest.trim_start();
                if trimmed.len() == rest.len() {
                    return None;
                }
                trimmed
            }
            literal => rest.strip_prefix(literal)?,
        };
    }

    // Anything after a complete date (e.g. `; length=34`) is ignored.
    fields.instant()
}

/// Matches a full or three letter name from `names`, ignoring case.
fn take_name<'a>(input: &'a str, names: &[&str]) -> Option<(usize, &'a str)> {
    let end = input
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(input.len());
    let word = input[..end].to_ascii_lowercase();

    if word.len() < 3 {
        return None;
    }

    let index = names
        .iter()
        .position(|name| *name == word || (word.len() == 3 && name.starts_with(&word)))?;

    Some((index, &input[end..]))
}

fn take_number<'a>(input: &'a str, max_digits: usize, out: &mut i64) -> Option<&'a str> {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());

    if end == 0 || end > max_digits {
        return None;
    }

    *out = input[..end].parse().ok()?;
    Some(&input[end..])
}

fn take_zone(input: &str) -> Option<(i64, &str)> {
    if let Some(sign) = input.chars().next().filter(|c| *c == '+' || *c == '-') {
        let digits = input.get(1..5)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hours: i64 = digits[..2].parse().ok()?;
        let minutes: i64 = digits[2..].parse().ok()?;
        let offset = hours * 3_600 + minutes * 60;
        let offset = if sign == '-' { -offset } else { offset };
        return Some((offset, &input[5..]));
    }

    let end = input
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(input.len());
    let name = input[..end].to_ascii_lowercase();

    ZONES
        .iter()
        .find(|(zone, _)| *zone == name)
        .map(|(_, offset)| (*offset, &input[end..]))
}

/// Places a two digit year within 80 years before and 20 years after
/// `current_year`.
fn expand_two_digit_year(yy: i64, current_year: i64) -> i64 {
    let start = current_year - 80;
    let year = start - start.rem_euclid(100) + yy;
    if year < start { year + 100 } else { year }
}
