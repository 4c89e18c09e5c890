use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::error::InvalidDueTime;

const DEFAULT_TIME: &str = "23:59";

const TODAY_SYNONYMS: [&str; 6] = ["tdy", "2day", "2de", "2da", "2d", "today"];
const TOMORROW_SYNONYMS: [&str; 5] = ["tomw", "tmw", "tmr", "2moro", "tomorrow"];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

const WEEKDAY_NAMES: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Turns what the user typed in the "due" box into a due timestamp.
///
/// Empty input means "today at 23:59". A lone date token gets `23:59` as its
/// time. The first token matching a today/tomorrow shorthand is replaced by
/// the calendar date; anything after that is left to the generic grammar.
/// The result is cut to whole minutes and must not lie before `now`.
pub fn parse_due_time(raw: Option<&str>, now: NaiveDateTime) -> Result<NaiveDateTime, InvalidDueTime> {
    let raw = match raw.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => "today",
    };

    let expanded = expand_shorthand(raw, now.date())?;
    let due = parse_generic(&expanded, now)?;
    let due = due
        .with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .ok_or_else(|| InvalidDueTime::OutOfRange(raw.to_string()))?;

    if due < now {
        return Err(InvalidDueTime::InPast);
    }
    Ok(due)
}

fn expand_shorthand(raw: &str, today: NaiveDate) -> Result<String, InvalidDueTime> {
    let lowered = raw.to_lowercase();
    let mut tokens: Vec<String> = lowered.split_whitespace().map(str::to_string).collect();

    if tokens.len() == 1 && parse_time(&tokens[0]).is_none() {
        tokens.push(DEFAULT_TIME.to_string());
    }

    for token in tokens.iter_mut() {
        let date = if TODAY_SYNONYMS.contains(&token.as_str()) {
            today
        } else if TOMORROW_SYNONYMS.contains(&token.as_str()) {
            today
                .succ_opt()
                .ok_or_else(|| InvalidDueTime::OutOfRange(raw.to_string()))?
        } else {
            continue;
        };
        *token = date.format("%Y-%m-%d").to_string();
        break;
    }

    Ok(tokens.join(" "))
}

#[derive(Default)]
struct Fields {
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    month: Option<u32>,
    day: Option<u32>,
    year: Option<i32>,
    weekday: Option<Weekday>,
}

enum Number {
    Day(u32),
    Year(i32),
}

/// Reads an already lowercased, shorthand-free date/time phrase. Missing
/// date means today, missing time means midnight, and a month without a day
/// borrows today's day.
fn parse_generic(text: &str, now: NaiveDateTime) -> Result<NaiveDateTime, InvalidDueTime> {
    let unrecognized = || InvalidDueTime::Unrecognized(text.to_string());
    let today = now.date();
    let mut fields = Fields::default();

    let tokens = text
        .split_whitespace()
        .map(|t| t.trim_end_matches(','))
        .filter(|t| !t.is_empty());

    for token in tokens {
        let fresh = if let Some(time) = parse_time(token) {
            set_once(&mut fields.time, time?)
        } else if let Some(date) = parse_numeric_date(token, today) {
            set_once(&mut fields.date, date?)
        } else if let Some(month) = parse_month_name(token) {
            set_once(&mut fields.month, month)
        } else if let Some(weekday) = parse_weekday_name(token) {
            set_once(&mut fields.weekday, weekday)
        } else {
            match parse_number(token) {
                Some(Number::Day(day)) => set_once(&mut fields.day, day),
                Some(Number::Year(year)) => set_once(&mut fields.year, year),
                None => false,
            }
        };
        if !fresh {
            return Err(unrecognized());
        }
    }

    let date = match (fields.date, fields.month, fields.day, fields.year, fields.weekday) {
        (Some(date), None, None, None, None) => date,
        (None, Some(month), Some(day), year, None) => {
            NaiveDate::from_ymd_opt(year.unwrap_or(today.year()), month, day)
                .ok_or_else(|| InvalidDueTime::OutOfRange(text.to_string()))?
        }
        // No day given: keep today's day, pulled back to the month's last day.
        (None, Some(month), None, year, None) => {
            let year = year.unwrap_or(today.year());
            (1..=today.day())
                .rev()
                .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
                .ok_or_else(|| InvalidDueTime::OutOfRange(text.to_string()))?
        }
        (None, None, None, None, Some(weekday)) => next_weekday(today, weekday)
            .ok_or_else(|| InvalidDueTime::OutOfRange(text.to_string()))?,
        (None, None, None, None, None) => today,
        _ => return Err(unrecognized()),
    };

    Ok(date.and_time(fields.time.unwrap_or(NaiveTime::MIN)))
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(value);
    true
}

/// `None` when the token does not look like a time at all.
fn parse_time(token: &str) -> Option<Result<NaiveTime, InvalidDueTime>> {
    match token {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0).map(Ok),
        "midnight" => return Some(Ok(NaiveTime::MIN)),
        _ => {}
    }

    let (clock, pm) = if let Some(rest) = token.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = token.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (token, None)
    };
    if pm.is_none() && !clock.contains(':') {
        return None;
    }

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }

    let out_of_range = || InvalidDueTime::OutOfRange(token.to_string());
    let numbers: Result<Vec<u32>, _> = parts.iter().map(|p| p.parse::<u32>()).collect();
    let Ok(numbers) = numbers else {
        return Some(Err(out_of_range()));
    };

    let mut hour = numbers[0];
    let minute = numbers.get(1).copied().unwrap_or(0);
    let second = numbers.get(2).copied().unwrap_or(0);

    if let Some(pm) = pm {
        if !(1..=12).contains(&hour) {
            return Some(Err(out_of_range()));
        }
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }

    Some(NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(out_of_range))
}

fn parse_numeric_date(token: &str, today: NaiveDate) -> Option<Result<NaiveDate, InvalidDueTime>> {
    let is_separator = |c: char| matches!(c, '-' | '/' | '.');
    if !token.contains(is_separator) || !token.chars().all(|c| c.is_ascii_digit() || is_separator(c)) {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(token, format) {
            return Some(Ok(date));
        }
    }

    // Month/day without a year lands in the current year.
    if let Some((month, day)) = token.split_once('/') {
        if let (Ok(month), Ok(day)) = (month.parse::<u32>(), day.parse::<u32>()) {
            return Some(
                NaiveDate::from_ymd_opt(today.year(), month, day)
                    .ok_or_else(|| InvalidDueTime::OutOfRange(token.to_string())),
            );
        }
    }

    Some(Err(InvalidDueTime::OutOfRange(token.to_string())))
}

fn parse_month_name(token: &str) -> Option<u32> {
    if token.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(token))
        .map(|index| index as u32 + 1)
}

fn parse_weekday_name(token: &str) -> Option<Weekday> {
    if token.len() < 3 {
        return None;
    }
    WEEKDAY_NAMES
        .iter()
        .find(|(name, _)| name.starts_with(token))
        .map(|(_, weekday)| *weekday)
}

fn parse_number(token: &str) -> Option<Number> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| token.strip_suffix(suffix))
        .unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.len() {
        1 | 2 => digits.parse().ok().map(Number::Day),
        4 if digits.len() == token.len() => digits.parse().ok().map(Number::Year),
        _ => None,
    }
}

/// Next `target` on or after `today`.
fn next_weekday(today: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let ahead = (7 + target.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    today.checked_add_days(Days::new(u64::from(ahead)))
}
