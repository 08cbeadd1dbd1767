use chrono::{Datelike, Duration, NaiveDate, Weekday};
use anyhow::{anyhow, bail, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Strict `yyyy-MM-dd`: four-digit year, zero-padded month and day, nothing
/// around them.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|e| anyhow!("Invalid date '{}': {}", input, e))?;
    // chrono accepts unpadded fields, a sign and leading blanks.
    if format_date(date) != input {
        bail!("Invalid date '{}': expected yyyy-MM-dd", input);
    }
    Ok(date)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `date + days`, clamped to the representable range.
pub fn add_days_saturating(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Last day of the ISO week containing `today` (Sunday).
///
/// `today + (7 - weekday)`, so on a Sunday this is `today` itself.
pub fn end_of_week(today: NaiveDate) -> NaiveDate {
    let weekday = today.weekday().number_from_monday() as i64;
    add_days_saturating(today, 7 - weekday)
}

/// Monday through Sunday of the week after `today`.
pub fn next_week_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().number_from_monday() as i64;
    let start = add_days_saturating(today, 8 - weekday);
    (start, add_days_saturating(start, 6))
}

/// First and last day of the calendar month containing `today`.
pub fn month_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    let next_month = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    };
    let end = next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (start, end)
}

/// Resolves a human date relative to `today`.
///
/// Accepts `today`/`tod`, `tomorrow`/`tom`, `eow`, `eom`, `+Nd`/`+Nw`/`+Nm`,
/// weekday tokens (`fri`, `2:fri`) and `yyyy-MM-dd`. Results must fit the
/// storage format, so anything outside years 0000..=9999 is an error.
pub fn parse_human_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    let date = resolve_human_date(input, today)?
        .ok_or_else(|| anyhow!("Date out of range: {}", input))?;
    if !(0..=9999).contains(&date.year()) {
        bail!("Date out of range: {}", input);
    }
    Ok(date)
}

/// `Ok(None)` when the arithmetic leaves the calendar.
fn resolve_human_date(input: &str, today: NaiveDate) -> Result<Option<NaiveDate>> {
    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(Some(today)),
        "tomorrow" | "tom" => return Ok(today.succ_opt()),
        "eow" => return Ok(Some(end_of_week(today))),
        "eom" => return Ok(Some(month_range(today).1)),
        _ => {}
    }

    // 2. Relative format (+Nd, +Nw, +Nm)
    if let Some(rest) = input.strip_prefix('+') {
        if rest.len() < 2 || !rest.is_char_boundary(rest.len() - 1) {
            return Err(anyhow!("Invalid relative format: {}", input));
        }
        let (num_str, unit) = rest.split_at(rest.len() - 1);
        let count: i64 = num_str.parse().map_err(|_| anyhow!("Invalid relative format: {}", input))?;

        return match unit {
            "d" => Ok(add_days(today, Some(count))),
            "w" => Ok(add_days(today, count.checked_mul(7))),
            "m" => Ok(add_months(today, count)),
            _ => Err(anyhow!("Unknown unit in relative time: {}", unit)),
        };
    }

    // 3. Weekday format (fri, 2:fri)
    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target_weekday) = parse_weekday_str(day_str) {
            let mut days_needed = target_weekday.num_days_from_sunday() as i64
                - today.weekday().num_days_from_sunday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // count = 1 means the next one, count = 2 the one after that.
            let offset = (count - 1)
                .checked_mul(7)
                .and_then(|weeks| weeks.checked_add(days_needed));
            return Ok(add_days(today, offset));
        }
    }

    // 4. Fallback to the storage format
    parse_date(input)
        .map(Some)
        .map_err(|_| anyhow!("Could not parse date: {}", input))
}

fn add_days(today: NaiveDate, days: Option<i64>) -> Option<NaiveDate> {
    let delta = Duration::try_days(days?)?;
    today.checked_add_signed(delta)
}

fn add_months(today: NaiveDate, count: i64) -> Option<NaiveDate> {
    let month_index = (today.year() as i64 * 12 + today.month0() as i64).checked_add(count)?;
    let year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month = month_index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, today.day()).or_else(|| {
        // Jan 31 + 1m lands on the last day of February.
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| month_range(first).1)
    })
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() == 2 {
            if let Ok(count) = parts[0].parse::<i64>() {
                if count >= 1 {
                    return Some((count, parts[1]));
                }
            }
        }
    } else {
        // Just "fri" means 1:fri
        return Some((1, input));
    }
    None
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
