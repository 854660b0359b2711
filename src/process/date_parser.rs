use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{PipelineError, Result};

/// Parse `"M/D/YY"` or `"M/D/YY H:MM"` keeping only the calendar date.
/// A time component, when present, must still be well formed.
pub fn parse_date(s: &str) -> Result<NaiveDateTime> {
    let (date, _) = split_timestamp(s)?;
    Ok(date.and_time(chrono::NaiveTime::MIN))
}

/// Parse `"M/D/YY"` or `"M/D/YY H:MM"` into a naive timestamp.
/// Hour and minute default to zero when no time is given.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let (date, time) = split_timestamp(s)?;
    let (hour, minute) = time.unwrap_or((0, 0));
    date.and_hms_opt(hour, minute, 0)
        .ok_or_else(|| format_err(s, "time out of range"))
}

fn split_timestamp(s: &str) -> Result<(NaiveDate, Option<(u32, u32)>)> {
    let tokens: Vec<&str> = s.trim().split(' ').collect();
    let (date_part, time_part) = match tokens.as_slice() {
        [date] => (*date, None),
        [date, time] => (*date, Some(*time)),
        _ => return Err(format_err(s, "expected a date and an optional time")),
    };

    let fields: Vec<&str> = date_part.split('/').collect();
    let [month, day, year] = fields.as_slice() else {
        return Err(format_err(s, "expected M/D/YY"));
    };
    if year.len() != 2 {
        return Err(format_err(s, "expected a two-digit year"));
    }
    let month = number(s, month)?;
    let day = number(s, day)?;
    let year = number(s, &format!("20{}", year))? as i32;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format_err(s, "no such calendar date"))?;

    let time = match time_part {
        None => None,
        Some(t) => {
            let fields: Vec<&str> = t.split(':').collect();
            let [hour, minute] = fields.as_slice() else {
                return Err(format_err(s, "expected H:MM"));
            };
            let hour = number(s, hour)?;
            let minute = number(s, minute)?;
            if hour > 23 || minute > 59 {
                return Err(format_err(s, "time out of range"));
            }
            Some((hour, minute))
        }
    };

    Ok((date, time))
}

fn number(input: &str, token: &str) -> Result<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_err(input, "non-numeric field"));
    }
    token
        .parse()
        .map_err(|_| format_err(input, "non-numeric field"))
}

fn format_err(input: &str, reason: &'static str) -> PipelineError {
    PipelineError::Format {
        input: input.to_string(),
        reason,
    }
}
