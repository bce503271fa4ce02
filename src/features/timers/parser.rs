//! Free-text timer request parsing.
//!
//! A qualifying message is `<nickname> H:MM` or `<nickname> HH:MM` (24-hour
//! clock): a label followed by the last whitespace-separated time token on
//! the line. Anything else is not a timer request and the caller ignores it.
//!
//! The parsed time-of-day is cosmetic: it anchors the displayed start/finish
//! estimate, while the actual deadline is always measured from "now". The
//! displayed estimate and the scheduled deadline are separate values.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use chrono::{Duration, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

use crate::features::timers::record::TIMER_DURATION_HOURS;

static REQUEST_RE: OnceLock<Regex> = OnceLock::new();

/// `<label> <H:MM|HH:MM>`, anchored so the time token ends the line. The lazy
/// label group together with the end anchor makes the LAST time token win
/// when the label itself contains one.
fn request_re() -> &'static Regex {
    REQUEST_RE.get_or_init(|| {
        Regex::new(r"^(.+?)\s+(\d{1,2}):(\d{2})\s*$").expect("request pattern is valid")
    })
}

/// Why a message did not produce a timer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Not shaped like `<label> <time>` at all. Expected for most messages.
    NoMatch,
    /// Shaped like a request, but the hour/minute pair is out of range.
    InvalidTime,
}

/// A successfully parsed timer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// Trimmed, non-empty activity label.
    pub label: String,
    /// Wall-clock start time as typed by the user.
    pub start: NaiveTime,
}

/// Display and scheduling instants derived from a request at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTimes {
    /// Today's date at the typed time. Display only.
    pub start_display: NaiveDateTime,
    /// `start_display` plus the timer duration. Display only.
    pub finish_display: NaiveDateTime,
    /// The real deadline: `now` plus the timer duration.
    pub finish_at: NaiveDateTime,
}

/// Split a message into label and start time.
pub fn parse_request(text: &str) -> Result<ParsedRequest, ParseOutcome> {
    let captures = request_re().captures(text).ok_or(ParseOutcome::NoMatch)?;

    let label = captures[1].trim().to_string();
    if label.is_empty() {
        return Err(ParseOutcome::NoMatch);
    }

    // The regex guarantees 1-2 and exactly 2 digits, so these cannot overflow.
    let hour: u32 = captures[2].parse().map_err(|_| ParseOutcome::InvalidTime)?;
    let minute: u32 = captures[3].parse().map_err(|_| ParseOutcome::InvalidTime)?;

    let start = NaiveTime::from_hms_opt(hour, minute, 0).ok_or(ParseOutcome::InvalidTime)?;

    Ok(ParsedRequest { label, start })
}

/// Derive display times and the schedule anchor for a request submitted at
/// `now`. The displayed estimate uses today's date at the typed time; the
/// deadline ignores the typed time entirely.
pub fn compute_times(start: NaiveTime, now: NaiveDateTime) -> TimerTimes {
    let start_display = now.date().and_time(start);
    let finish_display = start_display + Duration::hours(TIMER_DURATION_HOURS);
    let finish_at = now + Duration::hours(TIMER_DURATION_HOURS);

    TimerTimes {
        start_display,
        finish_display,
        finish_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    // ---- parse_request ----

    #[test]
    fn test_parse_basic_request() {
        let parsed = parse_request("Warrior 10:00").unwrap();
        assert_eq!(parsed.label, "Warrior");
        assert_eq!(parsed.start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_single_digit_hour() {
        let parsed = parse_request("Mage 9:05").unwrap();
        assert_eq!(parsed.label, "Mage");
        assert_eq!(parsed.start, NaiveTime::from_hms_opt(9, 5, 0).unwrap());
    }

    #[test]
    fn test_parse_label_with_spaces() {
        let parsed = parse_request("Second Account 23:59").unwrap();
        assert_eq!(parsed.label, "Second Account");
    }

    #[test]
    fn test_parse_last_time_token_wins() {
        // A time-of-day inside the label belongs to the label.
        let parsed = parse_request("reset 10:00 run 11:30").unwrap();
        assert_eq!(parsed.label, "reset 10:00 run");
        assert_eq!(parsed.start, NaiveTime::from_hms_opt(11, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_trailing_whitespace() {
        let parsed = parse_request("Warrior 10:00  ").unwrap();
        assert_eq!(parsed.label, "Warrior");
    }

    #[test]
    fn test_no_match_plain_chat() {
        assert_eq!(parse_request("hello everyone"), Err(ParseOutcome::NoMatch));
        assert_eq!(parse_request(""), Err(ParseOutcome::NoMatch));
    }

    #[test]
    fn test_no_match_time_without_label() {
        assert_eq!(parse_request("10:00"), Err(ParseOutcome::NoMatch));
        assert_eq!(parse_request("   10:00"), Err(ParseOutcome::NoMatch));
    }

    #[test]
    fn test_no_match_trailing_text_after_time() {
        assert_eq!(
            parse_request("Warrior 10:00 please"),
            Err(ParseOutcome::NoMatch)
        );
    }

    #[test]
    fn test_invalid_hour() {
        assert_eq!(parse_request("Warrior 24:00"), Err(ParseOutcome::InvalidTime));
        assert_eq!(parse_request("Warrior 99:00"), Err(ParseOutcome::InvalidTime));
    }

    #[test]
    fn test_invalid_minute() {
        assert_eq!(parse_request("Warrior 10:60"), Err(ParseOutcome::InvalidTime));
    }

    #[test]
    fn test_midnight_boundaries() {
        assert!(parse_request("Warrior 0:00").is_ok());
        assert!(parse_request("Warrior 23:59").is_ok());
    }

    // ---- compute_times ----

    #[test]
    fn test_display_and_deadline_are_independent() {
        // Scenario: "Warrior 10:00" submitted at 09:00.
        let now = at(9, 0);
        let times = compute_times(NaiveTime::from_hms_opt(10, 0, 0).unwrap(), now);

        assert_eq!(times.start_display, at(10, 0));
        assert_eq!(times.finish_display, at(18, 0));
        // The deadline is 8h from submission, not from the typed time.
        assert_eq!(times.finish_at, at(17, 0));
    }

    #[test]
    fn test_deadline_is_exactly_eight_hours_from_now() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 37)
            .unwrap();
        let times = compute_times(NaiveTime::from_hms_opt(22, 15, 0).unwrap(), now);
        assert_eq!(times.finish_at - now, Duration::hours(8));
    }

    #[test]
    fn test_late_night_start_yields_past_finish_display() {
        // Scenario: "Warrior 01:00" submitted at 23:00 - the typed time is
        // pinned to today's date, so the displayed finish (09:00) is already
        // in the past.
        let now = at(23, 0);
        let times = compute_times(NaiveTime::from_hms_opt(1, 0, 0).unwrap(), now);

        assert_eq!(times.finish_display, at(9, 0));
        assert!(times.finish_display <= now);
        // The real deadline would still be in the future; the caller decides
        // not to create the timer based on the display.
        assert_eq!(times.finish_at, at(23, 0) + Duration::hours(8));
    }

    #[test]
    fn test_finish_display_crossing_midnight_stays_future() {
        let now = at(20, 0);
        let times = compute_times(NaiveTime::from_hms_opt(20, 0, 0).unwrap(), now);
        // 20:00 + 8h lands on the next calendar day.
        assert_eq!(
            times.finish_display,
            NaiveDate::from_ymd_opt(2024, 5, 2)
                .unwrap()
                .and_hms_opt(4, 0, 0)
                .unwrap()
        );
        assert!(times.finish_display > now);
    }
}
