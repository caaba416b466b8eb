//! Calendar-aware variable expansion for snippet text.
//!
//! Expansion is a total function: every occurrence of a known token is
//! replaced literally, unknown brace text is left verbatim, and there is
//! no escape mechanism for literal braces. The clock is injected through
//! [`ExpandContext`] so rendering is reproducible.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// Caller-supplied expansion context.
#[derive(Debug, Clone)]
pub struct ExpandContext {
    pub user_name: String,
    pub now: NaiveDateTime,
}

const WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// A linked token pair: the second date hangs off the first rather than
/// being computed independently.
struct SchedulePair {
    first: &'static str,
    second: &'static str,
    base_days: i64,
    alt_days: i64,
}

/// Substitution must run in this order. `{1日後}` and `{2日後}` each
/// appear in two pairs; the earlier pair's replacement takes effect, while
/// the later pair's slot-1 date still seeds its own slot 2.
const SCHEDULE_PAIRS: [SchedulePair; 3] = [
    SchedulePair {
        first: "{当日}",
        second: "{1日後}",
        base_days: 0,
        alt_days: 1,
    },
    SchedulePair {
        first: "{1日後}",
        second: "{2日後}",
        base_days: 1,
        alt_days: 2,
    },
    SchedulePair {
        first: "{2日後}",
        second: "{3日後}",
        base_days: 2,
        alt_days: 3,
    },
];

/// Expand every template token in `text`. All occurrences are replaced;
/// tokens without a context value substitute the empty string.
pub fn expand(text: &str, context: &ExpandContext) -> String {
    let today = context.now.date();
    let tomorrow = today + Duration::days(1);
    let day_after = today + Duration::days(2);

    let mut out = text.replace("{名前}", &context.user_name);
    out = out.replace("{name}", &context.user_name);

    let date = ymd(today);
    out = out.replace("{日付}", &date);
    out = out.replace("{date}", &date);
    out = out.replace("{年}", &today.year().to_string());
    out = out.replace("{月}", &today.month().to_string());
    out = out.replace("{日}", &today.day().to_string());

    let time = format!("{:02}:{:02}", context.now.hour(), context.now.minute());
    out = out.replace("{時刻}", &time);
    out = out.replace("{time}", &time);
    out = out.replace("{曜日}", weekday(today));

    out = out.replace("{明日}", &ymd(tomorrow));
    out = out.replace("{明後日}", &ymd(day_after));
    out = out.replace("{今日:MM/DD}", &md(today));
    out = out.replace("{明日:MM/DD}", &md(tomorrow));

    let stamp = format!(
        "{} {:02}:{:02}:{:02}",
        date,
        context.now.hour(),
        context.now.minute(),
        context.now.second()
    );
    out = out.replace("{タイムスタンプ}", &stamp);

    for pair in &SCHEDULE_PAIRS {
        let (first, second) = schedule_dates(today, pair);
        out = out.replace(pair.first, &schedule_label(first));
        out = out.replace(pair.second, &schedule_label(second));
    }

    out
}

/// Reminder dates never land on the first of a month: a candidate that
/// does is discarded for the pair's alternate offset, used as-is.
fn skip_first_of_month(today: NaiveDate, base_days: i64, alt_days: i64) -> NaiveDate {
    let candidate = today + Duration::days(base_days);
    if candidate.day() == 1 {
        today + Duration::days(alt_days)
    } else {
        candidate
    }
}

fn schedule_dates(today: NaiveDate, pair: &SchedulePair) -> (NaiveDate, NaiveDate) {
    let first = skip_first_of_month(today, pair.base_days, pair.alt_days);
    // The follow-up date is always first + 1; landing on the 1st moves it
    // exactly one more day, with no alternate involved.
    let mut second = first + Duration::days(1);
    if second.day() == 1 {
        second += Duration::days(1);
    }
    (first, second)
}

fn schedule_label(date: NaiveDate) -> String {
    format!("{}月{}日（{}）", date.month(), date.day(), weekday(date))
}

fn weekday(date: NaiveDate) -> &'static str {
    WEEKDAYS[date.weekday().num_days_from_sunday() as usize]
}

fn ymd(date: NaiveDate) -> String {
    format!("{:04}/{:02}/{:02}", date.year(), date.month(), date.day())
}

fn md(date: NaiveDate) -> String {
    format!("{:02}/{:02}", date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> ExpandContext {
        ExpandContext {
            user_name: "山田".to_string(),
            now: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, s)
                .unwrap(),
        }
    }

    #[test]
    fn substitutes_name_in_both_spellings() {
        let out = expand("{名前}様 ({name})", &at(2026, 1, 31, 9, 0, 0));
        assert_eq!(out, "山田様 (山田)");
    }

    #[test]
    fn empty_user_name_substitutes_empty_string() {
        let mut context = at(2026, 1, 31, 9, 0, 0);
        context.user_name = String::new();
        assert_eq!(expand("[{名前}]", &context), "[]");
    }

    #[test]
    fn formats_date_tokens() {
        let out = expand("{日付} {date} {年}/{月}/{日}", &at(2026, 1, 31, 9, 0, 0));
        assert_eq!(out, "2026/01/31 2026/01/31 2026/1/31");
    }

    #[test]
    fn formats_time_and_timestamp() {
        let out = expand("{時刻}|{time}|{タイムスタンプ}", &at(2026, 1, 31, 9, 5, 7));
        assert_eq!(out, "09:05|09:05|2026/01/31 09:05:07");
    }

    #[test]
    fn weekday_comes_from_the_japanese_table() {
        // 2026-01-31 is a Saturday.
        assert_eq!(expand("{曜日}", &at(2026, 1, 31, 9, 0, 0)), "土");
    }

    #[test]
    fn tomorrow_crosses_the_month_boundary() {
        let context = at(2026, 1, 31, 9, 0, 0);
        assert_eq!(expand("{明日}", &context), "2026/02/01");
        assert_eq!(expand("{明後日}", &context), "2026/02/02");
        assert_eq!(expand("{今日:MM/DD}", &context), "01/31");
        assert_eq!(expand("{明日:MM/DD}", &context), "02/01");
    }

    #[test]
    fn replaces_every_occurrence() {
        let out = expand("{date} と {date}", &at(2026, 1, 31, 9, 0, 0));
        assert_eq!(out, "2026/01/31 と 2026/01/31");
    }

    #[test]
    fn unknown_tokens_stay_verbatim() {
        let context = at(2026, 1, 31, 9, 0, 0);
        assert_eq!(expand("{謎} {date", &context), "{謎} {date");
    }

    #[test]
    fn schedule_base_date_stays_off_the_first() {
        // Pair A slot 1: offset 0 from 2026-01-31 is not the 1st.
        assert_eq!(expand("{当日}", &at(2026, 1, 31, 9, 0, 0)), "1月31日（土）");
    }

    #[test]
    fn schedule_skips_the_first_of_month() {
        // 2026-01-31 + 1 day = 02-01, which is discarded for the
        // alternate offset (+2) = 02-02, a Monday.
        assert_eq!(expand("{1日後}", &at(2026, 1, 31, 9, 0, 0)), "2月2日（月）");
    }

    #[test]
    fn follow_up_advances_past_the_first() {
        // Pair A: slot 1 = 02-28, slot 2 = 03-01 → bumped to 03-02.
        assert_eq!(expand("{1日後}", &at(2026, 2, 28, 9, 0, 0)), "3月2日（月）");
    }

    #[test]
    fn later_pair_seeds_from_its_own_base() {
        // From 2026-02-28, Pair B's base lands on 03-01 and falls back to
        // 03-02, so its follow-up is 03-03. Pair C's base is 03-02
        // directly, and its follow-up is also 03-03: the two tokens
        // legitimately coincide.
        let context = at(2026, 2, 28, 9, 0, 0);
        assert_eq!(expand("{2日後}", &context), "3月3日（火）");
        assert_eq!(expand("{3日後}", &context), "3月3日（火）");
    }

    #[test]
    fn pairs_substitute_in_fixed_order() {
        // {1日後} belongs to Pair A's follow-up slot by the time Pair B
        // runs; both computations agree here, and the text is replaced
        // exactly once.
        let out = expand("{当日}/{1日後}/{2日後}/{3日後}", &at(2026, 1, 30, 9, 0, 0));
        assert_eq!(out, "1月30日（金）/1月31日（土）/2月2日（月）/2月3日（火）");
    }
}
