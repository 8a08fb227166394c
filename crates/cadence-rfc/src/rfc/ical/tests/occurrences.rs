//! Expansion of complete rule sets.

use super::fixtures::*;
use crate::rfc::api::parse;

fn expand(text: &str, n: usize) -> Vec<String> {
    let set = parse(text).unwrap();
    set.iter()
        .take(n)
        .map(|dt| dt.naive_local().format("%Y-%m-%d %H:%M").to_string())
        .collect()
}

fn days(text: &str, n: usize) -> Vec<String> {
    expand(text, n)
        .into_iter()
        .map(|s| s[..10].to_string())
        .collect()
}

#[test_log::test]
fn daily_for_ten() {
    let got = days(DAILY_COUNT, 100);
    assert_eq!(got.len(), 10);
    assert_eq!(got.first().map(String::as_str), Some("1997-09-02"));
    assert_eq!(got.last().map(String::as_str), Some("1997-09-11"));
}

#[test_log::test]
fn daily_until_keeps_wall_clock_over_dst() {
    let set = parse(DAILY_UNTIL).unwrap();
    let all: Vec<_> = set.iter().collect();
    assert_eq!(all.len(), 113);
    assert!(all.iter().all(|dt| dt.format("%H:%M").to_string() == "09:00"));
    assert_eq!(
        all.last().map(|dt| dt.to_rfc3339()),
        Some("1997-12-23T09:00:00-05:00".to_string())
    );
}

#[test_log::test]
fn every_other_day() {
    assert_eq!(
        days(EVERY_OTHER_DAY, 3),
        ["1997-09-02", "1997-09-04", "1997-09-06"]
    );
}

#[test_log::test]
fn january_two_ways() {
    let yearly = expand(JANUARY_YEARLY, 200);
    assert_eq!(yearly.len(), 93);
    assert_eq!(yearly, expand(JANUARY_DAILY, 200));
    assert_eq!(yearly.last().map(String::as_str), Some("2000-01-31 09:00"));
}

#[test_log::test]
fn tuesday_thursday_until_matches_count() {
    let until = days(TUE_THU_UNTIL, 100);
    assert_eq!(
        until,
        [
            "1997-09-02",
            "1997-09-04",
            "1997-09-09",
            "1997-09-11",
            "1997-09-16",
            "1997-09-18",
            "1997-09-23",
            "1997-09-25",
            "1997-09-30",
            "1997-10-02",
        ]
    );
    assert_eq!(until, days(TUE_THU_COUNT, 100));
}

#[test_log::test]
fn second_to_last_monday() {
    assert_eq!(
        days(SECOND_TO_LAST_MONDAY, 100),
        [
            "1997-09-22",
            "1997-10-20",
            "1997-11-17",
            "1997-12-22",
            "1998-01-19",
            "1998-02-16",
        ]
    );
}

#[test_log::test]
fn third_to_last_day() {
    assert_eq!(
        days(THIRD_TO_LAST_DAY, 6),
        [
            "1997-09-28",
            "1997-10-29",
            "1997-11-28",
            "1997-12-29",
            "1998-01-29",
            "1998-02-26",
        ]
    );
}

#[test_log::test]
fn every_eighteen_months() {
    assert_eq!(
        days(EVERY_18_MONTHS, 100),
        [
            "1997-09-10",
            "1997-09-11",
            "1997-09-12",
            "1997-09-13",
            "1997-09-14",
            "1997-09-15",
            "1999-03-10",
            "1999-03-11",
            "1999-03-12",
            "1999-03-13",
        ]
    );
}

#[test_log::test]
fn june_and_july() {
    let got = days(JUNE_JULY, 100);
    assert_eq!(got.len(), 10);
    assert_eq!(got[..3], ["1997-06-10", "1997-07-10", "1998-06-10"]);
    assert_eq!(got.last().map(String::as_str), Some("2001-07-10"));
}

#[test_log::test]
fn year_days_every_third_year() {
    assert_eq!(
        days(YEAR_DAYS, 100),
        [
            "1997-01-01",
            "1997-04-10",
            "1997-07-19",
            "2000-01-01",
            "2000-04-09",
            "2000-07-18",
            "2003-01-01",
            "2003-04-10",
            "2003-07-19",
            "2006-01-01",
        ]
    );
}

#[test_log::test]
fn friday_13th_skips_dtstart() {
    assert_eq!(
        days(FRIDAY_13TH, 5),
        [
            "1998-02-13",
            "1998-03-13",
            "1998-11-13",
            "1999-08-13",
            "2000-10-13",
        ]
    );
}

#[test_log::test]
fn saturday_after_first_sunday() {
    assert_eq!(
        days(SATURDAY_AFTER_FIRST_SUNDAY, 5),
        [
            "1997-09-13",
            "1997-10-11",
            "1997-11-08",
            "1997-12-13",
            "1998-01-10",
        ]
    );
}

#[test_log::test]
fn election_day() {
    assert_eq!(
        days(ELECTION_DAY, 3),
        ["1996-11-05", "2000-11-07", "2004-11-02"]
    );
}

#[test_log::test]
fn week_start_changes_result() {
    assert_eq!(
        days(WKST_MONDAY, 100),
        ["1997-08-05", "1997-08-10", "1997-08-19", "1997-08-24"]
    );
    assert_eq!(
        days(WKST_SUNDAY, 100),
        ["1997-08-05", "1997-08-17", "1997-08-19", "1997-08-31"]
    );
}

#[test_log::test]
fn last_work_day_of_month() {
    assert_eq!(
        days(LAST_WORK_DAY, 6),
        [
            "1997-09-30",
            "1997-10-31",
            "1997-11-28",
            "1997-12-31",
            "1998-01-30",
            "1998-02-27",
        ]
    );
}

#[test_log::test]
fn yearly_by_month_starts_at_first_match() {
    assert_eq!(
        expand(YEARLY_BY_MONTH, 100),
        ["1998-01-02 09:00", "1998-03-02 09:00", "1999-01-02 09:00"]
    );
}

#[test_log::test]
fn invalid_dates_are_ignored() {
    assert_eq!(
        days(INVALID_DATE_IGNORED, 100),
        [
            "2007-01-15",
            "2007-01-30",
            "2007-02-15",
            "2007-03-15",
            "2007-03-30",
        ]
    );
}

#[test_log::test]
fn combined_rules_dates_and_exclusions() {
    assert_eq!(
        expand(COMBINED, 100),
        [
            "2026-01-05 08:00",
            "2026-01-05 12:00",
            "2026-01-06 08:00",
            "2026-01-14 08:00",
            "2026-01-19 08:00",
            "2026-01-21 08:00",
            "2026-02-06 08:00",
            "2026-03-06 08:00",
        ]
    );
}

#[test_log::test]
fn dates_only_set_without_dtstart() {
    assert_eq!(expand(FLOATING_DATES_ONLY, 100), ["2026-02-01 00:00"]);
}
