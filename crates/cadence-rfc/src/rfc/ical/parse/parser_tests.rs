use chrono::TimeZone;

use super::*;
use crate::rfc::ical::parse::rule_parts::RuleKey;

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Zone> {
    Zone::Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

#[test_log::test]
fn parse_utc_daily() {
    let parsed = parse_rule_set("DTSTART:20120201T093000Z\nRRULE:FREQ=DAILY;COUNT=3").unwrap();
    assert_eq!(parsed.dt_start, utc(2012, 2, 1, 9, 30, 0));
    assert_eq!(parsed.rrules.len(), 1);
    assert_eq!(parsed.rrules[0].get(RuleKey::Count), Some("3"));
}

#[test_log::test]
fn parse_zoned_dtstart() {
    let parsed =
        parse_rule_set("DTSTART;TZID=America/New_York:19970902T090000\nRRULE:FREQ=WEEKLY")
            .unwrap();
    let zone = Zone::Iana(chrono_tz::America::New_York);
    assert_eq!(parsed.dt_start.timezone(), zone);
    assert_eq!(
        parsed.dt_start,
        zone.with_ymd_and_hms(1997, 9, 2, 9, 0, 0).unwrap()
    );
}

#[test_log::test]
fn parse_floating_and_date_dtstart() {
    let parsed = parse_rule_set("DTSTART:1997-09-02T09:00:00\nRRULE:FREQ=DAILY").unwrap();
    assert_eq!(parsed.dt_start.timezone(), Zone::Floating);

    let parsed = parse_rule_set("DTSTART;VALUE=DATE:19970902\nRRULE:FREQ=DAILY").unwrap();
    assert_eq!(parsed.dt_start.timezone(), Zone::Floating);
    assert_eq!(
        parsed.dt_start,
        Zone::Floating.with_ymd_and_hms(1997, 9, 2, 0, 0, 0).unwrap()
    );
}

#[test_log::test]
fn rdates_and_exdates_move_into_dtstart_zone() {
    let input = "DTSTART;TZID=Europe/Paris:20260105T090000\n\
                 RRULE:FREQ=DAILY;COUNT=5\n\
                 RDATE:20260110T080000Z,20260111T090000\n\
                 EXDATE;TZID=Europe/Paris:20260106T090000";
    let parsed = parse_rule_set(input).unwrap();
    let paris = Zone::Iana(chrono_tz::Europe::Paris);

    assert_eq!(parsed.rdates.len(), 2);
    assert!(parsed.rdates.iter().all(|d| d.timezone() == paris));
    // 08:00Z is 09:00 in Paris in winter
    assert_eq!(
        parsed.rdates[0],
        paris.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap()
    );
    // floating RDATE is read in the DTSTART zone
    assert_eq!(
        parsed.rdates[1],
        paris.with_ymd_and_hms(2026, 1, 11, 9, 0, 0).unwrap()
    );
    assert_eq!(
        parsed.exdates,
        vec![paris.with_ymd_and_hms(2026, 1, 6, 9, 0, 0).unwrap()]
    );
}

#[test_log::test]
fn folded_lines_and_order_independence() {
    let input = "RRULE:FREQ=MONTHLY;\r\n BYMONTHDAY=-1\r\nDTSTART:20240131T120000Z\r\n";
    let parsed = parse_rule_set(input).unwrap();
    assert_eq!(parsed.rrules[0].get(RuleKey::ByMonthDay), Some("-1"));
}

#[test_log::test]
fn rdate_only_set_starts_at_earliest_rdate() {
    let parsed = parse_rule_set("RDATE:20260301T100000Z,20260201T100000Z").unwrap();
    assert_eq!(parsed.dt_start, utc(2026, 2, 1, 10, 0, 0));
    assert_eq!(parsed.rdates.len(), 2);
}

#[test_log::test]
fn empty_input_rejected() {
    let err = parse_rule_set(" \n\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::EmptyInput);
}

#[test_log::test]
fn missing_dtstart_with_rule_rejected() {
    let err = parse_rule_set("RRULE:FREQ=DAILY\nRDATE:20260101T000000Z").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingDtStart);

    let err = parse_rule_set("EXDATE:20260101T000000Z").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingDtStart);
}

#[test_log::test]
fn duplicate_dtstart_rejected() {
    let err =
        parse_rule_set("DTSTART:20260101T000000Z\nDTSTART:20260102T000000Z").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::DuplicateDtStart);
    assert_eq!(err.line, 2);
}

#[test_log::test]
fn unknown_property_rejected() {
    let err = parse_rule_set("DTSTART:20260101T000000Z\nSUMMARY:Standup").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownProperty);
    assert_eq!(err.detail.as_deref(), Some("SUMMARY"));
}

#[test_log::test]
fn unknown_parameter_rejected() {
    let err = parse_rule_set("DTSTART;LANGUAGE=en:20260101T000000Z").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownParameter);

    let err =
        parse_rule_set("DTSTART:20260101T000000Z\nRRULE;TZID=UTC:FREQ=DAILY").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownParameter);
}

#[test_log::test]
fn unknown_timezone_rejected() {
    let err = parse_rule_set("DTSTART;TZID=Nowhere/Special:20260101T090000").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidTimezone);
}

#[test_log::test]
fn bad_date_literal_reports_position() {
    let err = parse_rule_set("DTSTART:2026011T090000Z").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidDate);
    assert_eq!((err.line, err.column), (1, 9));
}

#[test_log::test]
fn dtstart_in_dst_gap_rejected() {
    let err = parse_rule_set("DTSTART;TZID=America/New_York:20260308T023000").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidDateTime);
}
