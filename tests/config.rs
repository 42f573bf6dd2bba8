use stravex::config::parse_utc_offset;

#[test]
fn parses_signed_offsets() {
    assert_eq!(
        parse_utc_offset("+02:00").map(|o| o.local_minus_utc()),
        Ok(7_200)
    );
    assert_eq!(
        parse_utc_offset("-05:30").map(|o| o.local_minus_utc()),
        Ok(-19_800)
    );
    assert_eq!(
        parse_utc_offset("+00:00").map(|o| o.local_minus_utc()),
        Ok(0)
    );
}

#[test]
fn parses_bare_hours() {
    assert_eq!(parse_utc_offset("3").map(|o| o.local_minus_utc()), Ok(10_800));
    assert_eq!(
        parse_utc_offset("-7").map(|o| o.local_minus_utc()),
        Ok(-25_200)
    );
}

#[test]
fn rejects_malformed_offsets() {
    assert!(parse_utc_offset("").is_err());
    assert!(parse_utc_offset("abc").is_err());
    assert!(parse_utc_offset("+25:00").is_err());
    assert!(parse_utc_offset("+02:75").is_err());
    assert!(parse_utc_offset("--5").is_err());
}
