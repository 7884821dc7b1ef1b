use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::{Handle, Sentences};

fn handle() -> Handle {
    Handle::new(Arc::new(Sentences::default()))
}

/// Parses a sentence into a fresh store and writes it back.
fn roundtrip(sentence: &str) -> (Handle, String) {
    let mut handle = handle();
    let header = handle
        .parse(sentence)
        .unwrap_or_else(|e| panic!("parsing {sentence}: {e}"));
    let written = handle
        .write_sentence(&header.talker, &header.sentence)
        .unwrap_or_else(|e| panic!("writing {sentence}: {e}"));

    (handle, written)
}

fn verify_sentence(sentence: &str) -> Handle {
    let (handle, written) = roundtrip(sentence);
    assert_eq!(written, sentence);
    handle
}

#[test]
fn test_aam() {
    verify_sentence("$GPAAM,A,A,0.10,N,WPTNME*32");
}

#[test]
fn test_apa() {
    verify_sentence("$GPAPA,A,A,8.30,L,M,V,V,11.7,T,Turning Track to Ijmuiden 1*1B");
    verify_sentence("$GPAPA,A,A,8.99,L,M,V,V,11.7,T,Turning Track to Ijmuiden 1*18");
    verify_sentence("$GPAPA,A,A,9.78,L,M,V,V,11.7,T,Turning Track to Ijmuiden 1*16");
    verify_sentence("$GPAPA,A,A,10.35,L,M,V,V,11.7,T,Turning Track to Ijmuiden 1*27");
}

#[test]
fn test_apb() {
    verify_sentence("$GPAPB,A,A,0.02617,R,N,V,V,210.0,T,Vlissingen,236.6,T,236.6,T,D*5D");
    verify_sentence("$GPAPB,A,A,0.02620,R,N,V,V,210.0,T,Vlissingen,236.7,T,236.7,T,D*59");
    verify_sentence("$GPAPB,A,A,0.02003,R,N,V,V,210.0,T,Vlissingen,227.6,T,227.6,T,D*5E");
    verify_sentence("$GPAPB,A,A,0.00536,R,N,V,V,210.0,T,Vlissingen,213.4,T,213.4,T,D*5F");
    let handle = verify_sentence("$GPAPB,A,A,5,L,N,V,V,359.,T,1,359.1,T,6,T,A*7C");

    assert_eq!(handle.get("xte"), "L5N");
    assert_eq!(handle.get("bearing_origin_to_waypt"), "359.,T");
    assert_eq!(handle.get("waypt_id"), "1");
}

#[test]
fn test_hdm() {
    let handle = verify_sentence("$HCHDM,172.5,M*28");
    assert_eq!(handle.get("hdm"), "172.5,M");
}

#[test]
fn test_hdg_skips_unbound_fields() {
    let handle = verify_sentence("$HCHDG,,,,0.7,E*00");
    assert_eq!(handle.get("mag_var"), "0.7");
    assert_eq!(handle.get_all().len(), 1);
}

#[test]
fn test_rmc() {
    verify_sentence("$GPRMC,,A,5125.1974,N,00043.4154,W,0.12,360,,0.65,E,A,V*63");
    verify_sentence("$GPRMC,163354.17,A,5222.5109,N,00502.8805,E,4.5,271.1,130319,,,D,V*24");
    verify_sentence("$GPRMC,163355.67,A,5222.5110,N,00502.8773,E,4.5,272.3,130319,,,D,V*25");
    verify_sentence("$GPRMC,163400.19,A,5222.5111,N,00502.8679,E,4.4,272.6,130319,,,D,V*25");
    verify_sentence("$GPRMC,163401.70,A,5222.5111,N,00502.8649,E,4.4,272.1,130319,,,D,A*38");
    verify_sentence("$GNRMC,001031.00,A,4404.1399,N,12118.8602,W,0.146,,100117,,,A,*57");

    let handle = verify_sentence(
        "$GPRMC,110910.59,A,5047.3986,N,00054.6007,W,0.08,0.19,150920,0.24,W,D,V*75",
    );
    assert_eq!(handle.get("fix_time"), "11:09:10.59");
    assert_eq!(handle.get("fix_date"), "2020-09-15");
    assert_eq!(handle.get("position"), "50° 47.3986'N, 000° 54.6007'W");
    assert_eq!(handle.get("mag_var"), "-0.24");
    assert_eq!(handle.message_time().unix_timestamp(), 1_600_168_150);
}

#[test]
fn test_zda() {
    let mut handle = handle();

    handle.parse("$GPZDA,110910.59,15,09,2020,00,00*6F").unwrap();
    assert_eq!(handle.get("datetime"), "2020-09-15T11:09:10.59+00:00");

    handle.parse("$GPZDA,110910.59,15,09,21,01,40*69").unwrap();
    assert_eq!(handle.get("datetime"), "2021-09-15T11:09:10.59+01:40");

    verify_sentence("$GPZDA,110910.59,15,09,2020,01,30*6D");
    let handle = verify_sentence("$GPZDA,110910.59,15,09,2020,-01,-30*6D");
    assert_eq!(handle.get("datetime"), "2020-09-15T11:09:10.59-01:30");
}

#[test]
fn test_split_zda_tables() {
    let sentences = Arc::new(
        Sentences::new()
            .with_format("zda", ["time", "day", "month", "year", "tz"])
            .with_format("dpt", ["dbt", "toff"])
            .with_variable("time", "hhmmss.ss")
            .with_variable("day", "DD_day")
            .with_variable("month", "DD_month")
            .with_variable("year", "DD_year")
            .with_variable("tz", "tz_h,tz_m")
            .with_variable("dbt", "")
            .with_variable("toff", ""),
    );

    let mut first = Handle::new(Arc::clone(&sentences));
    first.parse("$GPZDA,110910.59,15,09,2020,01,30*6D").unwrap();
    assert_eq!(first.get("time"), "11:09:10.59");
    assert_eq!(
        (first.get("day"), first.get("month"), first.get("year")),
        ("15", "09", "2020")
    );
    assert_eq!(first.get("tz"), "+01:30");
    assert_eq!(first.message_time().unix_timestamp(), 1_600_162_750);

    let second = Handle::new(Arc::clone(&sentences));
    assert!(second.get_all().is_empty());
    assert!(second.all_update_times().is_empty());
    assert!(!first.get_all().is_empty());
    assert!(!first.all_update_times().is_empty());

    let mut third = Arc::clone(&sentences).make_handle();
    third.parse("$GPZDA,120910.59,15,09,2020,01,30*6E").unwrap();
    assert_eq!(third.get("time"), "12:09:10.59");
    assert_eq!(first.get("time"), "11:09:10.59");

    let mut fourth = Arc::clone(&sentences).make_handle();
    fourth.parse("$GPZDA,130910.59,15,09,2020,01,30*6F").unwrap();
    assert_eq!(fourth.get("time"), "13:09:10.59");

    let decoded = sentences.decode("$SDDPT,2.8,0.5").unwrap();
    assert_eq!(decoded.values["dbt"], "");
    assert_eq!(decoded.values["toff"], "");
}

#[test]
fn test_prefixed_variables() {
    let mut handle =
        verify_sentence("$GPRMC,163400.19,A,5222.5111,N,00502.8679,E,4.4,272.6,130319,,,D,V*25");

    let sentence = "$GPRMC,163354.17,A,5222.5109,N,00502.8805,E,4.5,271.1,130319,,,D,V*24";
    let header = handle.parse_prefixed(sentence, "test_").unwrap();
    let written = handle
        .write_sentence_prefixed(&header.talker, &header.sentence, "test_")
        .unwrap();
    assert_eq!(written, sentence);

    assert_eq!(handle.get("test_fix_time"), "16:33:54.17");
    assert_eq!(handle.get("fix_time"), "16:34:00.19");
}

#[test]
fn test_blank_messages() {
    verify_sentence("$GPRMC,,,,,,,,,,,,,*67");
    verify_sentence("$HCHDM,,*4A");
    verify_sentence("$GPAPB,,,,,,,,,,,,,,,*68");
    verify_sentence("$GPAPA,,,,,,,,,,*47");
    verify_sentence("$GPAAM,,,,,*76");
}

#[test]
fn test_short_seconds_are_normalized() {
    let (_, written) = roundtrip("$GPZDA,113156.3,22,02,2024,00,00*52");
    assert_eq!(written, "$GPZDA,113156.30,22,02,2024,00,00*62");

    let (handle, written) =
        roundtrip("$GPRMC,113157.3,A,5125.1974,N,00043.4154,W,0.12,360,220224,0.65,E,A,V*7A");
    assert_eq!(
        written,
        "$GPRMC,113157.30,A,5125.1974,N,00043.4154,W,0.12,360,220224,0.65,E,A,V*4A"
    );
    assert_eq!(handle.get("fix_time"), "11:31:57.30");
}

#[test]
fn test_undefined_sentence_is_ignored() {
    let mut handle = handle();

    let header = handle
        .parse("$GPGGA,113157.3,5125.1974,N,00043.4154,W,1,14,,126.8,M,,M,,*7E")
        .unwrap();
    assert_eq!(header.talker, "GP");
    assert_eq!(header.sentence, "gga");
    assert!(handle.get_all().is_empty());
    assert!(handle.write_sentence("GP", "gga").is_err());
}

#[test]
fn test_sentence_ids_are_case_insensitive() {
    let (handle, _) = roundtrip("$HCHDM,172.5,M*28");
    assert_eq!(handle.write_sentence("hc", "HDM").unwrap(), "$HCHDM,172.5,M*28");
}
