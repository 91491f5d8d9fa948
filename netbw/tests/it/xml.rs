use netbw::{equal, format, parse, Error};

use crate::helpers::random_bandwidth;

#[test]
fn round_trip_random() {
    let mut rng = rand::thread_rng();

    for _ in 0..500 {
        let bandwidth = random_bandwidth(&mut rng);
        let xml = format(Some(&bandwidth)).unwrap();
        let parsed = parse(&xml).unwrap();

        assert!(equal(Some(&parsed), Some(&bandwidth)), "{xml}");
    }
}

#[test]
fn format_layout() {
    let bandwidth = parse("<bandwidth><inbound average='1000' peak='5000'/></bandwidth>").unwrap();

    assert_eq!(
        format(Some(&bandwidth)).unwrap(),
        "<bandwidth>\n  <inbound average=\"1000\" peak=\"5000\"/>\n</bandwidth>"
    );
}

#[test]
fn parse_malformed() {
    for xml in [
        "<bandwidth><inbound average='1'></bandwidth>",
        "<bandwidth average='1",
        "<bandwidth>",
        "<bandwidth><inbound average='1'/>",
    ] {
        assert!(matches!(parse(xml), Err(Error::Xml(_) | Error::InvalidArgument(_))), "{xml}");
    }
}
