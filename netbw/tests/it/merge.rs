use netbw::{equal, minimal, parse, Bandwidth, Rate};

use crate::helpers::random_option;

#[test]
fn minimal_of_parsed_documents() {
    let a = parse(
        "<bandwidth>
           <inbound average='1000' peak='3000' burst='1024'/>
           <outbound average='1000' burst='1024'/>
         </bandwidth>",
    )
    .unwrap();
    let b = parse(
        "<bandwidth>
           <inbound average='2000' floor='500'/>
         </bandwidth>",
    )
    .unwrap();

    let expected = Bandwidth::new()
        .with_inbound(
            Rate::new().with_average(2000).with_peak(3000).with_floor(500).with_burst(1024),
        )
        .with_outbound(Rate::new().with_average(1000).with_burst(1024));

    assert_eq!(minimal(Some(&a), Some(&b)), Some(expected));
    assert_eq!(minimal(Some(&b), Some(&a)), Some(expected));
}

#[test]
fn minimal_is_commutative_and_idempotent() {
    let mut rng = rand::thread_rng();

    for _ in 0..500 {
        let a = random_option(&mut rng);
        let b = random_option(&mut rng);

        let ab = minimal(a.as_ref(), b.as_ref());
        let ba = minimal(b.as_ref(), a.as_ref());
        assert!(equal(ab.as_ref(), ba.as_ref()), "{a:?} {b:?}");

        assert!(equal(minimal(a.as_ref(), a.as_ref()).as_ref(), a.as_ref()));
        assert!(equal(minimal(a.as_ref(), None).as_ref(), a.as_ref()));
    }
}

#[test]
fn minimal_never_lowers_a_field() {
    let mut rng = rand::thread_rng();

    for _ in 0..500 {
        let a = random_option(&mut rng);
        let b = random_option(&mut rng);
        let Some(merged) = minimal(a.as_ref(), b.as_ref()) else {
            assert!(a.is_none() && b.is_none());
            continue;
        };

        for side in [&a, &b].into_iter().flatten() {
            for (rate, merged) in
                [(side.inbound(), merged.inbound()), (side.outbound(), merged.outbound())]
            {
                let Some(rate) = rate else { continue };
                let merged = merged.expect("merged direction present");

                assert!(merged.average() >= rate.average());
                assert!(merged.peak() >= rate.peak());
                assert!(merged.floor() >= rate.floor());
                assert!(merged.burst() >= rate.burst());
            }
        }
    }
}
