//! The XML form of a [`Bandwidth`].
//!
//! ```xml
//! <bandwidth>
//!   <inbound average="1000" peak="5000" burst="5120"/>
//!   <outbound average="128" peak="256" burst="256"/>
//! </bandwidth>
//! ```
//!
//! One element per present direction, one attribute per set field. Unset fields are never
//! written, and an attribute value of `0` reads back as unset.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};
use crate::rate::{Bandwidth, Rate};

const BANDWIDTH: &str = "bandwidth";
const INBOUND: &str = "inbound";
const OUTBOUND: &str = "outbound";

const AVERAGE: &str = "average";
const PEAK: &str = "peak";
const FLOOR: &str = "floor";
const BURST: &str = "burst";

/// Serializes `bandwidth` to its XML form. An absent specification produces an empty string.
pub fn format(bandwidth: Option<&Bandwidth>) -> Result<String> {
    let Some(bandwidth) = bandwidth else {
        return Ok(String::new());
    };

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Start(BytesStart::new(BANDWIDTH)))?;

    for (name, rate) in [(INBOUND, bandwidth.inbound()), (OUTBOUND, bandwidth.outbound())] {
        let Some(rate) = rate else { continue };

        let mut element = BytesStart::new(name);
        let fields = [
            (AVERAGE, rate.average()),
            (PEAK, rate.peak()),
            (FLOOR, rate.floor()),
            (BURST, rate.burst()),
        ];
        for (attr, value) in fields {
            if let Some(value) = value {
                element.push_attribute((attr, value.to_string().as_str()));
            }
        }

        writer.write_event(Event::Empty(element))?;
    }

    writer.write_event(Event::End(BytesEnd::new(BANDWIDTH)))?;

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Parses the XML form of a bandwidth specification.
///
/// The root element must be `<bandwidth>`, holding at most one `<inbound>` and one `<outbound>`
/// child. Attribute values must be unsigned decimal integers. Unknown elements and attributes are
/// ignored.
pub fn parse(xml: &str) -> Result<Bandwidth> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut root_seen = false;
    let mut inbound = None;
    let mut outbound = None;
    let mut depth = 0usize;

    loop {
        let (element, empty) = match reader.read_event()? {
            Event::Start(element) => (element, false),
            Event::Empty(element) => (element, true),
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                continue;
            }
            Event::Eof if depth > 0 => {
                return Err(Error::invalid("unexpected end of bandwidth document"));
            }
            Event::Eof => break,
            _ => continue,
        };

        match depth {
            0 => {
                if root_seen || element.name().as_ref() != BANDWIDTH.as_bytes() {
                    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                    return Err(Error::invalid(format!("unexpected root element <{name}>")));
                }
                root_seen = true;
            }
            1 => {
                let slot = match element.name().as_ref() {
                    name if name == INBOUND.as_bytes() => Some(&mut inbound),
                    name if name == OUTBOUND.as_bytes() => Some(&mut outbound),
                    name => {
                        tracing::debug!(
                            element = %String::from_utf8_lossy(name),
                            "ignoring unknown bandwidth element"
                        );
                        None
                    }
                };

                if let Some(slot) = slot {
                    if slot.is_some() {
                        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                        return Err(Error::invalid(format!(
                            "only one child <{name}> element allowed"
                        )));
                    }
                    *slot = Some(parse_rate(&element)?);
                }
            }
            _ => {}
        }

        if !empty {
            depth += 1;
        }
    }

    if !root_seen {
        return Err(Error::invalid("missing <bandwidth> element"));
    }

    let mut bandwidth = Bandwidth::new();
    if let Some(rate) = inbound {
        bandwidth = bandwidth.with_inbound(rate);
    }
    if let Some(rate) = outbound {
        bandwidth = bandwidth.with_outbound(rate);
    }

    Ok(bandwidth)
}

fn parse_rate(element: &BytesStart<'_>) -> Result<Rate> {
    let mut rate = Rate::new();

    for attr in element.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;

        let setter: fn(Rate, u64) -> Rate = match attr.key.as_ref() {
            key if key == AVERAGE.as_bytes() => Rate::with_average,
            key if key == PEAK.as_bytes() => Rate::with_peak,
            key if key == FLOOR.as_bytes() => Rate::with_floor,
            key if key == BURST.as_bytes() => Rate::with_burst,
            _ => continue,
        };

        let parsed = value.parse::<u64>().map_err(|_| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            Error::invalid(format!("could not convert bandwidth {key} value '{value}'"))
        })?;

        rate = setter(rate, parsed);
    }

    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::equal;

    #[test]
    fn test_format_absent() {
        assert_eq!(format(None).unwrap(), "");
    }

    #[test]
    fn test_format_omits_unset_fields() {
        let bw = Bandwidth::new()
            .with_inbound(Rate::new().with_average(1).with_peak(2).with_floor(3).with_burst(4))
            .with_outbound(Rate::new().with_average(5).with_burst(0));

        let xml = format(Some(&bw)).unwrap();

        assert!(xml.starts_with("<bandwidth>"));
        assert!(xml.ends_with("</bandwidth>"));
        assert!(xml.contains(r#"<inbound average="1" peak="2" floor="3" burst="4"/>"#));
        assert!(xml.contains(r#"<outbound average="5"/>"#));
        assert!(!xml.contains("burst=\"0\""));
    }

    #[test]
    fn test_format_skips_absent_direction() {
        let bw = Bandwidth::new().with_outbound(Rate::new().with_average(128));
        let xml = format(Some(&bw)).unwrap();

        assert!(!xml.contains(INBOUND));
        assert!(xml.contains(OUTBOUND));
    }

    #[test]
    fn test_parse() {
        let bw = parse(
            "<bandwidth>
               <inbound average='1' peak='2' burst='4'/>
               <outbound average='0' burst='7'/>
             </bandwidth>",
        )
        .unwrap();

        assert_eq!(bw.inbound(), Some(&Rate::new().with_average(1).with_peak(2).with_burst(4)));
        assert_eq!(bw.outbound(), Some(&Rate::new().with_burst(7)));
    }

    #[test]
    fn test_parse_long_form_and_unknown_children() {
        let bw = parse(
            "<bandwidth>
               <inbound average='10'></inbound>
               <extra><inbound average='99'/></extra>
             </bandwidth>",
        )
        .unwrap();

        assert_eq!(bw.inbound(), Some(&Rate::new().with_average(10)));
        assert_eq!(bw.outbound(), None);
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        let err = parse("<bandwidth><inbound average='1'/><inbound average='2'/></bandwidth>")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        for xml in [
            "<bandwidth><inbound average='fast'/></bandwidth>",
            "<bandwidth><outbound average='-1'/></bandwidth>",
            "<bandwidth><outbound peak='1.5'/></bandwidth>",
        ] {
            let err = parse(xml).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{xml}");
        }
    }

    #[test]
    fn test_parse_rejects_wrong_root() {
        assert!(matches!(parse("<qos/>").unwrap_err(), Error::InvalidArgument(_)));
        assert!(matches!(parse("").unwrap_err(), Error::InvalidArgument(_)));
    }

    #[test]
    fn test_parse_rejects_unclosed_elements() {
        for xml in [
            "<bandwidth>",
            "<bandwidth><inbound average='1'/>",
            "<bandwidth><inbound average='1'>",
        ] {
            let err = parse(xml).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{xml}");
        }
    }

    #[test]
    fn test_round_trip() {
        let bw = Bandwidth::new()
            .with_inbound(Rate::new().with_average(1000).with_peak(5000).with_floor(200))
            .with_outbound(Rate::new().with_burst(256));

        let parsed = parse(&format(Some(&bw)).unwrap()).unwrap();
        assert!(equal(Some(&parsed), Some(&bw)));

        let empty = Bandwidth::new();
        let parsed = parse(&format(Some(&empty)).unwrap()).unwrap();
        assert!(equal(Some(&parsed), Some(&empty)));
    }
}
