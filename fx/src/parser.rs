//! Parsing of the euro reference-rate XML feed.
//!
//! The feed nests three levels of `Cube` elements under a `gesmes:Envelope`:
//!
//! ```xml
//! <Cube>
//!   <Cube time="2023-01-02">
//!     <Cube currency="USD" rate="1.0683"/>
//!   </Cube>
//! </Cube>
//! ```
//!
//! Every rate is quoted as units of currency per one euro.

use refrates_common::{parse_date, Currency, DateRange};
use serde::Deserialize;
use tracing::debug;

use crate::error::{FxError, FxResult};
use crate::series::RateSeries;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Deserialize, Debug)]
struct XmlEnvelope {
    #[serde(rename = "$value", default)]
    entries: Vec<XmlEnvelopeEntry>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug)]
enum XmlEnvelopeEntry {
    #[serde(rename = "subject")]
    Subject(String),
    #[serde(rename = "Sender")]
    Sender(XmlSender),
    Cube(XmlOuterCube),
}

#[derive(Deserialize, Debug)]
struct XmlSender {
    #[serde(rename = "name", default)]
    _name: String,
}

#[derive(Deserialize, Debug)]
struct XmlOuterCube {
    #[serde(rename = "$value", default)]
    days: Vec<XmlDayCube>,
}

#[derive(Deserialize, Debug)]
struct XmlDayCube {
    time: String,
    #[serde(rename = "$value", default)]
    rates: Vec<XmlRateCube>,
}

#[derive(Deserialize, Debug)]
struct XmlRateCube {
    currency: String,
    rate: String,
}

/// Parse a feed document into EUR-relative rates for the dates in `range`.
///
/// Every emitted date also carries `EUR -> 1.0`. Dates outside `range` are
/// dropped.
pub fn parse_series(document: &[u8], range: &DateRange) -> FxResult<RateSeries> {
    let document = document.strip_prefix(UTF8_BOM).unwrap_or(document);

    let envelope: XmlEnvelope = serde_xml_rs::from_reader(document)
        .map_err(|e| FxError::Parse(format!("{:?}", e)))?;

    let outer = envelope
        .entries
        .into_iter()
        .find_map(|entry| match entry {
            XmlEnvelopeEntry::Cube(cube) => Some(cube),
            _ => None,
        })
        .ok_or_else(|| FxError::Parse("document has no Cube element".to_string()))?;

    let total_days = outer.days.len();
    let mut series = RateSeries::new();

    for day in outer.days {
        let date = parse_date(&day.time)
            .map_err(|_| FxError::Parse(format!("invalid date stamp '{}'", day.time)))?;
        if !range.contains(date) {
            continue;
        }

        let rates = series.day_mut(date);
        for cube in day.rates {
            let rate = parse_rate(&cube.rate).ok_or_else(|| {
                FxError::Parse(format!(
                    "invalid rate '{}' for {} on {}",
                    cube.rate, cube.currency, day.time
                ))
            })?;
            rates.insert(Currency::new(cube.currency.trim()), rate);
        }
        rates.insert(Currency::eur(), 1.0);
    }

    debug!(
        range = %range,
        days_in_document = total_days,
        days_in_range = series.len(),
        "Parsed feed document"
    );

    Ok(series)
}

fn parse_rate(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite() && *rate >= 0.0)
}
