//! Parsing of YouTube's timedtext caption XML.

use once_cell::sync::Lazy;
use regex::Regex;

use super::CaptionEntry;

static TEXT_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<text\b([^>/]*)>(.*?)</text>").unwrap());
static START_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bstart="([^"]*)""#).unwrap());
static DUR_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bdur="([^"]*)""#).unwrap());
static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Parse `<transcript><text start=".." dur="..">..</text></transcript>`.
///
/// Elements without text, including self-closing ones, are dropped. Entities are decoded twice because
/// YouTube escapes caption text inside already escaped XML.
pub fn parse_timedtext(xml: &str) -> Vec<CaptionEntry> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|captures| {
            let attributes = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let raw = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
            if raw.is_empty() {
                return None;
            }

            let xml_decoded = html_escape::decode_html_entities(raw);
            let stripped = MARKUP.replace_all(&xml_decoded, "");
            let text = html_escape::decode_html_entities(&stripped).into_owned();

            Some(CaptionEntry {
                text,
                start: number_attr(&START_ATTR, attributes),
                duration: number_attr(&DUR_ATTR, attributes),
            })
        })
        .collect()
}

fn number_attr(pattern: &Regex, attributes: &str) -> f64 {
    pattern
        .captures(attributes)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}
