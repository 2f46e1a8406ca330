//! XES import for [`EventLog`]

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::bufread::GzDecoder;
use quick_xml::escape::unescape;
use quick_xml::events::BytesStart;
use quick_xml::Error as QuickXMLError;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use super::event_log_struct::{Attribute, AttributeValue, Event, Trace};
use crate::timestamp::parse_timestamp;
use crate::EventLog;

///
/// Error encountered while parsing XES
///
#[derive(Debug, Clone)]
pub enum XESParseError {
    /// An attribute was encountered outside an open `<log>` tag
    AttributeOutsideLog,
    /// There is no top-level `<log>`
    NoTopLevelLog,
    /// Parsing error: Expected to have a previously constructed event available
    MissingLastEvent,
    /// Parsing error: Expected to have a previously constructed trace available
    MissingLastTrace,
    /// IO error
    IOError(std::rc::Rc<std::io::Error>),
    /// XML error (e.g., incorrect XML format)
    XMLParsingError(QuickXMLError),
}

impl std::fmt::Display for XESParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse XES: {:?}", self)
    }
}

impl std::error::Error for XESParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            XESParseError::IOError(e) => Some(e.as_ref()),
            XESParseError::XMLParsingError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for XESParseError {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(std::rc::Rc::new(e))
    }
}

impl From<QuickXMLError> for XESParseError {
    fn from(e: QuickXMLError) -> Self {
        Self::XMLParsingError(e)
    }
}

///
/// Options for XES import
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct XESImportOptions {
    /// Optional custom date format tried first when parsing `<date>` values
    pub date_format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    None,
    Log,
    Trace,
    Event,
}

fn get_attribute_string(t: &BytesStart<'_>, key: &'static str) -> String {
    if let Ok(Some(attr)) = t.try_get_attribute(key) {
        return String::from_utf8_lossy(&attr.value).to_string();
    }
    String::new()
}

fn parse_attribute_from_tag(t: &BytesStart<'_>, options: &XESImportOptions) -> Option<Attribute> {
    let key = get_attribute_string(t, "key");
    let value = get_attribute_string(t, "value");
    let attribute_val: AttributeValue = match t.name().as_ref() {
        b"string" => AttributeValue::String(
            unescape(value.as_str())
                .unwrap_or(value.as_str().into())
                .into(),
        ),
        b"date" => match parse_timestamp(&value, options.date_format.as_deref()) {
            Some(dt) => AttributeValue::Date(dt),
            // Unparseable timestamps become absent values (per-record recoverable)
            None => AttributeValue::None(),
        },
        b"int" => match value.parse::<i64>() {
            Ok(n) => AttributeValue::Int(n),
            Err(_) => AttributeValue::None(),
        },
        b"float" => match value.parse::<f64>() {
            Ok(f) => AttributeValue::Float(f),
            Err(_) => AttributeValue::None(),
        },
        b"boolean" => match value.parse::<bool>() {
            Ok(b) => AttributeValue::Boolean(b),
            Err(_) => AttributeValue::None(),
        },
        _ => return None,
    };
    Some(Attribute::new(key, attribute_val))
}

///
/// Import an [`EventLog`] from an XES XML reader
///
pub fn import_xes<R: BufRead>(
    reader: R,
    options: XESImportOptions,
) -> Result<EventLog, XESParseError> {
    let mut reader = Reader::from_reader(reader);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut log = EventLog::new();
    let mut current_trace: Option<Trace> = None;
    let mut current_event: Option<Event> = None;
    let mut mode = Mode::None;
    let mut encountered_log = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(t)) => match t.name().as_ref() {
                b"log" => {
                    encountered_log = true;
                    mode = Mode::Log;
                }
                b"trace" => {
                    if !encountered_log {
                        return Err(XESParseError::NoTopLevelLog);
                    }
                    current_trace = Some(Trace::new());
                    mode = Mode::Trace;
                }
                b"event" => {
                    if !encountered_log {
                        return Err(XESParseError::NoTopLevelLog);
                    }
                    current_event = Some(Event::default());
                    mode = Mode::Event;
                }
                // Non-empty attribute tags (nested attributes are not supported; children are skipped)
                _ => add_attribute(&t, &options, mode, &mut log, &mut current_trace, &mut current_event)?,
            },
            Ok(quick_xml::events::Event::Empty(t)) => match t.name().as_ref() {
                b"extension" | b"classifier" | b"global" => {}
                _ => add_attribute(&t, &options, mode, &mut log, &mut current_trace, &mut current_event)?,
            },
            Ok(quick_xml::events::Event::End(t)) => match t.name().as_ref() {
                b"event" => {
                    let event = current_event.take().ok_or(XESParseError::MissingLastEvent)?;
                    current_trace
                        .as_mut()
                        .ok_or(XESParseError::MissingLastTrace)?
                        .events
                        .push(event);
                    mode = Mode::Trace;
                }
                b"trace" => {
                    let trace = current_trace.take().ok_or(XESParseError::MissingLastTrace)?;
                    log.traces.push(trace);
                    mode = Mode::Log;
                }
                b"log" => {
                    mode = Mode::None;
                }
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(XESParseError::XMLParsingError(e)),
        }
        buf.clear();
    }
    if !encountered_log {
        return Err(XESParseError::NoTopLevelLog);
    }
    Ok(log)
}

fn add_attribute(
    t: &BytesStart<'_>,
    options: &XESImportOptions,
    mode: Mode,
    log: &mut EventLog,
    current_trace: &mut Option<Trace>,
    current_event: &mut Option<Event>,
) -> Result<(), XESParseError> {
    let Some(attribute) = parse_attribute_from_tag(t, options) else {
        return Ok(());
    };
    match mode {
        Mode::Event => current_event
            .as_mut()
            .ok_or(XESParseError::MissingLastEvent)?
            .attributes
            .push(attribute),
        Mode::Trace => current_trace
            .as_mut()
            .ok_or(XESParseError::MissingLastTrace)?
            .attributes
            .push(attribute),
        Mode::Log => log.attributes.push(attribute),
        Mode::None => return Err(XESParseError::AttributeOutsideLog),
    }
    Ok(())
}

///
/// Import an [`EventLog`] from an XES file path (auto-detecting gz compression from the file extension)
///
pub fn import_xes_path<P: AsRef<Path>>(
    path: P,
    options: XESImportOptions,
) -> Result<EventLog, XESParseError> {
    let file = File::open(path.as_ref())?;
    if path.as_ref().extension().is_some_and(|e| e == "gz") {
        let dec = GzDecoder::new(BufReader::new(file));
        import_xes(BufReader::new(dec), options)
    } else {
        import_xes(BufReader::new(file), options)
    }
}

///
/// Import an [`EventLog`] directly from a byte slice
///
pub fn import_xes_slice(slice: &[u8], options: XESImportOptions) -> Result<EventLog, XESParseError> {
    import_xes(BufReader::new(slice), options)
}
