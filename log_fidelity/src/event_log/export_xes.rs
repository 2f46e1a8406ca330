//! XES export for [`EventLog`]

use super::event_log_struct::{Attribute, AttributeValue};
use crate::EventLog;
use flate2::{write::GzEncoder, Compression};
use quick_xml::{events::BytesDecl, Writer};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

const OK: Result<(), std::io::Error> = Ok(());

///
/// Export an [`EventLog`] as XES to an XML writer
///
pub fn export_xes<W: Write>(writer: W, log: &EventLog) -> Result<(), quick_xml::Error> {
    let mut writer = Writer::new(writer);
    writer.write_event(quick_xml::events::Event::Decl(BytesDecl::new(
        "1.0",
        Some("UTF-8"),
        None,
    )))?;
    writer
        .create_element("log")
        .with_attributes(vec![
            ("xes.version", "2.0"),
            ("xmlns", "http://www.xes-standard.org/"),
        ])
        .write_inner_content(|w| {
            w.create_element("extension")
                .with_attributes(vec![
                    ("name", "Concept"),
                    ("prefix", "concept"),
                    ("uri", "http://www.xes-standard.org/concept.xesext"),
                ])
                .write_empty()?;
            w.create_element("extension")
                .with_attributes(vec![
                    ("name", "Time"),
                    ("prefix", "time"),
                    ("uri", "http://www.xes-standard.org/time.xesext"),
                ])
                .write_empty()?;
            w.create_element("extension")
                .with_attributes(vec![
                    ("name", "Organizational"),
                    ("prefix", "org"),
                    ("uri", "http://www.xes-standard.org/org.xesext"),
                ])
                .write_empty()?;
            for a in &log.attributes {
                write_xes_attribute(w, a)?;
            }
            for t in &log.traces {
                w.create_element("trace").write_inner_content(|w| {
                    for a in &t.attributes {
                        write_xes_attribute(w, a)?;
                    }
                    for e in &t.events {
                        w.create_element("event").write_inner_content(|w| {
                            for a in &e.attributes {
                                write_xes_attribute(w, a)?;
                            }
                            OK
                        })?;
                    }
                    OK
                })?;
            }
            OK
        })?;
    Ok(())
}

fn write_xes_attribute<T>(w: &mut Writer<T>, a: &Attribute) -> Result<(), std::io::Error>
where
    T: Write,
{
    let (tag_name, value): (&str, String) = match &a.value {
        AttributeValue::String(s) => ("string", s.clone()),
        AttributeValue::Date(d) => ("date", d.to_rfc3339()),
        AttributeValue::Int(i) => ("int", i.to_string()),
        AttributeValue::Float(f) => ("float", f.to_string()),
        AttributeValue::Boolean(b) => ("boolean", b.to_string()),
        // Absent values are not serialized
        AttributeValue::None() => return OK,
    };
    w.create_element(tag_name)
        .with_attributes(vec![("key", a.key.as_str()), ("value", value.as_str())])
        .write_empty()?;
    OK
}

///
/// Export an [`EventLog`] as XES to a file path
///
/// Transparently gzips the output if the path ends with `.gz`.
///
pub fn export_xes_path<P: AsRef<Path>>(log: &EventLog, path: P) -> Result<(), quick_xml::Error> {
    let file = File::create(path.as_ref())?;
    if path.as_ref().extension().is_some_and(|e| e == "gz") {
        let encoder = GzEncoder::new(BufWriter::new(file), Compression::fast());
        export_xes(encoder, log)
    } else {
        export_xes(BufWriter::new(file), log)
    }
}
