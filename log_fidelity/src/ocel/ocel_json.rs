//! OCEL 2.0 JSON import/export
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::ocel::ocel_struct::OCEL;

///
/// Import [`OCEL`] from a JSON file given by a filepath
///
/// See also [`import_ocel_json_from_slice`].
///
pub fn import_ocel_json_from_path<P: AsRef<Path>>(path: P) -> Result<OCEL, std::io::Error> {
    let reader: BufReader<File> = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

///
/// Import [`OCEL`] from a JSON byte slice
///
/// See also [`import_ocel_json_from_path`].
///
pub fn import_ocel_json_from_slice(slice: &[u8]) -> Result<OCEL, std::io::Error> {
    Ok(serde_json::from_slice(slice)?)
}

///
/// Export [`OCEL`] to a JSON file at the specified path
///
/// To import an OCEL .json file see [`import_ocel_json_from_path`] instead.
///
pub fn export_ocel_json_path<P: AsRef<Path>>(ocel: &OCEL, path: P) -> Result<(), std::io::Error> {
    let writer: BufWriter<File> = BufWriter::new(File::create(path)?);
    Ok(serde_json::to_writer_pretty(writer, ocel)?)
}

///
/// Export [`OCEL`] to JSON in a byte array ([`Vec<u8>`])
///
pub fn export_ocel_json_to_vec(ocel: &OCEL) -> Result<Vec<u8>, std::io::Error> {
    Ok(serde_json::to_vec(ocel)?)
}

///
/// Export [`OCEL`] as JSON to a writer
///
pub fn export_ocel_json<W: Write>(ocel: &OCEL, writer: W) -> Result<(), std::io::Error> {
    Ok(serde_json::to_writer(writer, ocel)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocel::ocel_struct::OCELAttributeValue;

    const OCEL_JSON: &[u8] = br#"{
        "objectTypes": [{"name": "case", "attributes": []}],
        "eventTypes": [{"name": "register", "attributes": [{"name": "amount", "type": "integer"}]}],
        "objects": [{"id": "case_c1", "type": "case", "attributes": [], "relationships": []}],
        "events": [{
            "id": "e0",
            "type": "register",
            "time": "2023-10-06T09:30:21Z",
            "attributes": [{"name": "amount", "value": 42}],
            "relationships": [{"objectId": "case_c1", "qualifier": "case"}]
        }],
        "objectRelations": []
    }"#;

    #[test]
    fn test_import_json() {
        let ocel = import_ocel_json_from_slice(OCEL_JSON).unwrap();
        assert_eq!(ocel.objects.len(), 1);
        assert_eq!(ocel.events.len(), 1);
        assert_eq!(
            ocel.events[0].attributes[0].value,
            OCELAttributeValue::Integer(42)
        );
        assert_eq!(ocel.events[0].relationships[0].object_id, "case_c1");
    }

    #[test]
    fn test_json_roundtrip() {
        let ocel = import_ocel_json_from_slice(OCEL_JSON).unwrap();
        let bytes = export_ocel_json_to_vec(&ocel).unwrap();
        let ocel2 = import_ocel_json_from_slice(&bytes).unwrap();
        assert_eq!(ocel, ocel2);
    }

    #[test]
    fn test_missing_optional_arrays_default_empty() {
        let ocel = import_ocel_json_from_slice(
            br#"{"objectTypes": [], "eventTypes": []}"#,
        )
        .unwrap();
        assert!(ocel.objects.is_empty());
        assert!(ocel.events.is_empty());
        assert!(ocel.object_relations.is_empty());
    }
}
