//! Feed payload decoding: zip → CSV → catalog records.
//!
//! The bulk feed is a zip archive holding one CSV whose first physical
//! line is a human-readable title; the real header follows it. Required
//! columns are `objid`, `name`, `ra`, `declination` — everything else is
//! upstream-defined and passes through to the record's `extra` map as
//! tagged scalars.

use std::io::Read;

use serde_json::Map;
use tns_mirror_core::{tag_scalar, CatalogRecord};

use crate::error::IngestError;

const COL_OBJID: &str = "objid";
const COL_NAME: &str = "name";
const COL_RA: &str = "ra";
const COL_DEC: &str = "declination";

/// Decompress and parse the downloaded payload.
///
/// Structural failures (not a zip, bad CSV framing, missing required
/// column) abort the whole refresh — a truncated download must never pass
/// as success. Individual rows with unparsable `objid`/`ra`/`declination`
/// are skipped with a warning; upstream occasionally ships stubs.
pub fn decode_feed(payload: &[u8]) -> Result<Vec<CatalogRecord>, IngestError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(payload))
        .map_err(|e| IngestError::Decode(format!("zip: {e}")))?;
    if archive.is_empty() {
        return Err(IngestError::Decode("zip archive has no members".to_owned()));
    }
    let mut member = archive
        .by_index(0)
        .map_err(|e| IngestError::Decode(format!("zip member: {e}")))?;
    let mut text = String::new();
    member
        .read_to_string(&mut text)
        .map_err(|e| IngestError::Decode(format!("decompress: {e}")))?;
    parse_csv(&text)
}

fn parse_csv(text: &str) -> Result<Vec<CatalogRecord>, IngestError> {
    // Skip the one-line title prefix; the header is the second line.
    let body = text.split_once('\n').map_or(text, |(_, rest)| rest);
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| IngestError::Decode(format!("csv header: {e}")))?
        .clone();

    let column = |name: &'static str| {
        headers.iter().position(|h| h == name).ok_or(IngestError::Schema(name))
    };
    let objid_at = column(COL_OBJID)?;
    let name_at = column(COL_NAME)?;
    let ra_at = column(COL_RA)?;
    let dec_at = column(COL_DEC)?;
    let fixed = [objid_at, name_at, ra_at, dec_at];

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| IngestError::Decode(format!("csv row: {e}")))?;
        let objid = row.get(objid_at).and_then(|f| f.trim().parse::<i64>().ok());
        let ra_deg = row.get(ra_at).and_then(|f| f.trim().parse::<f64>().ok());
        let dec_deg = row.get(dec_at).and_then(|f| f.trim().parse::<f64>().ok());
        let name = row.get(name_at).map(str::to_owned);
        let (Some(objid), Some(name), Some(ra_deg), Some(dec_deg)) =
            (objid, name, ra_deg, dec_deg)
        else {
            tracing::warn!(row = ?row.get(objid_at), "skipping feed row with unparsable fields");
            continue;
        };

        let mut extra = Map::new();
        for (at, field) in row.iter().enumerate() {
            if fixed.contains(&at) {
                continue;
            }
            let Some(col) = headers.get(at) else { continue };
            extra.insert(col.to_owned(), tag_scalar(field));
        }
        records.push(CatalogRecord::new(objid, name, ra_deg, dec_deg, extra));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn zip_feed(csv_text: &str) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(&mut buf);
        writer
            .start_file("tns_public_objects.csv", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(csv_text.as_bytes()).unwrap();
        writer.finish().unwrap();
        buf.into_inner()
    }

    const FEED: &str = "\
TNS public objects, generated nightly
objid,name,ra,declination,type,redshift
100,2018lwh,10.0,20.0,SN Ia,0.032
200,2018aaa,359.9995,0.0,,
";

    #[test]
    fn decodes_rows_and_passes_extras_through() {
        let records = decode_feed(&zip_feed(FEED)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].objid, 100);
        assert_eq!(records[0].name, "2018lwh");
        assert_eq!(records[0].extra["type"], "SN Ia");
        assert_eq!(records[0].extra["redshift"], 0.032);
        assert_eq!(records[1].extra["type"], serde_json::Value::Null);
        assert!((records[1].coord.ra_deg - 359.9995).abs() < 1e-12);
    }

    #[test]
    fn missing_required_column_is_a_schema_error() {
        let feed = "title line\nobjid,name,ra\n1,2018lwh,10.0\n";
        let err = decode_feed(&zip_feed(feed)).unwrap_err();
        assert!(matches!(err, IngestError::Schema("declination")), "{err}");
    }

    #[test]
    fn unparsable_rows_are_skipped_not_fatal() {
        let feed = "title\nobjid,name,ra,declination\nnot-a-number,2018lwh,10.0,20.0\n2,2018aaa,30.0,40.0\n";
        let records = decode_feed(&zip_feed(feed)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].objid, 2);
    }

    #[test]
    fn garbage_payload_is_a_decode_error() {
        let err = decode_feed(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, IngestError::Decode(_)));
    }

    #[test]
    fn empty_table_decodes_to_zero_records() {
        let feed = "title\nobjid,name,ra,declination\n";
        assert!(decode_feed(&zip_feed(feed)).unwrap().is_empty());
    }
}
