//! Wire formats for files exchanged with 1C
//!
//! Exports are written as pretty JSON, XML with a `Document` root, or
//! semicolon-separated CSV with one row per line item. Confirmation files
//! coming back from 1C are read in the same three formats.

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::domain::integration::{
  Confirmation, ExportPayload, FileFormat, ItemPayload, PartyPayload, TransportError,
};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const CSV_DELIMITER: u8 = b';';

/// Serializes `payload` for a file export
///
/// `csv_encoding` only applies to CSV; JSON and XML are always UTF-8.
pub fn encode_export(
  payload: &ExportPayload,
  format: FileFormat,
  csv_encoding: &'static Encoding,
) -> Result<Vec<u8>, TransportError> {
  match format {
    FileFormat::Json => serde_json::to_vec_pretty(payload)
      .map_err(|e| TransportError::Encoding(format!("JSON: {}", e))),
    FileFormat::Xml => encode_xml(payload).map(String::into_bytes),
    FileFormat::Csv => encode_csv(payload, csv_encoding),
  }
}

/// Parses one confirmation file
pub fn decode_confirmations(
  bytes: &[u8],
  format: FileFormat,
  csv_encoding: &'static Encoding,
) -> Result<Vec<Confirmation>, String> {
  match format {
    FileFormat::Json => decode_json(bytes),
    FileFormat::Xml => {
      let text = std::str::from_utf8(bytes).map_err(|e| format!("XML is not UTF-8: {}", e))?;
      let parsed: XmlConfirmations =
        quick_xml::de::from_str(text).map_err(|e| format!("XML: {}", e))?;
      Ok(parsed.confirmations)
    }
    FileFormat::Csv => decode_csv(bytes, csv_encoding),
  }
}

#[derive(Serialize)]
struct XmlDocument<'a> {
  #[serde(rename = "@type")]
  document_type: &'a str,
  #[serde(rename = "@object")]
  onec_object: &'a str,
  id: String,
  number: &'a str,
  date: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  due_date: Option<String>,
  seller: XmlParty<'a>,
  buyer: XmlParty<'a>,
  #[serde(rename = "Items")]
  items: XmlItems<'a>,
  subtotal: String,
  vat_rate: String,
  vat_amount: String,
  total_amount: String,
  notes: &'a str,
  export_timestamp: String,
}

#[derive(Serialize)]
struct XmlParty<'a> {
  name: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  bin: Option<&'a str>,
}

impl<'a> From<&'a PartyPayload> for XmlParty<'a> {
  fn from(party: &'a PartyPayload) -> Self {
    Self {
      name: &party.name,
      bin: party.bin.as_deref(),
    }
  }
}

#[derive(Serialize)]
struct XmlItems<'a> {
  #[serde(rename = "Item")]
  items: &'a [ItemPayload],
}

#[derive(Deserialize)]
struct XmlConfirmations {
  #[serde(rename = "Confirmation", default)]
  confirmations: Vec<Confirmation>,
}

fn encode_xml(payload: &ExportPayload) -> Result<String, TransportError> {
  let document = XmlDocument {
    document_type: &payload.document_type,
    onec_object: &payload.onec_object,
    id: payload.document_id.to_string(),
    number: &payload.document_number,
    date: payload.document_date.to_string(),
    due_date: payload.due_date.map(|d| d.to_string()),
    seller: (&payload.company_seller).into(),
    buyer: (&payload.company_buyer).into(),
    items: XmlItems {
      items: &payload.items,
    },
    subtotal: payload.subtotal.to_string(),
    vat_rate: payload.vat_rate.to_string(),
    vat_amount: payload.vat_amount.to_string(),
    total_amount: payload.total_amount.to_string(),
    notes: &payload.notes,
    export_timestamp: payload.export_timestamp.to_rfc3339(),
  };

  let body = quick_xml::se::to_string_with_root("Document", &document)
    .map_err(|e| TransportError::Encoding(format!("XML: {}", e)))?;

  Ok(format!("{}\n{}\n", XML_DECLARATION, body))
}

const CSV_HEADER: [&str; 18] = [
  "document_number",
  "document_type",
  "onec_object",
  "document_date",
  "due_date",
  "seller_name",
  "seller_bin",
  "buyer_name",
  "buyer_bin",
  "line",
  "title",
  "quantity",
  "unit_price",
  "total_price",
  "subtotal",
  "vat_rate",
  "vat_amount",
  "total_amount",
];

fn encode_csv(
  payload: &ExportPayload,
  encoding: &'static Encoding,
) -> Result<Vec<u8>, TransportError> {
  let csv_error = |e: csv::Error| TransportError::Encoding(format!("CSV: {}", e));

  let mut writer = csv::WriterBuilder::new()
    .delimiter(CSV_DELIMITER)
    .from_writer(Vec::new());
  writer.write_record(CSV_HEADER).map_err(csv_error)?;

  let document_date = payload.document_date.to_string();
  let due_date = payload
    .due_date
    .map(|d| d.to_string())
    .unwrap_or_default();
  let subtotal = payload.subtotal.to_string();
  let vat_rate = payload.vat_rate.to_string();
  let vat_amount = payload.vat_amount.to_string();
  let total_amount = payload.total_amount.to_string();

  for item in &payload.items {
    let line = item.line.to_string();
    let quantity = item.quantity.to_string();
    let unit_price = item.unit_price.to_string();
    let total_price = item.total_price.to_string();

    writer
      .write_record([
        payload.document_number.as_str(),
        payload.document_type.as_str(),
        payload.onec_object.as_str(),
        document_date.as_str(),
        due_date.as_str(),
        payload.company_seller.name.as_str(),
        payload.company_seller.bin.as_deref().unwrap_or_default(),
        payload.company_buyer.name.as_str(),
        payload.company_buyer.bin.as_deref().unwrap_or_default(),
        line.as_str(),
        item.title.as_str(),
        quantity.as_str(),
        unit_price.as_str(),
        total_price.as_str(),
        subtotal.as_str(),
        vat_rate.as_str(),
        vat_amount.as_str(),
        total_amount.as_str(),
      ])
      .map_err(csv_error)?;
  }

  let utf8 = writer
    .into_inner()
    .map_err(|e| TransportError::Encoding(format!("CSV: {}", e)))?;
  let text = String::from_utf8(utf8).map_err(|e| TransportError::Encoding(e.to_string()))?;

  let (encoded, _, unmappable) = encoding.encode(&text);
  if unmappable {
    return Err(TransportError::Encoding(format!(
      "document contains characters that {} cannot represent",
      encoding.name()
    )));
  }

  Ok(encoded.into_owned())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonConfirmations {
  List(Vec<Confirmation>),
  Wrapped { confirmations: Vec<Confirmation> },
  Single(Confirmation),
}

fn decode_json(bytes: &[u8]) -> Result<Vec<Confirmation>, String> {
  let parsed: JsonConfirmations =
    serde_json::from_slice(bytes).map_err(|e| format!("JSON: {}", e))?;

  Ok(match parsed {
    JsonConfirmations::List(list) => list,
    JsonConfirmations::Wrapped { confirmations } => confirmations,
    JsonConfirmations::Single(one) => vec![one],
  })
}

fn decode_csv(bytes: &[u8], encoding: &'static Encoding) -> Result<Vec<Confirmation>, String> {
  let (text, _, malformed) = encoding.decode(bytes);
  if malformed {
    return Err(format!("CSV is not valid {}", encoding.name()));
  }

  let mut reader = csv::ReaderBuilder::new()
    .delimiter(CSV_DELIMITER)
    .trim(csv::Trim::All)
    .from_reader(text.as_bytes());

  reader
    .deserialize::<Confirmation>()
    .map(|row| row.map_err(|e| format!("CSV: {}", e)))
    .collect()
}
