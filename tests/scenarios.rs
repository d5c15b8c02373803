//! End-to-end checks through the public API: JSON records in, normalized
//! JSON records out.

use address_expandr::records::{parse_records, write_records, OutputFormat};
use address_expandr::{AddressNormalizer, Config, Expansion, RawRecord};
use serde_json::{json, Value};

const DIRECTORY: &str = r#"[
  {"Name": "Gesellschaft A", "Adresse": "Johann-Hittorf-Straße 8", "Branche": "Optik"},
  {"Name": "Institut B", "Adresse": "12489 Berlin ZPV, Johann-Hittorf-Straße 8", "Branche": "Forschung"},
  {"Name": "Firma C", "Adresse": "12489 Berlin Rudower Chausee 29, Haus 2.2, OG 3", "Branche": "IT"},
  {"Name": "Firma D", "Adresse": "Rudower Chaussee 2 - 4", "Branche": "Medien"},
  {"Name": "Firma E", "Adresse": "Volmerstraße 73 A-C", "Branche": "Photonik"},
  {"Name": "Firma F", "Adresse": "Max-Planck-Straße 3; Rudower Chaussee 12", "Branche": "Biotech"},
  {"Name": "Firma G", "Branche": "Unbekannt"}
]"#;

fn run(content: &str) -> Vec<Value> {
    let normalizer = AddressNormalizer::default();
    let records = parse_records(content, "Adresse").unwrap();
    let normalized: Vec<_> = records.iter().flat_map(|r| normalizer.normalize(r)).collect();

    let mut out = Vec::new();
    write_records(&mut out, &normalized, "Adresse", OutputFormat::Json).unwrap();
    serde_json::from_slice(&out).unwrap()
}

fn addresses_of(rows: &[Value], name: &str) -> Vec<String> {
    rows.iter()
        .filter(|row| row["Name"] == name)
        .map(|row| row["Adresse"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn directory_is_normalized_and_expanded() {
    let rows = run(DIRECTORY);
    assert_eq!(rows.len(), 12);

    assert_eq!(addresses_of(&rows, "Gesellschaft A"), ["12489 Berlin Johann-Hittorf-Straße 8"]);
    assert_eq!(addresses_of(&rows, "Institut B"), ["12489 Berlin Johann-Hittorf-Straße 8"]);
    assert_eq!(addresses_of(&rows, "Firma C"), ["12489 Berlin Rudower Chaussee 29"]);
    assert_eq!(
        addresses_of(&rows, "Firma D"),
        [
            "12489 Berlin Rudower Chaussee 2",
            "12489 Berlin Rudower Chaussee 3",
            "12489 Berlin Rudower Chaussee 4",
        ]
    );
    assert_eq!(
        addresses_of(&rows, "Firma E"),
        [
            "12489 Berlin Volmerstraße 73 A",
            "12489 Berlin Volmerstraße 73 B",
            "12489 Berlin Volmerstraße 73 C",
        ]
    );
    assert_eq!(
        addresses_of(&rows, "Firma F"),
        ["12489 Berlin Max-Planck-Straße 3", "12489 Berlin Rudower Chaussee 12"]
    );
    assert_eq!(addresses_of(&rows, "Firma G"), ["12489 Berlin"]);
}

#[test]
fn other_fields_are_copied_to_every_row() {
    let rows = run(DIRECTORY);
    for row in rows.iter().filter(|row| row["Name"] == "Firma D") {
        assert_eq!(row["Branche"], json!("Medien"));
    }
    // Keys keep their original position.
    let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["Name", "Adresse", "Branche"]);
}

#[test]
fn every_row_starts_with_a_postal_code() {
    for row in run(DIRECTORY) {
        let address = row["Adresse"].as_str().unwrap();
        let (code, rest) = address.split_at(5);
        assert!(code.bytes().all(|b| b.is_ascii_digit()), "{address}");
        assert!(rest.starts_with(' '), "{address}");
    }
}

#[test]
fn configured_locality_is_used() {
    let config: Config = toml::from_str(
        r#"
[locality]
postal_code = "14469"
city = "Potsdam"

[fan_out]
max_records = 2
"#,
    )
    .unwrap();
    let normalizer = AddressNormalizer::new(&config).unwrap();

    let out = normalizer.normalize(&RawRecord::new("Amundsenstraße 1 - 3", "row 1"));
    // Three rows exceed the configured limit.
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].address, "14469 Potsdam Amundsenstraße 1 - 3");
    assert_eq!(out[0].expansion, Expansion::Single);
    assert_eq!(out[0].data, "row 1");

    let out = normalizer.normalize(&RawRecord::new("Amundsenstraße 1 - 2", "row 2"));
    assert_eq!(out.len(), 2);
}
