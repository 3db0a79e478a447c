#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use packing_list::core::publisher::{public_object_url, S3_DOMAIN};
use packing_list::core::Storage;
use packing_list::utils::error::Result;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const APP_ID: &str = "appXYZ";
pub const SECRET_KEY: &str = "keyABC";
pub const BUCKET: &str = "packing-lists";

/// S3 的替身：檔案存在記憶體中
#[derive(Clone, Default)]
pub struct MemoryStorage {
    pub files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    pub writes: Arc<Mutex<usize>>,
}

impl Storage for MemoryStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        *self.writes.lock().unwrap() += 1;
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), data.to_vec());
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> Result<String> {
        public_object_url(BUCKET, S3_DOMAIN, path)
    }
}

fn record(id: &str, fields: Value) -> Value {
    json!({ "id": id, "createdTime": "2024-03-01T00:00:00.000Z", "fields": fields })
}

fn mock_get<'a>(server: &'a MockServer, path: &str, body: Value) -> Mock<'a> {
    let path = path.to_string();
    server.mock(move |when, then| {
        when.method(GET)
            .path_contains(path.as_str())
            .header("Authorization", format!("Bearer {}", SECRET_KEY));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    })
}

/// One shipment group `rec123` holding one shipment with SKU A (ship 10,
/// case 2) and SKU B (ship 5, case 1).
pub fn seed_airtable(server: &MockServer) -> Mock<'_> {
    let group = mock_get(
        server,
        "/ShipmentGroup/rec123",
        record(
            "rec123",
            json!({
                "DomesticShipments": ["recDS1"],
                "Cosignee Name": "ACME Trading",
                "PackingLists Generated": [{ "id": "att1", "url": "https://old.xlsx" }]
            }),
        ),
    );
    mock_get(
        server,
        "/recDS1",
        record(
            "recDS1",
            json!({
                "FCID": ["recFC1"],
                "LineItems": ["recLI1", "recLI2"],
                "FBA Shipment ID": "FBA15ABC",
                "AMZReferenceID": "3K9"
            }),
        ),
    );
    mock_get(
        server,
        "/FCList/recFC1",
        record(
            "recFC1",
            json!({
                "FCID": "ONT8",
                "FCAddress": "24300 Nandina Ave, Moreno Valley, CA 92551",
                "FacilityCountry": "US"
            }),
        ),
    );
    for (id, sku, ship_qty, case_qty) in [("recLI1", "A", 10, 2), ("recLI2", "B", 5, 1)] {
        mock_get(
            server,
            &format!("/DomesticShipmentLineItem/{}", id),
            record(
                id,
                json!({
                    "SKU": [format!("recSKU{}", sku)],
                    "PackagingProfile": ["recPP1"],
                    "ShipQuantity": ship_qty,
                    "CaseQty": case_qty
                }),
            ),
        );
        mock_get(
            server,
            &format!("/SKUS/recSKU{}", sku),
            record(
                &format!("recSKU{}", sku),
                json!({ "SKU": sku, "FNSKU": format!("X00{}", sku) }),
            ),
        );
    }
    mock_get(
        server,
        "/PackagingProfile/recPP1",
        record(
            "recPP1",
            json!({
                "UnitsPerCarton": 5,
                "CartonLengthCM": 50,
                "CartonWidthCM": 40,
                "CartonHeightCM": 30,
                "CartonWeightKG": 12.5
            }),
        ),
    );
    group
}
