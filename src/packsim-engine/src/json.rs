// Copyright 2026 The Packsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! JSON boundary for hosts.
//!
//! A host hands over a payload naming the item types and blocked cells and
//! gets back an envelope carrying either the per-cell probability rows or an
//! error message, never both.
//!
//! # Example
//! ```no_run
//! use packsim_engine::json;
//!
//! let payload = json::Payload::from_json(
//!     r#"{"items": [{"width": 2, "height": 1, "count": 1}], "blockedCells": []}"#,
//! )?;
//! let response = json::run_payload(&payload, Default::default());
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};
use crate::config::{
    GRID_HEIGHT, GRID_WIDTH, MAX_GRID_CELLS, MAX_ITEM_COUNT, MAX_ITEM_HEIGHT, MAX_ITEM_WIDTH,
};
use crate::config::SimulationConfig;
use crate::input_err;
use crate::item::{Coords, ItemType};
use crate::probability::CellProbability;
use crate::simulation::calculate_probabilities_with_config;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PayloadItem {
    pub width: usize,
    pub height: usize,
    pub count: usize,
}

/// Blocked cell as sent by the host. Signed so that stray negative
/// coordinates decode and can be dropped instead of failing the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PayloadCoords {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub items: Vec<PayloadItem>,
    #[serde(default)]
    pub blocked_cells: Vec<PayloadCoords>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub height: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub samples: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub seed: Option<u64>,
}

/// Fully decoded engine input.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub width: usize,
    pub height: usize,
    pub items: Vec<ItemType>,
    pub blocked_cells: Vec<Coords>,
    pub config: SimulationConfig,
}

impl Payload {
    pub fn from_json(json: &str) -> Result<Payload> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check limits and convert to engine types. Payload overrides for
    /// samples and seed take precedence over `config`.
    pub fn to_request(&self, mut config: SimulationConfig) -> Result<Request> {
        let width = self.width.unwrap_or(GRID_WIDTH);
        let height = self.height.unwrap_or(GRID_HEIGHT);
        if width == 0 || height == 0 {
            return input_err!(BadGrid, format!("grid must be non-empty, got {width}x{height}"));
        }
        if width
            .checked_mul(height)
            .is_none_or(|cells| cells > MAX_GRID_CELLS)
        {
            return input_err!(
                BadGrid,
                format!("grid {width}x{height} exceeds {MAX_GRID_CELLS} cells")
            );
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (i, item) in self.items.iter().enumerate() {
            if !(1..=MAX_ITEM_WIDTH).contains(&item.width)
                || !(1..=MAX_ITEM_HEIGHT).contains(&item.height)
            {
                return input_err!(
                    BadItem,
                    format!(
                        "item {i}: {}x{} is outside 1x1..{MAX_ITEM_WIDTH}x{MAX_ITEM_HEIGHT}",
                        item.width, item.height
                    )
                );
            }
            if item.count > MAX_ITEM_COUNT {
                return input_err!(
                    BadItem,
                    format!("item {i}: count {} exceeds {MAX_ITEM_COUNT}", item.count)
                );
            }
            items.push(ItemType::new(item.width, item.height, item.count));
        }

        let blocked_cells = self
            .blocked_cells
            .iter()
            .filter_map(|c| {
                let x = usize::try_from(c.x).ok()?;
                let y = usize::try_from(c.y).ok()?;
                (x < width && y < height).then_some(Coords::new(x, y))
            })
            .collect();

        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        Ok(Request {
            width,
            height,
            items,
            blocked_cells,
            config,
        })
    }
}

/// Envelope returned to the host. Exactly one of the fields is set; both
/// are always serialized so the host can test for `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub result: Option<Vec<Vec<CellProbability>>>,
    pub error: Option<String>,
}

impl Response {
    pub fn success(rows: Vec<Vec<CellProbability>>) -> Self {
        Response {
            result: Some(rows),
            error: None,
        }
    }

    pub fn failure(err: &Error) -> Self {
        Response {
            result: None,
            error: Some(err.get_details().unwrap_or_else(|| err.to_string())),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Run the engine for a decoded request.
pub fn run_request(request: &Request) -> Result<Vec<Vec<CellProbability>>> {
    let matrix = calculate_probabilities_with_config(
        request.width,
        request.height,
        &request.items,
        &request.blocked_cells,
        request.config.clone(),
    )?;
    Ok(matrix.to_rows())
}

/// Decode, run and wrap the outcome; errors end up in the envelope.
pub fn run_payload(payload: &Payload, config: SimulationConfig) -> Response {
    match payload.to_request(config).and_then(|req| run_request(&req)) {
        Ok(rows) => Response::success(rows),
        Err(err) => Response::failure(&err),
    }
}

/// Generate the JSON Schema for the Payload type
#[cfg(feature = "schema")]
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Payload)
}
