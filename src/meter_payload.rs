use serde_derive::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Position of the current value inside the ten element OBIS sequence.
pub const VALUE_INDEX: usize = 9;

/// Device metadata from the `info` object.
///
/// Fields are read one by one; a field with an unexpected type reads as
/// `None` and leaves the others untouched.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct MeterInfo {
    pub ip: Option<String>,
    pub mac: Option<String>,
    pub uptime: Option<f64>,
    pub mqtt_state: Option<String>,
    pub rssi: Option<f64>,
    pub tx: Option<f64>,
    pub wifi_conn_cnt: Option<f64>,
    #[serde(rename = "failCnt")]
    pub fail_cnt: Option<f64>,
    #[serde(rename = "okCnt")]
    pub ok_cnt: Option<f64>,
    #[serde(rename = "resetCnt")]
    pub reset_cnt: Option<f64>,
    pub meter: Option<String>,
    pub mode: Option<String>,
}

impl MeterInfo {
    pub fn from_object(info: &Map<String, Value>) -> Self {
        let text = |key: &str| info.get(key).and_then(Value::as_str).map(str::to_string);
        let number = |key: &str| info.get(key).and_then(Value::as_f64);

        Self {
            ip: text("ip"),
            mac: text("mac"),
            uptime: number("uptime"),
            mqtt_state: text("mqtt_state"),
            rssi: number("rssi"),
            tx: number("tx"),
            wifi_conn_cnt: number("wifi_conn_cnt"),
            fail_cnt: number("failCnt"),
            ok_cnt: number("okCnt"),
            reset_cnt: number("resetCnt"),
            meter: text("meter"),
            mode: text("mode"),
        }
    }
}

/// `/meterData` in the current firmware layout: OBIS code -> values.
///
/// Only the current value (index 9) of each sequence is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFormatData {
    pub values: HashMap<String, f64>,
    pub last_ok_interval: f64,
    pub info: MeterInfo,
}

/// `/meterData` in the legacy layout: group -> `obis` -> code -> `{v: values}`.
#[derive(Debug, Clone, PartialEq)]
pub struct OldFormatData {
    pub groups: Vec<HashMap<String, f64>>,
    pub info: Option<MeterInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeterPayload {
    NewFormat(NewFormatData),
    OldFormat(OldFormatData),
    Unknown,
}

impl MeterPayload {
    /// Classifies a decoded `/meterData` document.
    ///
    /// Only the first entry of `d` is inspected; the device never mixes
    /// layouts within one document. Anything unrecognised is `Unknown`.
    pub fn classify(document: &Value) -> Self {
        let Some(d) = document.get("d").and_then(Value::as_object) else {
            return MeterPayload::Unknown;
        };
        let Some((_, first)) = d.iter().next() else {
            return MeterPayload::Unknown;
        };

        if first.is_array() {
            return Self::classify_new(document, d);
        }
        if first.get("obis").is_some_and(Value::is_object) {
            return Self::classify_old(document, d);
        }
        MeterPayload::Unknown
    }

    fn classify_new(document: &Value, d: &Map<String, Value>) -> Self {
        let Some(last_ok_interval) = document.get("last_ok_interval").and_then(Value::as_f64)
        else {
            return MeterPayload::Unknown;
        };
        let Some(info) = document.get("info").and_then(Value::as_object) else {
            return MeterPayload::Unknown;
        };

        MeterPayload::NewFormat(NewFormatData {
            values: current_values(d.iter()),
            last_ok_interval,
            info: MeterInfo::from_object(info),
        })
    }

    fn classify_old(document: &Value, d: &Map<String, Value>) -> Self {
        let groups = d
            .values()
            .filter_map(|group| group.get("obis").and_then(Value::as_object))
            .map(|obis| {
                current_values(
                    obis.iter()
                        .filter_map(|(code, wrapper)| wrapper.get("v").map(|v| (code, v))),
                )
            })
            .collect();
        let info = document
            .get("info")
            .and_then(Value::as_object)
            .map(MeterInfo::from_object);

        MeterPayload::OldFormat(OldFormatData { groups, info })
    }

    /// Tolerant extraction: the current value for `obis`, or 0 when the code
    /// is absent, its sequence is too short, or the payload is `Unknown`.
    pub fn extract_value(&self, obis: &str) -> f64 {
        match self {
            MeterPayload::NewFormat(data) => data.values.get(obis).copied().unwrap_or(0.0),
            MeterPayload::OldFormat(data) => data
                .groups
                .iter()
                .find_map(|group| group.get(obis).copied())
                .unwrap_or(0.0),
            MeterPayload::Unknown => 0.0,
        }
    }

    pub fn info(&self) -> Option<&MeterInfo> {
        match self {
            MeterPayload::NewFormat(data) => Some(&data.info),
            MeterPayload::OldFormat(data) => data.info.as_ref(),
            MeterPayload::Unknown => None,
        }
    }

    pub fn rssi(&self) -> Option<f64> {
        self.info().and_then(|info| info.rssi)
    }
}

// Entries without a numeric value at VALUE_INDEX are dropped here and later
// read back as field misses.
fn current_values<'a>(
    entries: impl Iterator<Item = (&'a String, &'a Value)>,
) -> HashMap<String, f64> {
    entries
        .filter_map(|(code, values)| {
            let value = values.as_array()?.get(VALUE_INDEX)?.as_f64()?;
            Some((code.clone(), value))
        })
        .collect()
}
