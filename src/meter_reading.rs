use crate::error::{P1ibError, Result};
use crate::meter_payload::MeterPayload;
use crate::obis::ObisField;
use serde_derive::{Deserialize, Serialize};

/// Normalised electrical measurements of one poll.
///
/// Powers are in W, voltages in V, currents in A and energies in kWh.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterReading {
    pub voltage_l1: f64,
    pub voltage_l2: f64,
    pub voltage_l3: f64,
    pub current_l1: f64,
    pub current_l2: f64,
    pub current_l3: f64,
    pub power_l1: f64,
    pub power_l2: f64,
    pub power_l3: f64,
    pub momentary_power_import: f64,
    pub momentary_power_export: f64,
    pub active_energy_import: f64,
    pub active_energy_export: f64,
    pub rssi: f64,
}

/// Extracts one field, converting kW to W where the field calls for it.
fn field_value(payload: &MeterPayload, field: ObisField) -> f64 {
    let raw = payload.extract_value(field.code());
    if field.is_kilo_scaled() {
        raw * 1000.0
    } else {
        raw
    }
}

/// Builds a reading from a classified payload.
///
/// Missing OBIS codes read as 0. The signal strength comes from `info.rssi`
/// and is required.
pub fn build_reading(payload: &MeterPayload) -> Result<MeterReading> {
    let value = |field| field_value(payload, field);
    let rssi = payload.rssi().ok_or(P1ibError::MissingSignalStrength)?;

    Ok(MeterReading {
        voltage_l1: value(ObisField::VoltageL1),
        voltage_l2: value(ObisField::VoltageL2),
        voltage_l3: value(ObisField::VoltageL3),
        current_l1: value(ObisField::CurrentL1),
        current_l2: value(ObisField::CurrentL2),
        current_l3: value(ObisField::CurrentL3),
        power_l1: value(ObisField::PowerImportL1) - value(ObisField::PowerExportL1),
        power_l2: value(ObisField::PowerImportL2) - value(ObisField::PowerExportL2),
        power_l3: value(ObisField::PowerImportL3) - value(ObisField::PowerExportL3),
        momentary_power_import: value(ObisField::MomentaryPowerImport),
        momentary_power_export: value(ObisField::MomentaryPowerExport),
        active_energy_import: value(ObisField::ActiveEnergyImport),
        active_energy_export: value(ObisField::ActiveEnergyExport),
        rssi,
    })
}
