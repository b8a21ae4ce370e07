use crate::meter_reading::MeterReading;
use serde_derive::Serialize;

/// A single value written to a host capability channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapabilityValue {
    pub id: &'static str,
    pub value: f64,
}

/// Net momentary power in W, negative while exporting.
pub fn net_power(reading: &MeterReading) -> f64 {
    reading.momentary_power_import - reading.momentary_power_export
}

pub fn total_current(reading: &MeterReading) -> f64 {
    reading.current_l1 + reading.current_l2 + reading.current_l3
}

/// Maps a reading onto the sixteen capability channels of a P1ib device.
pub fn capability_values(reading: &MeterReading) -> Vec<CapabilityValue> {
    let channels = [
        ("measure_signal_strength", reading.rssi),
        ("measure_power", net_power(reading)),
        ("measure_power.import", reading.momentary_power_import),
        ("measure_power.export", reading.momentary_power_export),
        ("meter_power.imported", reading.active_energy_import),
        ("meter_power.exported", reading.active_energy_export),
        ("measure_current", total_current(reading)),
        ("measure_current.l1", reading.current_l1),
        ("measure_current.l2", reading.current_l2),
        ("measure_current.l3", reading.current_l3),
        ("measure_voltage.l1", reading.voltage_l1),
        ("measure_voltage.l2", reading.voltage_l2),
        ("measure_voltage.l3", reading.voltage_l3),
        ("measure_power.l1", reading.power_l1),
        ("measure_power.l2", reading.power_l2),
        ("measure_power.l3", reading.power_l3),
    ];
    channels
        .into_iter()
        .map(|(id, value)| CapabilityValue { id, value })
        .collect()
}
