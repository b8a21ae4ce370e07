/// Semantic meter fields and the OBIS code the P1ib reports each one under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObisField {
    MomentaryPowerImport,
    MomentaryPowerExport,
    ActiveEnergyImport,
    ActiveEnergyExport,
    VoltageL1,
    VoltageL2,
    VoltageL3,
    CurrentL1,
    CurrentL2,
    CurrentL3,
    PowerImportL1,
    PowerImportL2,
    PowerImportL3,
    PowerExportL1,
    PowerExportL2,
    PowerExportL3,
}

impl ObisField {
    pub const ALL: [ObisField; 16] = [
        ObisField::MomentaryPowerImport,
        ObisField::MomentaryPowerExport,
        ObisField::ActiveEnergyImport,
        ObisField::ActiveEnergyExport,
        ObisField::VoltageL1,
        ObisField::VoltageL2,
        ObisField::VoltageL3,
        ObisField::CurrentL1,
        ObisField::CurrentL2,
        ObisField::CurrentL3,
        ObisField::PowerImportL1,
        ObisField::PowerImportL2,
        ObisField::PowerImportL3,
        ObisField::PowerExportL1,
        ObisField::PowerExportL2,
        ObisField::PowerExportL3,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ObisField::MomentaryPowerImport => "1-0:1.7.0",
            ObisField::MomentaryPowerExport => "1-0:2.7.0",
            ObisField::ActiveEnergyImport => "1-0:1.8.0",
            ObisField::ActiveEnergyExport => "1-0:2.8.0",
            ObisField::VoltageL1 => "1-0:32.7.0",
            ObisField::VoltageL2 => "1-0:52.7.0",
            ObisField::VoltageL3 => "1-0:72.7.0",
            ObisField::CurrentL1 => "1-0:31.7.0",
            ObisField::CurrentL2 => "1-0:51.7.0",
            ObisField::CurrentL3 => "1-0:71.7.0",
            ObisField::PowerImportL1 => "1-0:21.7.0",
            ObisField::PowerImportL2 => "1-0:41.7.0",
            ObisField::PowerImportL3 => "1-0:61.7.0",
            ObisField::PowerExportL1 => "1-0:22.7.0",
            ObisField::PowerExportL2 => "1-0:42.7.0",
            ObisField::PowerExportL3 => "1-0:62.7.0",
        }
    }

    /// Power values arrive in kW and are converted to W after extraction.
    pub fn is_kilo_scaled(self) -> bool {
        matches!(
            self,
            ObisField::MomentaryPowerImport
                | ObisField::MomentaryPowerExport
                | ObisField::PowerImportL1
                | ObisField::PowerImportL2
                | ObisField::PowerImportL3
                | ObisField::PowerExportL1
                | ObisField::PowerExportL2
                | ObisField::PowerExportL3
        )
    }
}
