//! Off-the-shelf motors and battery cells the configurator offers.

use serde::Serialize;

use crate::config::{BatteryConfig, DriveConfig};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotorPreset {
    pub name: &'static str,
    pub kv: f64,
    pub mass_kg: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellPreset {
    pub name: &'static str,
    /// DC internal resistance of one cell under load (mΩ).
    pub cell_ir_mohm: f64,
    pub capacity_ah: f64,
    pub description: &'static str,
}

pub const MOTORS: &[MotorPreset] = &[
    MotorPreset {
        name: "Custom",
        kv: 190.0,
        mass_kg: 1.2,
        description: "Manual parameter entry",
    },
    MotorPreset {
        name: "TP Power 5670",
        kv: 220.0,
        mass_kg: 1.05,
        description: "Popular inrunner, 6 kW peak",
    },
    MotorPreset {
        name: "Leopard 58110",
        kv: 160.0,
        mass_kg: 1.45,
        description: "High torque, heavy",
    },
    MotorPreset {
        name: "Hobbywing 5687",
        kv: 1100.0,
        mass_kg: 0.95,
        description: "High-revving, needs a large reduction",
    },
    MotorPreset {
        name: "Turnigy SK3 6374",
        kv: 192.0,
        mass_kg: 0.85,
        description: "Cheap outrunner, runs hot",
    },
];

pub const CELLS: &[CellPreset] = &[
    CellPreset {
        name: "Custom",
        cell_ir_mohm: 2.0,
        capacity_ah: 5.0,
        description: "Manual pack resistance",
    },
    CellPreset {
        name: "Molicel P42A (21700)",
        cell_ir_mohm: 1.8,
        capacity_ah: 4.2,
        description: "45 A high-power cell",
    },
    CellPreset {
        name: "Samsung 40T (21700)",
        cell_ir_mohm: 2.5,
        capacity_ah: 4.0,
        description: "Balanced, 35 A",
    },
    CellPreset {
        name: "GNB LiPo HV (High C)",
        cell_ir_mohm: 0.8,
        capacity_ah: 6.0,
        description: "Very low resistance, short cycle life",
    },
];

pub fn motor(name: &str) -> Option<&'static MotorPreset> {
    MOTORS.iter().find(|m| m.name.eq_ignore_ascii_case(name))
}

pub fn cell(name: &str) -> Option<&'static CellPreset> {
    CELLS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

impl MotorPreset {
    pub fn apply_to_drive(&self, drive: &mut DriveConfig) {
        drive.kv = self.kv;
    }
}

impl CellPreset {
    /// Series pack resistance for the battery's current cell count.
    pub fn apply_to_battery(&self, battery: &mut BatteryConfig) {
        battery.internal_resistance_mohm = self.cell_ir_mohm * battery.cell_count as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_preset_scales_with_cell_count() {
        let mut battery = BatteryConfig { cell_count: 12, internal_resistance_mohm: 0.0 };
        cell("molicel p42a (21700)").unwrap().apply_to_battery(&mut battery);
        assert!((battery.internal_resistance_mohm - 21.6).abs() < 1e-9);
    }

    #[test]
    fn test_motor_lookup() {
        let mut drive = DriveConfig::default();
        motor("Leopard 58110").unwrap().apply_to_drive(&mut drive);
        assert_eq!(drive.kv, 160.0);
        assert!(motor("unknown").is_none());
    }
}
