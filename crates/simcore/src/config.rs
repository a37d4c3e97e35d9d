//! Robot configuration: the immutable input of every kernel run.
//!
//! Units follow the dashboard inputs (millimetres, milliohms, km/h on output);
//! conversion to SI happens inside the kernel.

use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, KernelError, Result};

/// Nominal LiPo cell voltage (V).
pub const CELL_NOMINAL_VOLTAGE: f64 = 3.7;
pub const MAX_CELL_COUNT: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Series cell count (S).
    pub cell_count: u32,
    /// Whole-pack internal resistance (mΩ).
    pub internal_resistance_mohm: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        BatteryConfig {
            cell_count: 12,
            internal_resistance_mohm: 20.0,
        }
    }
}

impl BatteryConfig {
    pub fn nominal_voltage(&self) -> f64 {
        self.cell_count as f64 * CELL_NOMINAL_VOLTAGE
    }

    pub fn internal_resistance_ohm(&self) -> f64 {
        self.internal_resistance_mohm / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub motor_count: u32,
    /// Motor velocity constant (rpm/V).
    pub kv: f64,
    /// Reduction between motor and wheel (X:1).
    pub gear_ratio: f64,
    pub wheel_diameter_mm: f64,
    /// Per-motor ESC current limit (A).
    pub esc_current_limit_a: f64,
    /// Tyre-to-floor friction coefficient μ.
    pub friction_coeff: f64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        DriveConfig {
            motor_count: 2,
            kv: 190.0,
            gear_ratio: 12.5,
            wheel_diameter_mm: 200.0,
            esc_current_limit_a: 60.0,
            friction_coeff: 0.7,
        }
    }
}

impl DriveConfig {
    pub fn wheel_radius_m(&self) -> f64 {
        self.wheel_diameter_mm / 1000.0 / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Whether the weapon circuit is simulated at all.
    pub active: bool,
    pub motor_count: u32,
    pub kv: f64,
    /// Reduction between weapon motor and rotor (X:1).
    pub reduction: f64,
    pub rotor_mass_kg: f64,
    pub rotor_radius_mm: f64,
    pub esc_current_limit_a: f64,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        WeaponConfig {
            active: true,
            motor_count: 1,
            kv: 150.0,
            reduction: 1.5,
            rotor_mass_kg: 28.0,
            rotor_radius_mm: 180.0,
            esc_current_limit_a: 150.0,
        }
    }
}

impl WeaponConfig {
    pub fn rotor_radius_m(&self) -> f64 {
        self.rotor_radius_mm / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorConfig {
    pub thickness_mm: f64,
    /// Share of `total_area_m2` actually plated (%).
    pub coverage_pct: f64,
    pub density_kg_m3: f64,
    /// Outer surface of the chassis that could carry armor (m²).
    pub total_area_m2: f64,
}

impl Default for ArmorConfig {
    fn default() -> Self {
        ArmorConfig {
            thickness_mm: 5.0,
            coverage_pct: 60.0,
            density_kg_m3: 2700.0,
            total_area_m2: 1.2,
        }
    }
}

/// Fixed masses that do not depend on any tunable parameter (kg).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseMasses {
    pub drive_kg: f64,
    pub electronics_kg: f64,
    pub frame_kg: f64,
}

impl Default for BaseMasses {
    fn default() -> Self {
        BaseMasses {
            drive_kg: 18.0,
            electronics_kg: 8.0,
            frame_kg: 40.0,
        }
    }
}

/// Complete robot description. `Default` is the 12S, ~104 kg reference build.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub battery: BatteryConfig,
    pub drive: DriveConfig,
    pub weapon: WeaponConfig,
    pub armor: ArmorConfig,
    pub base: BaseMasses,
}

impl RobotConfig {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Checks every bound the kernel relies on before any numeric work happens.
    ///
    /// An inactive weapon may have a zero KV or radius, but the statics still
    /// divide by its reduction, so that stays strictly positive either way.
    pub fn validate(&self) -> Result<()> {
        let b = &self.battery;
        if b.cell_count == 0 || b.cell_count > MAX_CELL_COUNT {
            return Err(KernelError::invalid(
                "battery.cell_count",
                format!("must be in [1, {MAX_CELL_COUNT}], got {}", b.cell_count),
            ));
        }
        require_non_negative("battery.internal_resistance_mohm", b.internal_resistance_mohm)?;

        let d = &self.drive;
        if d.motor_count == 0 {
            return Err(KernelError::invalid("drive.motor_count", "must be >= 1"));
        }
        require_positive("drive.kv", d.kv)?;
        require_positive("drive.gear_ratio", d.gear_ratio)?;
        require_positive("drive.wheel_diameter_mm", d.wheel_diameter_mm)?;
        require_non_negative("drive.esc_current_limit_a", d.esc_current_limit_a)?;
        require_non_negative("drive.friction_coeff", d.friction_coeff)?;

        let w = &self.weapon;
        require_non_negative("weapon.rotor_mass_kg", w.rotor_mass_kg)?;
        require_non_negative("weapon.kv", w.kv)?;
        require_positive("weapon.reduction", w.reduction)?;
        require_non_negative("weapon.rotor_radius_mm", w.rotor_radius_mm)?;
        if w.active {
            if w.motor_count == 0 {
                return Err(KernelError::invalid("weapon.motor_count", "must be >= 1 when active"));
            }
            require_positive("weapon.kv", w.kv)?;
            require_positive("weapon.rotor_mass_kg", w.rotor_mass_kg)?;
            require_positive("weapon.rotor_radius_mm", w.rotor_radius_mm)?;
            require_non_negative("weapon.esc_current_limit_a", w.esc_current_limit_a)?;
        }

        let a = &self.armor;
        require_non_negative("armor.thickness_mm", a.thickness_mm)?;
        require_non_negative("armor.density_kg_m3", a.density_kg_m3)?;
        require_non_negative("armor.total_area_m2", a.total_area_m2)?;
        require_non_negative("armor.coverage_pct", a.coverage_pct)?;
        if a.coverage_pct > 100.0 {
            return Err(KernelError::invalid(
                "armor.coverage_pct",
                format!("must be <= 100, got {}", a.coverage_pct),
            ));
        }

        require_non_negative("base.drive_kg", self.base.drive_kg)?;
        require_non_negative("base.electronics_kg", self.base.electronics_kg)?;
        require_non_negative("base.frame_kg", self.base.frame_kg)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RobotConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.battery.nominal_voltage() - 44.4).abs() < 1e-9);
        assert!((config.drive.wheel_radius_m() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_zero_gear_ratio_rejected() {
        let mut config = RobotConfig::default();
        config.drive.gear_ratio = 0.0;
        match config.validate() {
            Err(KernelError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "drive.gear_ratio")
            }
            other => panic!("expected invalid gear ratio, got {other:?}"),
        }
    }

    #[test]
    fn test_cell_count_bounds() {
        let mut config = RobotConfig::default();
        config.battery.cell_count = 31;
        assert!(config.validate().is_err());
        config.battery.cell_count = 0;
        assert!(config.validate().is_err());
        config.battery.cell_count = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inactive_weapon_skips_weapon_checks() {
        let mut config = RobotConfig::default();
        config.weapon.kv = 0.0;
        assert!(config.validate().is_err());
        config.weapon.active = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inactive_weapon_still_needs_a_reduction() {
        let mut config = RobotConfig::default();
        config.weapon.active = false;
        config.weapon.reduction = 0.0;
        match config.validate() {
            Err(KernelError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "weapon.reduction")
            }
            other => panic!("expected invalid reduction, got {other:?}"),
        }

        config.weapon.reduction = 1.0;
        config.weapon.rotor_radius_mm = f64::NAN;
        assert!(config.validate().is_err());
        config.weapon.rotor_radius_mm = 0.0;
        config.weapon.kv = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_esc_limit_is_allowed() {
        let mut config = RobotConfig::default();
        config.drive.esc_current_limit_a = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = RobotConfig::from_json_str(r#"{ "drive": { "gear_ratio": 10.0 } }"#).unwrap();
        assert_eq!(config.drive.gear_ratio, 10.0);
        assert_eq!(config.drive.kv, DriveConfig::default().kv);
        assert_eq!(config.battery, BatteryConfig::default());
    }
}
