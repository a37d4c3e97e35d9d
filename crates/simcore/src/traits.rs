// Drive-train state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveState {
    /// Vehicle speed (m/s), never negative.
    pub speed: f64,
    /// Current through one drive motor (A).
    pub current_per_motor: f64,
    /// Back-EMF of one drive motor at the start of the step (V).
    pub back_emf: f64,
}

// Weapon state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeaponState {
    /// Rotor angular velocity (rad/s).
    pub angular_velocity: f64,
    /// Current through one weapon motor (A).
    pub current_per_motor: f64,
    pub back_emf: f64,
}

// Electrical bus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryState {
    /// Terminal voltage seen by every ESC during the current step.
    pub voltage: f64,
    /// Pack current drawn during the current step (A).
    pub total_current_draw: f64,
}

impl BatteryState {
    pub fn at_rest(nominal_voltage: f64) -> Self {
        BatteryState {
            voltage: nominal_voltage,
            total_current_draw: 0.0,
        }
    }
}

// Lumped temperatures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalState {
    pub drive_temperature: f64,
    pub weapon_temperature: f64,
}

impl ThermalState {
    pub fn at_ambient(ambient: f64) -> Self {
        ThermalState {
            drive_temperature: ambient,
            weapon_temperature: ambient,
        }
    }
}

/// Everything the integrator carries from one step to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimState {
    pub drive: DriveState,
    pub weapon: WeaponState,
    pub battery: BatteryState,
    pub thermal: ThermalState,
}

impl SimState {
    pub fn initial(nominal_voltage: f64, ambient: f64) -> Self {
        SimState {
            drive: DriveState::default(),
            weapon: WeaponState::default(),
            battery: BatteryState::at_rest(nominal_voltage),
            thermal: ThermalState::at_ambient(ambient),
        }
    }

    /// Name of the first non-finite quantity, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        let fields = [
            ("speed", self.drive.speed),
            ("drive current", self.drive.current_per_motor),
            ("weapon angular velocity", self.weapon.angular_velocity),
            ("weapon current", self.weapon.current_per_motor),
            ("battery voltage", self.battery.voltage),
            ("battery current", self.battery.total_current_draw),
            ("drive temperature", self.thermal.drive_temperature),
            ("weapon temperature", self.thermal.weapon_temperature),
        ];
        fields
            .into_iter()
            .find(|(_, value)| !value.is_finite())
            .map(|(name, _)| name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
}

pub trait ElectricalModel {
    fn step_electrical(&self, ctx: SimContext, state: &mut SimState);
}

pub trait MechanicsModel {
    fn step_physics(&self, ctx: SimContext, state: &mut SimState);
}

pub trait ThermalModel {
    fn step_thermal(&self, ctx: SimContext, state: &mut SimState);
}
