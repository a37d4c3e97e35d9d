pub mod collision;
pub mod drive;
pub mod impact;
pub mod rotor;
pub mod static_specs;

pub use collision::{
    analyze_collision, analyze_collision_with_efficiency, CollisionResult, DamageEquivalent,
};
pub use drive::Drivetrain;
pub use impact::{impact_g_force, RamImpact, Severity};
pub use rotor::WeaponRotor;
pub use static_specs::compute_static;
