//! Physical constants in SI units.

/// Speed of light (m/s)
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
/// Planck constant (J s)
pub const PLANCK: f64 = 6.626_070_15e-34;
/// Reduced Planck constant (J s)
pub const REDUCED_PLANCK: f64 = 1.054_571_817e-34;
/// Gravitational constant (m^3 kg^-1 s^-2)
pub const GRAVITATIONAL: f64 = 6.674_30e-11;
/// Atomic mass unit (kg)
pub const ATOMIC_MASS_UNIT: f64 = 1.660_539_066_60e-27;
/// Bohr radius (m)
pub const BOHR_RADIUS: f64 = 5.291_772_109_03e-11;
pub const ELECTRON_MASS: f64 = 9.109_383_701_5e-31;
pub const PROTON_MASS: f64 = 1.672_621_923_69e-27;
pub const NEUTRON_MASS: f64 = 1.674_927_498_04e-27;
/// Avogadro constant (mol^-1)
pub const AVOGADRO: f64 = 6.022_140_76e23;
/// Molar gas constant (J mol^-1 K^-1)
pub const GAS_CONSTANT: f64 = 8.314_462_618;
/// Boltzmann constant (J/K)
pub const BOLTZMANN: f64 = 1.380_649e-23;
/// Standard gravity at the Earth's surface (m/s^2)
pub const STANDARD_GRAVITY: f64 = 9.806_65;
