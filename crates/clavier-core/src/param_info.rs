//! Parameter introspection for host-exposed controls.
//!
//! A [`ParameterInfo`] implementor exposes its controls by zero-based index,
//! each described by a [`ParamDescriptor`]. Hosts use the descriptors to
//! build generic UIs, map MIDI CC to controls, and persist presets; the DSP
//! uses them for clamping and for declared bounds such as a range minimum.
//!
//! # Example
//!
//! ```rust
//! use clavier_core::{ParameterInfo, ParamDescriptor, ParamUnit, ParamId};
//!
//! struct Level {
//!     cents: f32,
//! }
//!
//! impl ParameterInfo for Level {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::new("Detune", "Detune", ParamUnit::Cents, -100.0, 100.0, 0.0)
//!                 .with_id(ParamId(1), "lvl_detune")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.cents,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.cents = desc.clamp(value);
//!         }
//!     }
//! }
//!
//! let mut level = Level { cents: 0.0 };
//! level.set_param(0, 250.0);
//! assert_eq!(level.get_param(0), 100.0);
//! ```

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter: hosts
/// record automation and presets against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags for host communication.
///
/// ```rust
/// use clavier_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!ParamFlags::AUTOMATABLE.contains(flags));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete integer steps (enums, semitones).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Unit type for parameter display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Semitones (st), for transposition.
    Semitones,
    /// Cents (ct), hundredths of a semitone.
    Cents,
    /// Milliseconds (ms), for ramp times.
    Milliseconds,
    /// Unitless coefficient such as a Q factor.
    Coefficient,
    /// Index into an enumeration.
    Enum,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use clavier_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Cents.suffix(), " ct");
    /// assert_eq!(ParamUnit::Enum.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Semitones => " st",
            ParamUnit::Cents => " ct",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Coefficient | ParamUnit::Enum => "",
        }
    }
}

/// Trait for processors that expose introspectable parameters.
///
/// Indices are stable for the lifetime of the instance; valid indices are
/// `0..param_count()`.
pub trait ParameterInfo {
    /// Returns the number of parameters.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at `index`, or `None` when
    /// `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current value of the parameter at `index` (0.0 when out of
    /// range).
    fn get_param(&self, index: usize) -> f32;

    /// Sets the parameter at `index`, clamped to its descriptor range.
    /// Out-of-range indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name or short name (case-insensitive).
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || desc.string_id.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Finds a parameter index by its stable [`ParamId`].
    ///
    /// O(n) scan, meant for setup paths.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

/// Metadata for a single parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display.
    pub name: &'static str,
    /// Short name for hardware displays, max 8 characters.
    pub short_name: &'static str,
    /// Unit type for formatting the value.
    pub unit: ParamUnit,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Value at construction.
    pub default: f32,
    /// Recommended encoder increment.
    pub step: f32,
    /// Stable numeric ID.
    pub id: ParamId,
    /// Human-readable stable ID for presets and debugging.
    pub string_id: &'static str,
    /// Capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Continuous, automatable parameter with an unassigned ID.
    pub const fn new(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Stepped parameter (integer values, step 1).
    pub const fn stepped(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        let mut desc = Self::new(name, short_name, unit, min, max, default);
        desc.step = 1.0;
        desc.flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
        desc
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// ```rust
    /// use clavier_core::{ParamDescriptor, ParamId, ParamUnit};
    ///
    /// let desc = ParamDescriptor::new("Inertia", "Inertia", ParamUnit::Milliseconds, 1.0, 2000.0, 20.0)
    ///     .with_id(ParamId(7), "x_inertia");
    /// assert_eq!(desc.id, ParamId(7));
    /// assert_eq!(desc.string_id, "x_inertia");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamps a value to this parameter's valid range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestEffect {
        transpose: f32,
        inertia: f32,
    }

    impl ParameterInfo for TestEffect {
        fn param_count(&self) -> usize {
            2
        }

        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            match index {
                0 => Some(
                    ParamDescriptor::stepped(
                        "Transpose",
                        "Transp",
                        ParamUnit::Semitones,
                        -48.0,
                        48.0,
                        0.0,
                    )
                    .with_id(ParamId(10), "t_transpose"),
                ),
                1 => Some(
                    ParamDescriptor::new(
                        "Inertia",
                        "Inertia",
                        ParamUnit::Milliseconds,
                        1.0,
                        2000.0,
                        20.0,
                    )
                    .with_id(ParamId(11), "t_inertia"),
                ),
                _ => None,
            }
        }

        fn get_param(&self, index: usize) -> f32 {
            match index {
                0 => self.transpose,
                1 => self.inertia,
                _ => 0.0,
            }
        }

        fn set_param(&mut self, index: usize, value: f32) {
            let Some(desc) = self.param_info(index) else {
                return;
            };
            match index {
                0 => self.transpose = desc.clamp(value),
                1 => self.inertia = desc.clamp(value),
                _ => {}
            }
        }
    }

    fn effect() -> TestEffect {
        TestEffect {
            transpose: 0.0,
            inertia: 20.0,
        }
    }

    #[test]
    fn test_param_clamping() {
        let mut effect = effect();

        effect.set_param(0, 100.0);
        assert_eq!(effect.get_param(0), 48.0);
        effect.set_param(1, 0.0);
        assert_eq!(effect.get_param(1), 1.0);
    }

    #[test]
    fn test_out_of_bounds_index() {
        let mut effect = effect();

        assert_eq!(effect.get_param(99), 0.0);
        effect.set_param(99, 42.0);
        assert_eq!(effect.get_param(0), 0.0);
        assert_eq!(effect.get_param(1), 20.0);
        assert!(effect.param_info(2).is_none());
    }

    #[test]
    fn test_find_by_name_and_id() {
        let effect = effect();

        assert_eq!(effect.find_param_by_name("transpose"), Some(0));
        assert_eq!(effect.find_param_by_name("TRANSP"), Some(0));
        assert_eq!(effect.find_param_by_name("t_inertia"), Some(1));
        assert_eq!(effect.find_param_by_name("missing"), None);
        assert_eq!(effect.param_index_by_id(ParamId(11)), Some(1));
        assert_eq!(effect.param_index_by_id(ParamId(12)), None);
    }

    #[test]
    fn test_stepped_flags() {
        let desc = effect().param_info(0).unwrap();
        assert!(desc.flags.contains(ParamFlags::STEPPED));
        assert_eq!(desc.step, 1.0);

        let desc = effect().param_info(1).unwrap();
        assert!(!desc.flags.contains(ParamFlags::STEPPED));
        assert!(desc.flags.contains(ParamFlags::AUTOMATABLE));
    }
}
