//! Self-Check Strategy Trait and Simulated Checks

/// Numeric readings attached to a check report
///
/// Only the fields a given subsystem actually measures are populated;
/// the motor check fills speed and rpm, the fuel check fills the level.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Readings {
    /// Vehicle speed (km/h)
    pub speed: Option<u32>,
    /// Engine speed (rpm)
    pub rpm: Option<u32>,
    /// Fuel level (liters)
    pub fuel_level: Option<f32>,
}

/// Outcome of one self-check iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckReport {
    /// Whether the subsystem considers itself healthy
    pub healthy: bool,
    /// Readings taken during the check
    pub readings: Readings,
}

impl CheckReport {
    /// A healthy report without readings
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            readings: Readings::default(),
        }
    }

    /// An unhealthy report; never carries readings
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            readings: Readings::default(),
        }
    }

    /// Attach motor readings
    pub fn with_motor(mut self, speed: u32, rpm: u32) -> Self {
        self.readings.speed = Some(speed);
        self.readings.rpm = Some(rpm);
        self
    }

    /// Attach a fuel level reading
    pub fn with_fuel_level(mut self, level: f32) -> Self {
        self.readings.fuel_level = Some(level);
        self
    }
}

/// Pluggable subsystem self-check
///
/// Called once per monitor iteration. Implementations may take real
/// measurements or simulate them; latency must stay bounded because the
/// monitor loop runs the check inline between pacing delays.
pub trait SubsystemCheck: Send {
    fn check(&mut self) -> CheckReport;
}

/// Adapter turning a closure into a [`SubsystemCheck`]
pub struct CheckFn<F>(pub F);

impl<F> SubsystemCheck for CheckFn<F>
where
    F: FnMut() -> CheckReport + Send,
{
    fn check(&mut self) -> CheckReport {
        (self.0)()
    }
}

/// Simulated motor check cycling through a speed/rpm profile
#[derive(Debug, Clone)]
pub struct SimulatedMotorCheck {
    profile: Vec<(u32, u32)>,
    cursor: usize,
}

impl SimulatedMotorCheck {
    /// Cycle through `(speed, rpm)` pairs, one per iteration
    pub fn new(profile: Vec<(u32, u32)>) -> Self {
        Self { profile, cursor: 0 }
    }
}

impl Default for SimulatedMotorCheck {
    fn default() -> Self {
        Self::new(vec![(90, 2500), (95, 2600), (88, 2400)])
    }
}

impl SubsystemCheck for SimulatedMotorCheck {
    fn check(&mut self) -> CheckReport {
        if self.profile.is_empty() {
            return CheckReport::unhealthy();
        }
        let (speed, rpm) = self.profile[self.cursor % self.profile.len()];
        self.cursor = self.cursor.wrapping_add(1);
        CheckReport::healthy().with_motor(speed, rpm)
    }
}

/// Simulated ventilation check failing every Nth iteration
#[derive(Debug, Clone)]
pub struct SimulatedVentilationCheck {
    fail_every: usize,
    counter: usize,
}

impl SimulatedVentilationCheck {
    /// Fail every `fail_every`-th check; 0 never fails
    pub fn new(fail_every: usize) -> Self {
        Self {
            fail_every,
            counter: 0,
        }
    }
}

impl Default for SimulatedVentilationCheck {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SubsystemCheck for SimulatedVentilationCheck {
    fn check(&mut self) -> CheckReport {
        self.counter += 1;
        if self.fail_every != 0 && self.counter % self.fail_every == 0 {
            CheckReport::unhealthy()
        } else {
            CheckReport::healthy()
        }
    }
}

/// Simulated fuel check draining a tank at a fixed burn rate
#[derive(Debug, Clone)]
pub struct SimulatedFuelCheck {
    level: f32,
    burn_per_cycle: f32,
}

impl SimulatedFuelCheck {
    pub fn new(initial_level: f32, burn_per_cycle: f32) -> Self {
        Self {
            level: initial_level,
            burn_per_cycle,
        }
    }
}

impl Default for SimulatedFuelCheck {
    fn default() -> Self {
        Self::new(50.0, 0.1)
    }
}

impl SubsystemCheck for SimulatedFuelCheck {
    fn check(&mut self) -> CheckReport {
        let report = if self.level > 0.0 {
            CheckReport::healthy().with_fuel_level(self.level)
        } else {
            CheckReport::unhealthy()
        };
        self.level = (self.level - self.burn_per_cycle).max(0.0);
        report
    }
}
