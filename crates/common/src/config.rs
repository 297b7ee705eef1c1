use serde::{Deserialize, Serialize};

use crate::pd::{PdController, DEFAULT_KD, DEFAULT_KP};

/// Gains and output bounds for one controller.
///
/// Meant to be embedded in a host application's own configuration; nothing
/// in this crate reads configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub kp: f64,
    pub kd: f64,
    pub u_min: Option<f64>,
    pub u_max: Option<f64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            kp: DEFAULT_KP,
            kd: DEFAULT_KD,
            u_min: None,
            u_max: None,
        }
    }
}

impl ControllerConfig {
    pub fn build(&self) -> PdController {
        PdController::new(self.kp, self.kd, self.u_min, self.u_max)
    }
}

/// Closed-loop simulation parameters shared by the threaded and async drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    pub cycles: u64,
    pub period_ms: u64, // 0 runs the loop unpaced
    pub reference: f64,
    pub initial_measured: f64,
    pub plant_gain: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            cycles: 50,
            period_ms: 0,
            reference: 1.0,
            initial_measured: 0.0,
            plant_gain: 1.0,
        }
    }
}
