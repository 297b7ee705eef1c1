use crate::error::ControlError;

pub const DEFAULT_KP: f64 = 0.15;
pub const DEFAULT_KD: f64 = 0.6;

/// Discrete proportional-derivative controller.
///
/// Computes `u[t] = kp * e[t] + kd * (e[t] - e[t-1])` and clamps the result to
/// the optional output bounds. The previous error is remembered between calls.
///
/// An instance is meant to be owned by a single control loop. It is `Send`, so
/// it can be moved into a worker thread or task, but concurrent callers must
/// serialize access themselves.
#[derive(Debug, Clone)]
pub struct PdController {
    kp: f64,
    kd: f64,
    u_min: Option<f64>,
    u_max: Option<f64>,
    prev_error: Option<f64>,
}

impl Default for PdController {
    fn default() -> Self {
        Self::new(DEFAULT_KP, DEFAULT_KD, None, None)
    }
}

impl PdController {
    /// Gains and bounds are accepted as given. Inconsistent bounds
    /// (`u_min > u_max`) are not rejected; see [`PdController::compute`].
    pub fn new(kp: f64, kd: f64, u_min: Option<f64>, u_max: Option<f64>) -> Self {
        Self {
            kp,
            kd,
            u_min,
            u_max,
            prev_error: None,
        }
    }

    pub fn kp(&self) -> f64 {
        self.kp
    }

    pub fn kd(&self) -> f64 {
        self.kd
    }

    pub fn u_min(&self) -> Option<f64> {
        self.u_min
    }

    pub fn u_max(&self) -> Option<f64> {
        self.u_max
    }

    /// The error seen by the last successful call, if any.
    pub fn prev_error(&self) -> Option<f64> {
        self.prev_error
    }

    /// Forget the previous error. The next call behaves like the first one.
    pub fn reset(&mut self) {
        self.prev_error = None;
    }

    /// Compute the control output for `error`.
    ///
    /// The derivative term uses `prev_error` when given, otherwise the stored
    /// previous error (`0.0` before the first call). Either way the stored
    /// value becomes `error` afterwards.
    ///
    /// The lower bound is applied before the upper bound, so with
    /// `u_min > u_max` any output above `u_min` ends up at `u_max`.
    pub fn compute(
        &mut self,
        error: impl Into<Option<f64>>,
        prev_error: Option<f64>,
    ) -> Result<f64, ControlError> {
        let error = match error.into() {
            Some(e) if !e.is_nan() => e,
            _ => {
                log::debug!("Rejected control error input: absent or NaN");
                return Err(ControlError::InvalidArgument("error"));
            }
        };

        let prev = prev_error.unwrap_or_else(|| self.prev_error.unwrap_or(0.0));

        let p = self.kp * error;
        let d = self.kd * (error - prev);
        let mut u = p + d;

        self.prev_error = Some(error);

        if let Some(min) = self.u_min {
            if u < min {
                u = min;
            }
        }
        if let Some(max) = self.u_max {
            if u > max {
                u = max;
            }
        }

        log::trace!("e={:.4} p={:.4} d={:.4} u={:.4}", error, p, d, u);

        Ok(u)
    }

    /// Compute the output for `reference - measured` using the stored memory.
    pub fn step(
        &mut self,
        reference: impl Into<Option<f64>>,
        measured: impl Into<Option<f64>>,
    ) -> Result<f64, ControlError> {
        let reference = reference
            .into()
            .ok_or(ControlError::InvalidArgument("reference"))?;
        let measured = measured
            .into()
            .ok_or(ControlError::InvalidArgument("measured"))?;

        self.compute(reference - measured, None)
    }

    /// Alias for [`PdController::compute`], for loops that treat the
    /// controller as a plain function.
    pub fn call(
        &mut self,
        error: impl Into<Option<f64>>,
        prev_error: Option<f64>,
    ) -> Result<f64, ControlError> {
        self.compute(error, prev_error)
    }

    /// Whether `u` sits on one of the configured output bounds.
    ///
    /// This compares values only, so an unclamped output that lands exactly
    /// on a bound also counts as saturated.
    pub fn is_saturated(&self, u: f64) -> bool {
        self.u_min == Some(u) || self.u_max == Some(u)
    }
}
