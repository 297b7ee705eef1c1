/// Integrating first-order plant: each command moves the measurement by
/// `gain * u`.
#[derive(Debug, Clone)]
pub struct FirstOrderPlant {
    measured: f64,
    gain: f64,
}

impl FirstOrderPlant {
    pub fn new(initial: f64, gain: f64) -> Self {
        Self {
            measured: initial,
            gain,
        }
    }

    pub fn measured(&self) -> f64 {
        self.measured
    }

    pub fn apply(&mut self, u: f64) -> f64 {
        self.measured += self.gain * u;
        self.measured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pd::PdController;
    use approx::assert_relative_eq;

    #[test]
    fn apply_integrates_command() {
        let mut plant = FirstOrderPlant::new(1.0, 0.5);
        assert_relative_eq!(plant.apply(2.0), 2.0);
        assert_relative_eq!(plant.apply(-4.0), 0.0);
        assert_relative_eq!(plant.measured(), 0.0);
    }

    #[test]
    fn default_controller_settles_on_reference() {
        let mut pd = PdController::default();
        let mut plant = FirstOrderPlant::new(0.0, 1.0);

        for _ in 0..200 {
            let u = pd.step(1.0, plant.measured()).unwrap();
            plant.apply(u);
        }

        assert_relative_eq!(plant.measured(), 1.0, epsilon = 1e-6);
    }
}
