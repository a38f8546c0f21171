use std::f64::consts::E;

/// Logistic sigmoid, used at every hidden unit and at the output unit.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Derivative of the sigmoid expressed through its output `fx = sigmoid(x)`.
pub fn sigmoid_derivative(fx: f64) -> f64 {
    fx * (1.0 - fx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_centered() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_eq!(sigmoid_derivative(0.5), 0.25);
        assert!(sigmoid(4.0) > 0.98 && sigmoid(-4.0) < 0.02);
    }
}
