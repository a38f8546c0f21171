pub struct QuadraticLoss;

impl QuadraticLoss {
    /// Scalar loss for one sample: ½(expected − predicted)²
    pub fn loss(predicted: f64, expected: f64) -> f64 {
        0.5 * (expected - predicted).powi(2)
    }

    /// ∂L/∂predicted: predicted − expected
    pub fn derivative(predicted: f64, expected: f64) -> f64 {
        predicted - expected
    }
}
