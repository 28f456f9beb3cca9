//! Indicator trait definitions.

/// Trait for windowed technical indicators.
///
/// Output is aligned with the input: element `i` describes input `i`, and
/// positions without enough history hold `None`.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>>;

    /// Get the minimum data points required for the first value.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
