/// Inclusive numeric range edited as a pair of endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range with both endpoints equal.
    pub fn exactly(value: f32) -> Self {
        Self::new(value, value)
    }
}
