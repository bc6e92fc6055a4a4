use polars::prelude::DataFrame;

/// A named standard profile. Operations on samples return new values; the
/// profile inside is never mutated in place.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: String,
    pub profile: DataFrame,
}

impl Sample {
    pub fn new(name: impl Into<String>, profile: DataFrame) -> Self {
        Self {
            name: name.into(),
            profile,
        }
    }
}
