use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("'{value}' is not a boolean; use 1/0, true/false, yes/no, y/n, or on/off.")]
    InvalidBoolean { value: String },
    #[error("Empty duration.")]
    DurationEmpty,
    #[error("'{value}' is not a duration; expected e.g. 500ms, 5s, 2m, 1h, or bare seconds.")]
    InvalidDurationFormat { value: String },
    #[error("Bad number in duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration is too large.")]
    DurationOverflow,
    #[error("Unknown duration unit '{unit}'; use ms, s, m, or h.")]
    InvalidDurationUnit { unit: String },
    #[error("Must be at least {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Not a whole number: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
