use thiserror::Error;

/// Failures while turning tunable values into host keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// A value has no entry in its internal key table.
    #[error("no internal key mapped for {kind} value {value}")]
    UnmappedEnumeration { kind: &'static str, value: String },
}
