use thiserror::Error;

/// Failures raised while lowering IL to assembly.
///
/// Every variant is a broken contract between compiler stages, not a
/// diagnostic for the user's program; malformed programs are rejected by the
/// front end long before this layer runs. None of these are recoverable: the
/// driver aborts the compilation on the first one.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LowerError {
    #[error("spot {spot} has no encoding at width {width}")]
    UnsupportedWidth { spot: String, width: usize },

    #[error("cannot shift a non-memory spot")]
    CannotShift,

    #[error("cannot index an already-indexed memory spot")]
    DoubleIndex,

    #[error("index scale {0} is not one of 1, 2, 4, or 8")]
    BadScale(i64),

    #[error("call with {0} arguments exceeds the 16 argument registers")]
    TooManyArgs(usize),

    #[error("both operands are 64-bit immediates; the front end must fold these")]
    DualImmediate,

    #[error("value v{0} has no spot assigned at lowering time")]
    MissingSpot(usize),
}
