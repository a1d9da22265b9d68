use crate::units::Unit;

/// Errors for misuse of the engine's API.
///
/// Malformed date input is never an error: it produces an invalid
/// [`Chronos`](crate::Chronos) instead. These variants cover the cases where
/// the caller handed the engine something it cannot interpret at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChronosError {
    #[error("unknown unit: {0:?}")]
    UnknownUnit(String),

    #[error("{0:?} is not a duration unit")]
    NotADurationUnit(Unit),

    #[error("unknown locale: {0:?}")]
    UnknownLocale(String),

    #[error("invalid locale definition for {id:?}: {reason}")]
    InvalidLocale { id: String, reason: String },
}
