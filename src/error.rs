use thiserror::Error;

/// Returned when a grid, rotation or rebuild would need a month outside the
/// range of representable dates.
#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub struct OutOfTimeError;

#[derive(Debug, Error)]
pub enum DateError {
    #[error("unknown time unit {0:?}")]
    UnknownUnit(String),

    #[error("invalid date pattern")]
    Pattern(#[from] time::error::InvalidFormatDescription),

    #[error("failed to format date")]
    Format(#[from] time::error::Format),
}

/// Error type for page commits.
#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub enum PagingError {
    /// The viewport settled on a page that none of the three grids was laid
    /// out at.
    #[error("no month grid is laid out at page {page}")]
    Inconsistent { page: i64 },

    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(OutOfTimeError.to_string(), "reached the end of time");
        assert_eq!(
            PagingError::Inconsistent { page: 3 }.to_string(),
            "no month grid is laid out at page 3"
        );
        assert_eq!(
            PagingError::from(OutOfTimeError).to_string(),
            "reached the end of time"
        );
        assert_eq!(
            DateError::UnknownUnit(String::from("fortnights")).to_string(),
            "unknown time unit \"fortnights\""
        );
    }

    #[test]
    fn test_errors_are_send_and_sync() {
        fn assert_impl<T: std::error::Error + Send + Sync>() {}
        assert_impl::<OutOfTimeError>();
        assert_impl::<DateError>();
        assert_impl::<PagingError>();
    }
}
