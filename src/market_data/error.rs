use std::error::Error as StdError;

use crate::models::AssetIdentifier;

/// Failure talking to a price source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Connection error, timeout, non-success status or unusable body.
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// The source answered but holds no entry for the asset.
    #[error("asset '{0}' not found at the price source")]
    AssetNotFound(AssetIdentifier),
}

impl FetchError {
    /// Build an `UpstreamUnavailable` from an error, keeping its source chain.
    pub fn unavailable(err: &(dyn StdError + 'static)) -> Self {
        FetchError::UpstreamUnavailable(error_chain(err))
    }
}

/// Render an error with every `source()` joined by ": ".
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        current = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("error sending request")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("operation timed out")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    impl StdError for Inner {}

    #[test]
    fn test_unavailable_keeps_source_chain() {
        let err = FetchError::unavailable(&Outer(Inner));
        assert_eq!(
            err,
            FetchError::UpstreamUnavailable("error sending request: operation timed out".into())
        );
    }

    #[test]
    fn test_not_found_message_names_asset() {
        let asset = AssetIdentifier::new("dogecoin").unwrap();
        let err = FetchError::AssetNotFound(asset);
        assert_eq!(err.to_string(), "asset 'dogecoin' not found at the price source");
    }
}
