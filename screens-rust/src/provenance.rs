/// Where a field value of a locally held record came from.
///
/// After a successful submit the screens build the new record from the
/// server's echo where it has one, and fill the rest from local state.
/// Locally filled values stay `Provisional` until the next refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance<T> {
    /// Echoed back by the backend.
    Confirmed(T),
    /// Filled in by the client.
    Provisional(T),
}

impl<T> Provenance<T> {
    /// `Confirmed` when the server echoed a value, otherwise the local value
    /// marked `Provisional`.
    pub fn confirmed_or(server: Option<T>, local: T) -> Self {
        match server {
            Some(value) => Self::Confirmed(value),
            None => Self::Provisional(local),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Confirmed(value) | Self::Provisional(value) => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Confirmed(value) | Self::Provisional(value) => value,
        }
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, Self::Provisional(_))
    }
}

/// Whether a list shown on screen came from the backend or from the
/// built-in demo dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Live,
    Fallback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_or_prefers_server_value() {
        let field = Provenance::confirmed_or(Some("Wheat".to_string()), "wheat".to_string());
        assert_eq!(field, Provenance::Confirmed("Wheat".to_string()));
        assert!(!field.is_provisional());

        let field = Provenance::confirmed_or(None, 5.0);
        assert_eq!(field, Provenance::Provisional(5.0));
        assert_eq!(*field.value(), 5.0);
    }
}
