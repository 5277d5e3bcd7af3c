use crate::forms::FormKind;
use agri_portal_sdk::PortalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Required field is empty: {0}")]
    MissingField(&'static str),
    #[error("Nothing is selected to submit against")]
    NoSelection,
    #[error("Expert {0} is offline")]
    ExpertUnavailable(String),
    /// The selected offering was shown from demo data and writes against
    /// demo data are blocked.
    #[error("The selected offering comes from demo data")]
    FallbackSelection,
    #[error("The backend rejected the credential")]
    Unauthorized,
    #[error("Request failed: {0}")]
    Request(#[source] PortalError),
}

impl From<PortalError> for SubmitError {
    fn from(error: PortalError) -> Self {
        if error.is_unauthorized() {
            Self::Unauthorized
        } else {
            Self::Request(error)
        }
    }
}

impl SubmitError {
    /// Whether the error was raised before any request was sent.
    #[must_use]
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Unauthorized | Self::Request(_))
    }

    /// Text for the blocking alert shown to the user.
    #[must_use]
    pub fn user_message(&self, kind: FormKind) -> &'static str {
        match self {
            Self::MissingField(_) | Self::NoSelection => "Please fill in all required fields.",
            Self::ExpertUnavailable(_) => "This expert is offline. Please choose another expert.",
            Self::FallbackSelection => {
                "The portal is showing sample data right now. Please try again once it is back online."
            }
            Self::Unauthorized => kind.unauthorized_message(),
            Self::Request(_) => kind.failure_message(),
        }
    }
}
