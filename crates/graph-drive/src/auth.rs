//! Credential material for the remote drive service.

use secrecy::{ExposeSecret as _, SecretString};

/// Bearer credentials for the remote service.
///
/// The token is held in a [`SecretString`] so it stays out of debug output
/// and is zeroized on drop.
#[derive(Debug, Clone)]
pub struct Auth {
    access_token: SecretString,
}

impl Auth {
    /// Wrap an access token obtained out of band.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
        }
    }

    /// Whether usable token material is present.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.access_token.expose_secret().is_empty()
    }

    /// The bearer token, for adapter implementations building requests.
    #[must_use]
    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }
}
