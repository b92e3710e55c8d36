//! Random password strings built from a few character classes.
//!
//! A [`GenerationRequest`] names a length and a set of [`CharacterClass`]es;
//! [`password_generation::generate_password`] turns it into a [`GenerationResult`], which is
//! either the password or the "no class selected" placeholder.

use serde::Serialize;

mod charset;
pub mod password_generation;
mod request;

pub use charset::CharacterClass;
pub use password_generation::{GenerateError, GenerationResult, NO_CLASS_SELECTED};
pub use request::{GenerationRequest, RequestError, DEFAULT_LENGTH, MAX_LENGTH, MIN_LENGTH};

/// A generated password.
///
/// `Debug` does not print the contents, so a password that ends up in a log line through `{:?}`
/// stays hidden.
#[derive(Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Secret(String);

opaque_debug::implement!(Secret);

impl Secret {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Secret {
        Secret(s)
    }
}

impl FromIterator<char> for Secret {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Secret {
        Secret(iter.into_iter().collect())
    }
}
