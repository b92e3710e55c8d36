use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::password_generation::SEED_PER_CLASS;
use crate::CharacterClass;

/// Shortest length offered to users.
pub const MIN_LENGTH: usize = 6;
/// Longest length offered to users.
pub const MAX_LENGTH: usize = 80;
pub const DEFAULT_LENGTH: usize = 8;

/// What to generate: a length and the character classes allowed in the result.
///
/// As YAML:
///
/// ```yaml
/// length: 16
/// classes: [alphabetic, numeric, symbolic]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationRequest {
    #[serde(default = "default_length")]
    length: usize,
    #[serde(default)]
    classes: BTreeSet<CharacterClass>,
}

impl GenerationRequest {
    pub fn new(length: usize, classes: impl IntoIterator<Item = CharacterClass>) -> Self {
        GenerationRequest {
            length,
            classes: classes.into_iter().collect(),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// The enabled classes, in the order they contribute to a password.
    pub fn classes(&self) -> &BTreeSet<CharacterClass> {
        &self.classes
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_classes(mut self, classes: impl IntoIterator<Item = CharacterClass>) -> Self {
        self.classes = classes.into_iter().collect();
        self
    }

    /// The number of characters guaranteed to the enabled classes; no shorter password can
    /// satisfy this request.
    pub fn minimum_length(&self) -> usize {
        SEED_PER_CLASS * self.classes.len()
    }

    /// Check the length against the range offered to users (`MIN_LENGTH..=MAX_LENGTH`).
    ///
    /// The generator itself accepts any length that fits the guaranteed characters; this is for
    /// front ends that want the same bounds as the interactive prompt.
    pub fn validate_ui_range(&self) -> Result<(), RequestError> {
        if (MIN_LENGTH..=MAX_LENGTH).contains(&self.length) {
            Ok(())
        } else {
            Err(RequestErrorRepr::LengthOutOfRange {
                length: self.length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            }
            .into())
        }
    }

    pub fn from_yaml_reader(rdr: impl Read) -> Result<Self, RequestError> {
        Ok(serde_yaml::from_reader(rdr).map_err(RequestErrorRepr::Parse)?)
    }

    /// Load a request from a YAML file.
    pub fn load(path: &Path) -> Result<Self, RequestError> {
        let file = File::open(path).map_err(RequestErrorRepr::Io)?;
        Self::from_yaml_reader(file)
    }
}

impl Default for GenerationRequest {
    fn default() -> Self {
        GenerationRequest::new(DEFAULT_LENGTH, [CharacterClass::Alphabetic])
    }
}

fn default_length() -> usize {
    DEFAULT_LENGTH
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct RequestError(RequestErrorRepr);

impl From<RequestErrorRepr> for RequestError {
    fn from(err: RequestErrorRepr) -> RequestError {
        RequestError(err)
    }
}

#[derive(Debug, thiserror::Error)]
enum RequestErrorRepr {
    #[error("I/O error: {0}")]
    Io(io::Error),
    #[error("failed to parse the request as YAML: {0}")]
    Parse(#[source] serde_yaml::Error),
    #[error("a length of {length} is outside the supported range of {min} to {max}")]
    LengthOutOfRange { length: usize, min: usize, max: usize },
}
