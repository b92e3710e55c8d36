//! Utilities for generating passwords.

use std::fmt;

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{GenerationRequest, Secret};

/// How many characters each enabled class is guaranteed to contribute.
pub const SEED_PER_CLASS: usize = 2;

/// Shown in place of a password when no character class is enabled.
pub static NO_CLASS_SELECTED: &str = "Select at least 1 type";

/// The outcome of a generation call.
///
/// An empty class selection is an expected outcome rather than an error: callers display
/// [`NO_CLASS_SELECTED`] instead of a password.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationResult {
    Password(Secret),
    NoClassSelected,
}

impl GenerationResult {
    pub fn password(&self) -> Option<&Secret> {
        match self {
            GenerationResult::Password(secret) => Some(secret),
            GenerationResult::NoClassSelected => None,
        }
    }

    /// The text to display: the password, or the placeholder.
    pub fn as_str(&self) -> &str {
        match self {
            GenerationResult::Password(secret) => secret.as_str(),
            GenerationResult::NoClassSelected => NO_CLASS_SELECTED,
        }
    }
}

impl fmt::Display for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error(
        "a length of {length} is too short for the selected character types, which need at \
         least {minimum} characters"
    )]
    LengthBelowMinimum { length: usize, minimum: usize },
}

/// Generate a password satisfying `request`.
///
/// Every enabled class contributes [`SEED_PER_CLASS`] characters drawn from its own alphabet;
/// the rest of the length is drawn from the union of the enabled alphabets. The buffer is then
/// shuffled, so the guaranteed characters can land anywhere.
///
/// Returns [`GenerationResult::NoClassSelected`] if no class is enabled, whatever the length.
pub fn generate_password<R>(
    rng: &mut R,
    request: &GenerationRequest,
) -> Result<GenerationResult, GenerateError>
where
    R: Rng,
{
    let classes = request.classes();
    if classes.is_empty() {
        debug!("no character class selected");
        return Ok(GenerationResult::NoClassSelected);
    }

    let length = request.length();
    let minimum = request.minimum_length();
    let remaining = length
        .checked_sub(minimum)
        .ok_or(GenerateError::LengthBelowMinimum { length, minimum })?;

    let pool = classes
        .iter()
        .flat_map(|class| class.alphabet().iter().copied())
        .collect::<Vec<u8>>();
    debug!(
        "generating {} characters from {:?} (pool of {})",
        length,
        classes,
        pool.len()
    );

    let mut chars = Vec::with_capacity(length);
    for class in classes {
        sample_into(rng, class.alphabet(), SEED_PER_CLASS, &mut chars);
    }
    trace!("seeded {} characters, filling {} more", chars.len(), remaining);
    sample_into(rng, &pool, remaining, &mut chars);

    // `shuffle` is a Fisher-Yates shuffle, so every ordering is equally likely.
    chars.shuffle(rng);

    assert_eq!(chars.len(), length, "generated password has the wrong length");
    Ok(GenerationResult::Password(chars.into_iter().collect()))
}

/// [`generate_password`] with the thread-local generator, which is cryptographically secure.
pub fn generate(request: &GenerationRequest) -> Result<GenerationResult, GenerateError> {
    generate_password(&mut rand::thread_rng(), request)
}

/// Append `count` characters sampled uniformly (with replacement) from `alphabet`.
///
/// `rand`'s uniform sampler re-samples values that would fall outside a multiple of the range,
/// so there is no modulo bias.
fn sample_into<R>(rng: &mut R, alphabet: &[u8], count: usize, out: &mut Vec<char>)
where
    R: Rng,
{
    for _ in 0..count {
        let idx = rng.gen_range(0..alphabet.len());
        out.push(char::from(alphabet[idx]));
    }
}
