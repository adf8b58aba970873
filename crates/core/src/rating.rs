use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("Rating must be between {min} and {max} stars, got {0}", min = Rating::MIN, max = Rating::MAX)]
    OutOfRange(u8),
}

/// Star rating attached to a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Result<Self, RatingError> {
        if (Self::MIN..=Self::MAX).contains(&stars) {
            Ok(Rating(stars))
        } else {
            Err(RatingError::OutOfRange(stars))
        }
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

/// New reviews start at five stars.
impl Default for Rating {
    fn default() -> Self {
        Rating(Self::MAX)
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;
    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        Rating::new(stars)
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> u8 {
        r.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}
