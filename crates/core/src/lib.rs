pub mod amount;
pub mod rating;

pub use amount::{Amount, AmountError};
pub use rating::{Rating, RatingError};
