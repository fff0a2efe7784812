//! HTML field extractors
//!
//! Each module pulls one family of fields out of an already-parsed
//! document. Extractors are total: a missing element yields
//! [`Field::Unknown`](crate::field::Field::Unknown) or an empty list,
//! never an error.

pub mod css_extractor;
mod info_extractor;
mod intro_extractor;
mod meta_extractor;
mod quote_extractor;
mod tag_extractor;

pub use info_extractor::*;
pub use intro_extractor::*;
pub use meta_extractor::*;
pub use quote_extractor::*;
pub use tag_extractor::*;
