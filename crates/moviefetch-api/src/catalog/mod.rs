//! Catalog module.
//!
//! Domain types for the category listing and movie detail endpoints,
//! with their strict JSON decoders.

mod decode;
mod types;
mod wire;

pub use decode::{
    DecodeError, decode_categories, decode_error_message, decode_movie_detail,
    encode_categories, encode_movie_detail,
};
pub use types::{Category, Movie, MovieDetail};
