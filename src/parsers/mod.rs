pub mod listing;

#[cfg(test)]
mod tests;

pub use listing::{ListingExtractor, parse_sequence_number};
