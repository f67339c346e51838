#![forbid(unsafe_code)]

pub mod board;
pub mod model;
pub mod normalizer;
pub mod scoring;
pub mod synonyms;
pub mod time;

pub use time::Clock;
