pub mod bet;

pub use bet::BetBackend;
