pub mod watchlist;

pub use watchlist::Watchlist;
