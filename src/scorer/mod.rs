pub mod value_scorer;

pub use value_scorer::rank_value_picks;
