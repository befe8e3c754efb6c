pub mod leaders;
pub mod wire;

pub use leaders::parse_leader_text;
