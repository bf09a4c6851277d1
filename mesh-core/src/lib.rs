pub mod election;
pub mod model;
pub mod utils;

pub use election::is_initiator;
pub use model::*;
