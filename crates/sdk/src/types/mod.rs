mod criteria;
mod event;
mod packed;

pub use criteria::{Criteria, TopicValue};
pub use event::*;
pub use packed::{Balance, Index};

use alloy::sol_types::SolEvent;

/// Name of the event, i.e. its ABI signature without parameters.
pub fn event_name<E: SolEvent>() -> &'static str {
    E::SIGNATURE.split_once('(').map_or(E::SIGNATURE, |(name, _)| name)
}
