pub mod empty_group;
pub use empty_group::*;

pub mod reducer;
pub use reducer::*;

pub mod aggregation_spec;
pub use aggregation_spec::*;

pub mod rejection;
pub use rejection::*;

pub mod decision;
pub use decision::*;

pub mod pushdown_optimizer;
pub use pushdown_optimizer::*;
