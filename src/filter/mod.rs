pub mod filter_expr;
pub use filter_expr::*;

pub mod filter_error;
pub use filter_error::*;

pub mod predicate_sink;
pub use predicate_sink::*;

pub mod filter_compiler;
pub use filter_compiler::*;

pub mod sql_where;
pub use sql_where::*;
