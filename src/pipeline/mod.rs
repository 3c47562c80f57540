pub mod interval;
pub use interval::*;

pub mod option_value;
pub use option_value::*;

pub mod operator;
pub use operator::*;

pub mod reduce_expr;
pub use reduce_expr::*;
