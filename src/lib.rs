pub use sqltemplate_core::*;
pub use sqltemplate_macros::*;
