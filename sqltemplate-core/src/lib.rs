mod as_value;
mod coercion;
mod error;
mod executor;
mod mapper;
mod name;
mod parameter;
mod record;
mod schema;
mod sql_template;
mod stream;
mod template;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use coercion::*;
pub use error::*;
pub use executor::*;
pub use mapper::*;
pub use name::*;
pub use parameter::*;
pub use record::*;
pub use schema::*;
pub use sql_template::*;
pub use stream::*;
pub use template::*;
pub use value::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
