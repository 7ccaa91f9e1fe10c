#![allow(non_upper_case_globals, non_camel_case_types)]
pub mod func;
pub mod save;
pub mod types;
pub mod logger;

pub mod prelude {
    pub use super::{
        types::*,
        func::*,
        save::*,
        logger::*,
    };
    pub use itertools::Itertools;
    pub use serde::{Serialize, Deserialize};
}
