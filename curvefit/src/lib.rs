#![allow(non_upper_case_globals, non_camel_case_types)]
pub mod nn {
    pub mod backend;
    pub mod model;
    pub mod schedule;
    pub mod train;

    pub mod prelude {
        pub use super::{backend::*, model::*, schedule::*, train::*};
    }
}

pub mod config;
pub mod error;
pub mod forecast;
pub mod series;

pub mod prelude {
    pub use crate::{
        config::*,
        error::*,
        forecast::*,
        nn::prelude::*,
        series::*,
    };
    pub use curvefit_ds::prelude::*;
}
