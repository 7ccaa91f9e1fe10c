#![allow(non_upper_case_globals, non_camel_case_types)]

pub mod input {
    pub mod read_csv;
}

pub mod output {
    pub mod animation;
    pub mod plot;
    pub mod style;
}

pub mod prelude {
    pub use crate::{
        input::read_csv::*,
        output::{
            animation::*,
            plot::*,
        },
    };
}
