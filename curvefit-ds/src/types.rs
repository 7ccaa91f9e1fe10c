#![allow(non_camel_case_types)]

pub type v32 = Vec<f32>;
pub type vi64 = Vec<i64>;
pub type hm<K, V> = std::collections::HashMap<K, V>;
