use serde::Serialize;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};
use crate::prelude::*;

pub trait Sof: Sized {
    fn sof_json<P: AsRef<Path>>(&self, path: P) -> io::Result<()>
    where
        Self: Serialize,
    {
        path.check_or_make_parent()?;
        let mut f = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut f, self)?;
        f.flush()
    }
}

impl<T> Sof for T {}
