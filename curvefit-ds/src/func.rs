use std::{fs, io, path::Path};
use crate::prelude::*;

pub trait Pip: Sized {
    fn pip<F: Fn(Self) -> T, T>(self, f: F) -> T {
        f(self)
    }
}
impl<T> Pip for T {}

pub trait FileStr: AsRef<Path> {
    fn check_or_make(&self) -> io::Result<()> {
        match self.as_ref().exists() {
            true => Ok(()),
            false => fs::create_dir_all(self.as_ref()),
        }
    }

    /// Creates the parent directory of a file path if it is missing.
    fn check_or_make_parent(&self) -> io::Result<()> {
        match self.as_ref().parent() {
            Some(p) if !p.as_os_str().is_empty() => p.check_or_make(),
            _ => Ok(()),
        }
    }
}
impl<T: AsRef<Path>> FileStr for T {}

pub trait Arange {
    fn arange(self) -> v32;
}

impl Arange for usize {
    fn arange(self) -> v32 {
        (0..self).map(|i| i as f32).collect_vec()
    }
}

pub trait MinMax {
    /// Bounds over the finite values, `None` when there are none.
    fn min_max(&self) -> Option<(f32, f32)>;
}

impl MinMax for [f32] {
    fn min_max(&self) -> Option<(f32, f32)> {
        self.iter()
            .filter(|x| x.is_finite())
            .fold(None, |acc, &x| match acc {
                None => Some((x, x)),
                Some((l, u)) => Some((l.min(x), u.max(x))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_skips_non_finite() {
        let data = [3., f32::NAN, -1., f32::INFINITY, 7.];
        assert_eq!(data.min_max(), Some((-1., 7.)));
        let empty: [f32; 0] = [];
        assert_eq!(empty.min_max(), None);
    }

    #[test]
    fn arange_counts_from_zero() {
        assert_eq!(4usize.arange(), vec![0., 1., 2., 3.]);
        assert!(0usize.arange().is_empty());
    }

    #[test]
    fn check_or_make_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("app/models");
        dir.check_or_make().unwrap();
        fs::write(dir.join("cases.mpk"), b"x").unwrap();
        dir.check_or_make().unwrap();
        assert!(dir.join("cases.mpk").is_file());
    }

    #[test]
    fn check_or_make_parent_creates_missing_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a/b/curve.gif");
        file.check_or_make_parent().unwrap();
        assert!(tmp.path().join("a/b").is_dir());
        "curve.gif".check_or_make_parent().unwrap();
    }
}
