use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

pub const USAGE: &str = "usage: curvefit <cases|deaths> <days> [--train] [--plot] [--config <path>] [--output <path>]";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    pub series: String,
    pub days: usize,
    pub train: bool,
    pub plot: bool,
    pub config: Option<String>,
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut res = Args::default();
        let mut positional = vec![];
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--train" => res.train = true,
                "--plot" => res.plot = true,
                "--config" => {
                    res.config = Some(iter.next().ok_or_else(|| anyhow!("--config needs a path\n{}", USAGE))?);
                }
                "--output" => {
                    res.output = Some(iter.next().ok_or_else(|| anyhow!("--output needs a path\n{}", USAGE))?.into());
                }
                "-h" | "--help" => bail!("{}", USAGE),
                s if s.starts_with("--") => bail!("unknown flag {}\n{}", s, USAGE),
                _ => positional.push(arg),
            }
        }
        match positional.as_slice() {
            [series, days] => {
                res.series = series.clone();
                res.days = days
                    .parse()
                    .map_err(|_| anyhow!("days must be a non-negative integer, got {:?}\n{}", days, USAGE))?;
                Ok(res)
            }
            _ => bail!("{}", USAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Args> {
        Args::parse(s.split_whitespace().map(String::from))
    }

    #[test]
    fn positional_and_flags() {
        let args = parse("deaths 14 --train --config cf.toml --output out.json").unwrap();
        assert_eq!(args.series, "deaths");
        assert_eq!(args.days, 14);
        assert!(args.train);
        assert!(!args.plot);
        assert_eq!(args.config.as_deref(), Some("cf.toml"));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn flags_may_come_first() {
        let args = parse("--plot cases 0").unwrap();
        assert_eq!((args.series.as_str(), args.days, args.plot), ("cases", 0, true));
    }

    #[test]
    fn bad_input_is_rejected() {
        assert!(parse("cases").is_err());
        assert!(parse("cases -3").is_err());
        assert!(parse("cases 3 --verbose").is_err());
        assert!(parse("cases 3 --config").is_err());
    }
}
