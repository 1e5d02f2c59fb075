//! Configuration and runner for the `bag-pattern` binary.
//!
//! Settings come from the environment first, then command-line flags override:
//!
//! | Variable | Flag | Default |
//! |----------|------|---------|
//! | `BAG_PATTERN` | `--pattern P` | `[@]~` |
//! | `BAG_COUNT` | `--count N` | 14 |
//! | `BAG_SEED` | `--seed S` | 1 |
//! | `BAG_CATALOGUE` | `--catalogue FILE` | standard seven pieces |
//! | `BAG_TRACE` | `--trace` | off |
//! | `NO_COLOR` | `--no-color` | colour on a terminal |

use std::fs;

use anyhow::{anyhow, Context, Result};

use crate::core::{parse, presets, tokenize, BagGenerator, PieceCatalogue};
use crate::render::{encode_keys_into, encode_report_into, SequenceReport};

pub const USAGE: &str = "\
usage: bag-pattern [--pattern P] [--count N] [--seed S] [--catalogue FILE]
                   [--json | --tokens | --tree] [--trace] [--no-color]

Prints the next N pieces a Bag-Pattern produces.
  --pattern P       pattern to run (default \"[@]~\")
  --count N         number of pieces to show (default 14, at most 100000)
  --seed S          shuffle seed (default 1)
  --catalogue FILE  JSON array of piece definitions (default: standard T I O L J S Z)
  --json            print a JSON report instead of keys
  --tokens          print the token stream and exit
  --tree            print the parsed pattern tree and exit
  --trace           log generator progress to stderr
  --no-color        never colour piece keys
";

/// Largest `--count`; the whole window is buffered before printing.
pub const MAX_COUNT: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Keys,
    Json,
    Tokens,
    Tree,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub pattern: String,
    pub count: usize,
    pub seed: u32,
    pub catalogue_path: Option<String>,
    pub output: OutputMode,
    pub trace: bool,
    pub no_color: bool,
    pub help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern: presets::STANDARD_PATTERN.to_string(),
            count: 14,
            seed: 1,
            catalogue_path: None,
            output: OutputMode::Keys,
            trace: false,
            no_color: false,
            help: false,
        }
    }
}

fn is_truthy(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}

impl Config {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let pattern = lookup("BAG_PATTERN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.pattern);

        let count = lookup("BAG_COUNT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.count);

        let seed = lookup("BAG_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);

        let catalogue_path = lookup("BAG_CATALOGUE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let trace = lookup("BAG_TRACE").map(|v| is_truthy(&v)).unwrap_or(false);
        let no_color = lookup("NO_COLOR").is_some_and(|v| !v.is_empty());

        Self {
            pattern,
            count,
            seed,
            catalogue_path,
            output: OutputMode::Keys,
            trace,
            no_color,
            help: false,
        }
    }

    /// Override settings with command-line flags
    pub fn apply_args(mut self, args: &[String]) -> Result<Self> {
        let mut i = 0usize;
        while i < args.len() {
            match args[i].as_str() {
                "--pattern" => {
                    self.pattern = flag_value(args, &mut i, "--pattern")?.to_string();
                }
                "--count" => {
                    let v = flag_value(args, &mut i, "--count")?;
                    let count = v
                        .parse()
                        .map_err(|_| anyhow!("bag-pattern: invalid --count value: {}", v))?;
                    self.count = check_count(count)?;
                }
                "--seed" => {
                    let v = flag_value(args, &mut i, "--seed")?;
                    self.seed = v
                        .parse()
                        .map_err(|_| anyhow!("bag-pattern: invalid --seed value: {}", v))?;
                }
                "--catalogue" => {
                    self.catalogue_path = Some(flag_value(args, &mut i, "--catalogue")?.to_string());
                }
                "--json" => self.output = OutputMode::Json,
                "--tokens" => self.output = OutputMode::Tokens,
                "--tree" => self.output = OutputMode::Tree,
                "--trace" => self.trace = true,
                "--no-color" => self.no_color = true,
                "-h" | "--help" => self.help = true,
                other => {
                    return Err(anyhow!("bag-pattern: unknown argument: {}", other));
                }
            }
            i += 1;
        }
        Ok(self)
    }
}

fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("bag-pattern: missing value for {}", flag))
}

fn check_count(count: usize) -> Result<usize> {
    if count > MAX_COUNT {
        return Err(anyhow!(
            "bag-pattern: --count {} exceeds the limit of {}",
            count,
            MAX_COUNT
        ));
    }
    Ok(count)
}

/// The configured catalogue, or the standard preset
pub fn load_catalogue(config: &Config) -> Result<PieceCatalogue> {
    let Some(path) = config.catalogue_path.as_deref() else {
        return Ok(presets::standard());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("bag-pattern: cannot read catalogue {}", path))?;
    PieceCatalogue::from_json(&json)
        .with_context(|| format!("bag-pattern: invalid catalogue {}", path))
}

/// Run the configured command, writing its output into `out`.
pub fn run(config: &Config, out: &mut Vec<u8>, colored: bool) -> Result<()> {
    let count = check_count(config.count)?;
    let catalogue = load_catalogue(config)?;
    let keys = catalogue.keys();

    match config.output {
        OutputMode::Tokens => {
            let tokens = tokenize(&config.pattern, &keys)
                .with_context(|| format!("bag-pattern: cannot tokenize {:?}", config.pattern))?;
            serde_json::to_writer(&mut *out, &tokens)?;
            out.push(b'\n');
            return Ok(());
        }
        OutputMode::Tree => {
            let pattern = parse(&config.pattern, &keys)
                .with_context(|| format!("bag-pattern: cannot parse {:?}", config.pattern))?;
            serde_json::to_writer_pretty(&mut *out, &pattern)?;
            out.push(b'\n');
            return Ok(());
        }
        OutputMode::Keys | OutputMode::Json => {}
    }

    let mut bag = BagGenerator::with_seed(catalogue, &config.pattern, config.seed)
        .with_context(|| format!("bag-pattern: cannot build bag for {:?}", config.pattern))?;
    if config.trace {
        eprintln!(
            "[Bag] pattern {} over {} key(s), seed {}",
            bag.pattern(),
            keys.len(),
            config.seed
        );
    }

    let pieces = bag.peek_keys(count)?;
    // The traversal ends as soon as the last piece is emitted, so a drained
    // bag has nothing beyond the window.
    let exhausted = bag.is_drained();
    if config.trace && pieces.len() < count {
        eprintln!("[Bag] sequence exhausted after {} piece(s)", pieces.len());
    }

    match config.output {
        OutputMode::Json => {
            let report = SequenceReport {
                pattern: &config.pattern,
                seed: config.seed,
                length: bag.pattern().finite_len(),
                pieces: pieces.iter().map(|k| k.to_string()).collect(),
                exhausted,
            };
            encode_report_into(&report, out)
        }
        _ => encode_keys_into(&pieces, colored, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_values() {
        let config = Config::from_lookup(|name| match name {
            "BAG_PATTERN" => Some(" (TIO)*2 ".into()),
            "BAG_COUNT" => Some("3".into()),
            "BAG_SEED" => Some("not-a-number".into()),
            "BAG_TRACE" => Some("TRUE".into()),
            _ => None,
        });
        assert_eq!(config.pattern, "(TIO)*2");
        assert_eq!(config.count, 3);
        assert_eq!(config.seed, 1);
        assert!(config.trace);
    }

    #[test]
    fn test_flags_override_env() {
        let config = Config::from_lookup(|name| (name == "BAG_COUNT").then(|| "3".to_string()))
            .apply_args(&args(&["--count", "9", "--pattern", "@", "--json"]))
            .unwrap();
        assert_eq!(config.count, 9);
        assert_eq!(config.pattern, "@");
        assert_eq!(config.output, OutputMode::Json);
    }

    #[test]
    fn test_flag_errors() {
        let err = Config::default()
            .apply_args(&args(&["--count", "x"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "bag-pattern: invalid --count value: x");

        let err = Config::default().apply_args(&args(&["--seed"])).unwrap_err();
        assert_eq!(err.to_string(), "bag-pattern: missing value for --seed");

        let err = Config::default().apply_args(&args(&["--bogus"])).unwrap_err();
        assert_eq!(err.to_string(), "bag-pattern: unknown argument: --bogus");
    }

    #[test]
    fn test_run_plain_keys() {
        let config = Config {
            pattern: "(TIO)*2LJ*2".into(),
            count: 9,
            ..Config::default()
        };
        let mut out = Vec::new();
        run(&config, &mut out, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "T I O T I O L J J\n");
    }

    #[test]
    fn test_run_json_marks_exhaustion() {
        let config = Config {
            pattern: "TI".into(),
            count: 2,
            output: OutputMode::Json,
            ..Config::default()
        };
        let mut out = Vec::new();
        run(&config, &mut out, false).unwrap();
        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["pieces"], serde_json::json!(["T", "I"]));
        assert_eq!(report["exhausted"], serde_json::json!(true));
    }

    #[test]
    fn test_count_limit() {
        let huge = usize::MAX.to_string();
        let err = Config::default()
            .apply_args(&args(&["--pattern", "TI", "--count", huge.as_str(), "--json"]))
            .unwrap_err();
        assert!(err.to_string().contains("exceeds the limit"));

        // Counts from the environment are checked when running.
        let config = Config {
            pattern: "TI".into(),
            count: usize::MAX,
            output: OutputMode::Json,
            ..Config::default()
        };
        let err = run(&config, &mut Vec::new(), false).unwrap_err();
        assert!(err.to_string().contains("exceeds the limit"));
    }

    #[test]
    fn test_run_json_at_count_limit() {
        let config = Config::default()
            .apply_args(&args(&["--pattern", "TI", "--count", MAX_COUNT.to_string().as_str(), "--json"]))
            .unwrap();
        let mut out = Vec::new();
        run(&config, &mut out, false).unwrap();
        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["pieces"], serde_json::json!(["T", "I"]));
        assert_eq!(report["length"], serde_json::json!(2));
        assert_eq!(report["exhausted"], serde_json::json!(true));
    }

    #[test]
    fn test_run_json_open_window() {
        for (pattern, length) in [("TIO", serde_json::json!(3)), ("[@]~", serde_json::Value::Null)] {
            let config = Config {
                pattern: pattern.into(),
                count: 2,
                output: OutputMode::Json,
                ..Config::default()
            };
            let mut out = Vec::new();
            run(&config, &mut out, false).unwrap();
            let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(report["length"], length, "pattern {pattern}");
            assert_eq!(report["exhausted"], serde_json::json!(false), "pattern {pattern}");
        }
    }

    #[test]
    fn test_run_tokens_and_tree() {
        let mut out = Vec::new();
        let tokens = Config {
            pattern: "T*2~".into(),
            output: OutputMode::Tokens,
            ..Config::default()
        };
        run(&tokens, &mut out, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[{\"type\":\"PIECE\",\"value\":\"T\"},{\"type\":\"*\"},{\"type\":\"NUMBER\",\"value\":2},{\"type\":\"~\"}]\n"
        );

        let mut out = Vec::new();
        let tree = Config {
            pattern: "[TI]".into(),
            output: OutputMode::Tree,
            ..Config::default()
        };
        run(&tree, &mut out, false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["children"][0]["type"], "random-group");
        assert_eq!(value["children"][0]["pick_count"], 2);
        assert_eq!(value["repeat_last_element"], false);
    }

    #[test]
    fn test_run_reports_bad_pattern() {
        let config = Config {
            pattern: "TIO X".into(),
            ..Config::default()
        };
        let err = run(&config, &mut Vec::new(), false).unwrap_err();
        assert!(err.to_string().contains("cannot build bag"));
        assert!(format!("{err:#}").contains("index 4"));
    }
}
