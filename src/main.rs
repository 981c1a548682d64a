//! # mkfon CLI
//!
//! Usage:
//!   mkfon font1.fnt font2.fnt -o out.fon
//!   mkfon *.fnt -o out.fon -N "Terminal" --report
//!   mkfon --list out.fon

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use mkfon::{FonError, FonInfo, FonOptions};

const USAGE: &str = "\
usage: mkfon FNT... -o OUTFILE [-N FACENAME] [--report] [-v]
       mkfon --list FONFILE

Combine .FNT bitmap fonts into a .FON font library.

  -o, --outfile PATH    output .FON file (required)
  -N, --facename NAME   face name for the library; inferred when omitted
      --report          print the section layout as JSON
      --list PATH       list the fonts in an existing .FON file
  -v, --verbose         more logging (repeat for debug output)
  -h, --help            show this help";

#[derive(Debug, Default)]
struct Args {
    inputs: Vec<PathBuf>,
    outfile: Option<PathBuf>,
    face_name: Option<String>,
    report: bool,
    list: Option<PathBuf>,
    verbosity: u8,
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        let flag = arg.as_str();
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", flag))
        };
        match flag {
            "-h" | "--help" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            "-o" | "--outfile" => args.outfile = Some(PathBuf::from(value(flag)?)),
            "-N" | "--facename" => args.face_name = Some(value(flag)?),
            "--list" => args.list = Some(PathBuf::from(value(flag)?)),
            "--report" => args.report = true,
            "-v" | "--verbose" => args.verbosity += 1,
            "-vv" => args.verbosity += 2,
            s if s.starts_with('-') && s.len() > 1 => {
                return Err(format!("unknown option {}", s));
            }
            s => args.inputs.push(PathBuf::from(s)),
        }
    }

    if args.list.is_none() {
        if args.inputs.is_empty() {
            return Err("at least one .FNT file is required".to_string());
        }
        if args.outfile.is_none() {
            return Err("an output file is required (-o)".to_string());
        }
    }
    Ok(args)
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn read(path: &Path) -> Result<Vec<u8>, FonError> {
    fs::read(path).map_err(|source| FonError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn list(path: &Path) -> Result<(), FonError> {
    let data = read(path)?;
    let info = FonInfo::parse(&data)?;
    println!("{}: module {:?}", path.display(), info.module_name);
    println!("  {}", info.description);
    for font in info.fonts() {
        let face = info
            .font_face_name(&data, font)
            .unwrap_or_else(|| "?".to_string());
        println!(
            "  font {:#06x}  offset {:#08x}  {:>6} bytes  {}",
            font.id, font.offset, font.len, face
        );
    }
    Ok(())
}

fn build(args: &Args, outfile: &Path) -> Result<(), FonError> {
    let mut fonts = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        log::debug!("reading {}", path.display());
        fonts.push(read(path)?);
    }

    let options = FonOptions {
        face_name: args.face_name.clone(),
    };
    let image = mkfon::build_fon_with_layout(&fonts, &options)?;

    fs::write(outfile, &image.bytes).map_err(|source| FonError::Io {
        path: outfile.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} bytes to {}", image.bytes.len(), outfile.display());

    if args.report {
        match serde_json::to_string_pretty(&image.layout) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("could not serialize layout: {}", e),
        }
    }
    Ok(())
}

fn main() {
    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("mkfon: {}\n\n{}", msg, USAGE);
            process::exit(2);
        }
    };
    init_logging(args.verbosity);

    let result = match (&args.list, &args.outfile) {
        (Some(path), _) => list(path),
        (None, Some(outfile)) => build(&args, outfile),
        (None, None) => unreachable!("parse_args requires an output file"),
    };

    if let Err(e) = result {
        eprintln!("mkfon: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_build_args() {
        let raw = strings(&["a.fnt", "-N", "Terminal", "b.fnt", "-o", "out.fon", "-v"]);
        let args = parse_args(&raw).unwrap();
        assert_eq!(args.inputs, vec![PathBuf::from("a.fnt"), PathBuf::from("b.fnt")]);
        assert_eq!(args.outfile, Some(PathBuf::from("out.fon")));
        assert_eq!(args.face_name.as_deref(), Some("Terminal"));
        assert_eq!(args.verbosity, 1);
        assert!(!args.report);
    }

    #[test]
    fn test_parse_requires_outfile() {
        assert!(parse_args(&strings(&["a.fnt"])).is_err());
        assert!(parse_args(&strings(&["-o", "out.fon"])).is_err());
        assert!(parse_args(&strings(&["a.fnt", "-o"])).is_err());
    }

    #[test]
    fn test_parse_list_mode() {
        let args = parse_args(&strings(&["--list", "x.fon"])).unwrap();
        assert_eq!(args.list, Some(PathBuf::from("x.fon")));
    }

    #[test]
    fn test_parse_rejects_unknown_option() {
        assert!(parse_args(&strings(&["a.fnt", "-o", "x", "--bogus"])).is_err());
    }
}
