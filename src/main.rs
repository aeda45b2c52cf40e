use clap::{App, Arg, ArgMatches};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::exit;

use cshtools::*;

const POSITIONALS: [(&'static str, &'static str); 4] = [
    ("tooltipsfile", "Tooltip definitions edited in Flare."),
    ("linksfile", "Static help link definitions edited in Flare."),
    ("root_url", "Base url for link targets."),
    ("target_dir", "Where to put generated files."),
];

const OPTIONS: [(&'static str, &'static str); 5] = [
    ("-c, --config <file>", "TOML configuration file"),
    ("-n, --dry-run", "Output the template to standard output instead of writing it"),
    ("-v, --verbose", "Produce verbose output"),
    ("-d, --debug", "Output detailed debug information to standard error"),
    ("--strict", "Fail on data anomalies instead of tolerating them"),
];

fn common_arguments<'a>() -> Vec<clap::Arg<'a>> {
    let mut args: Vec<Arg> = Vec::new();
    args.push(
        Arg::with_name("verbose")
            .long("verbose")
            .short('v')
            .help("Produce verbose output")
            .required(false),
    );
    args.push(
        Arg::with_name("dry-run")
            .long("dry-run")
            .short('n')
            .help("Dry run, output the template to standard output instead of writing it to the target directory")
            .required(false),
    );
    args.push(
        Arg::with_name("debug")
            .long("debug")
            .short('d')
            .help("Output detailed debug information to standard error")
            .required(false),
    );
    args
}

fn config_arguments<'a>() -> Vec<clap::Arg<'a>> {
    let mut args: Vec<Arg> = Vec::new();
    args.push(
        Arg::with_name("config")
            .long("config")
            .short('c')
            .help("Configuration file (TOML) to adapt the extraction to differently structured Flare exports (table id, element and attribute names, output file name, etc.)")
            .takes_value(true),
    );
    args.push(
        Arg::with_name("strict")
            .long("strict")
            .help("Fail on data anomalies (missing GUI text table, anchors or map elements without the expected attributes) instead of tolerating them"),
    );
    args
}

fn positional_arguments<'a>() -> Vec<clap::Arg<'a>> {
    POSITIONALS
        .iter()
        .enumerate()
        .map(|(i, &(name, help))| {
            Arg::with_name(name)
                .help(help)
                .index(i + 1)
                .required(true)
                .allow_hyphen_values(true)
        })
        .collect()
}

fn app<'a>() -> App<'a> {
    App::new("csh")
        .about("Extracts context-sensitive help (tooltips and static help links) from Flare exports into a Pebble template.")
        .args(&common_arguments())
        .args(&config_arguments())
        .args(&positional_arguments())
}

fn usage() -> String {
    let mut usage = format!(
        "Usage: csh {}\n",
        POSITIONALS
            .iter()
            .map(|(name, _)| format!("<{}>", name))
            .collect::<Vec<_>>()
            .join(" ")
    );
    for (name, help) in POSITIONALS.iter() {
        usage += &format!("  {:<13} {}\n", name, help);
    }
    usage += &format!("csh {}, options:\n", VERSION);
    for (flags, help) in OPTIONS.iter() {
        usage += &format!("  {:<19} {}\n", flags, help);
    }
    usage
}

fn config_from_args(args: &ArgMatches) -> Result<CshConfig, String> {
    let mut config = if let Some(filename) = args.value_of("config") {
        let configdata = fs::read_to_string(filename)
            .map_err(|e| format!("Failure reading csh config file {}: {}", filename, e))?;
        CshConfig::from_toml_str(&configdata)
            .map_err(|e| format!("Syntax error in csh config file {}: {}", filename, e))?
    } else {
        CshConfig::new()
    };
    config = config.with_debug(args.is_present("debug"));
    if args.is_present("strict") {
        config = config.with_strict(true);
    }
    Ok(config)
}

fn run(args: &ArgMatches) -> Result<(), String> {
    let config = config_from_args(args)?;
    let verbose = args.is_present("verbose") || config.debug();
    let tooltipsfile = Path::new(args.value_of("tooltipsfile").expect("required"));
    let linksfile = Path::new(args.value_of("linksfile").expect("required"));
    let root_url = args.value_of("root_url").expect("required");
    let target_dir = Path::new(args.value_of("target_dir").expect("required"));

    let csh = build_csh(tooltipsfile, linksfile, root_url, &config).map_err(|e| format!("{}", e))?;
    if verbose {
        let texts = csh.iter().filter(|(_, entry)| entry.text.is_some()).count();
        let links = csh
            .iter()
            .filter(|(_, entry)| matches!(entry.link, Some(Some(_))))
            .count();
        eprintln!(
            "Extracted {} keys ({} with text, {} with a link)",
            csh.len(),
            texts,
            links
        );
    }

    if args.is_present("dry-run") {
        let template = csh.to_template_string(&config).map_err(|e| format!("{}", e))?;
        let mut stdout = io::stdout();
        stdout
            .write_all(template.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| format!("Failure writing to standard output: {}", e))?;
    } else {
        let filename = write_csh(&csh, target_dir, &config).map_err(|e| format!("{}", e))?;
        if verbose {
            eprintln!("Wrote {}", filename.display());
        }
    }
    Ok(())
}

fn main() {
    // anything but the four positionals (--help included) gets the usage and exit code 1
    let args = match app().try_get_matches() {
        Ok(args) => args,
        Err(_) => {
            print!("{}", usage());
            exit(1);
        }
    };

    if let Err(err) = run(&args) {
        eprintln!("[error] {}", &err);
        exit(1);
    }
}
