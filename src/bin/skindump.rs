// Dump the object graph of a skin
//
//  This file is part of Wasabi.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Print the object graph of an unpacked skin.
//!
//! `skindump` interprets the skin in the given directory and prints an
//!   indented outline of its containers,
//!     layouts,
//!     layers,
//!     groups,
//!     and scripts,
//!   followed by any warnings.
//! A fatal error is rendered as a diagnostic report.

extern crate wasabi;

use getopts::{Fail, Options};
use std::{
    env,
    fmt::{self, Write},
};
use tracing_subscriber::EnvFilter;
use wasabi::{
    archive::DirArchive,
    diagnose::{ArchiveSpanResolver, Reporter, VisualReporter},
    skin::{
        ContextScoping, OrphanLayerPolicy, ParseOptions, RegionIndex,
        ScriptFailurePolicy, Skin, SkinParser,
    },
};

/// Types of commands
#[derive(Debug, PartialEq)]
enum Command {
    Dump(String, ParseOptions),
    Usage,
}

/// Entrypoint for the skin dumper
pub fn main() {
    // Warnings are rendered as reports below;
    //   tracing output is for debugging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = &args[0];
    let opts = get_opts();
    let usage = opts.usage(&format!("Usage: {program} [OPTIONS] SKIN_DIR"));

    match parse_options(opts, args) {
        Ok(Command::Dump(dir, parse_opts)) => {
            std::process::exit(dump(&dir, parse_opts))
        }
        Ok(Command::Usage) => {
            println!("{usage}");
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            eprintln!("{e}");
            println!("{usage}");
            std::process::exit(exitcode::USAGE);
        }
    }
}

/// Interpret the skin in `dir` and print it,
///   returning the process exit code.
fn dump(dir: &str, opts: ParseOptions) -> exitcode::ExitCode {
    let archive = match DirArchive::open(dir) {
        Ok(archive) => archive,
        Err(e) => {
            eprintln!("error: {e}");
            return exitcode::NOINPUT;
        }
    };

    let mut reporter = VisualReporter::new(ArchiveSpanResolver::new(&archive));

    match SkinParser::new(&archive).with_options(opts).parse() {
        Ok(skin) => {
            let mut out = String::new();

            // Writing to a `String` cannot fail.
            let _ = write_skin(&skin, &mut out);
            print!("{out}");

            for warning in skin.warnings() {
                println!("{}", reporter.render(warning));
            }

            exitcode::OK
        }

        Err(e) => {
            // Rendering to a string ensures that the report is not
            //   interleaved with other output.
            let report = reporter.render(&e).to_string();
            println!("{report}\nfatal: failed to load skin `{dir}`");

            exitcode::DATAERR
        }
    }
}

/// Get 'Options'
fn get_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt("", "root", "root document (default skin.xml)", "PATH");
    opts.optflag(
        "",
        "flat-context",
        "do not restore ancestor context when leaving an element",
    );
    opts.optflag("", "strict-layers", "fail on layers outside of a layout");
    opts.optflag("", "strict-scripts", "fail on scripts that cannot be decoded");
    opts.optflag("h", "help", "print this help menu");

    opts
}

/// Option parser
fn parse_options(opts: Options, args: Vec<String>) -> Result<Command, Fail> {
    let matches = opts.parse(&args[1..])?;

    if matches.opt_present("h") {
        return Ok(Command::Usage);
    }

    let dir = match matches.free.len() {
        0 => return Err(Fail::OptionMissing(String::from("SKIN_DIR"))),
        1 => matches.free[0].clone(),
        _ => return Err(Fail::UnrecognizedOption(matches.free[1].clone())),
    };

    let mut parse_opts = ParseOptions::default();

    if let Some(root) = matches.opt_str("root") {
        parse_opts.root_document = root;
    }

    if matches.opt_present("flat-context") {
        parse_opts.scoping = ContextScoping::Flat;
    }

    if matches.opt_present("strict-layers") {
        parse_opts.orphan_layers = OrphanLayerPolicy::Fail;
    }

    if matches.opt_present("strict-scripts") {
        parse_opts.script_failures = ScriptFailurePolicy::Abort;
    }

    Ok(Command::Dump(dir, parse_opts))
}

fn label(id: Option<&str>) -> &str {
    id.unwrap_or("(anonymous)")
}

/// Write an indented outline of `skin`.
fn write_skin<W: Write>(skin: &Skin, out: &mut W) -> fmt::Result {
    if let Some(info) = skin.info() {
        writeln!(
            out,
            "skin {} {}",
            label(info.name()),
            info.version().unwrap_or("")
        )?;
    }

    for &c in skin.containers() {
        writeln!(out, "container {}", label(skin.get(c).id()))?;

        for l in skin.layouts(c) {
            writeln!(out, "  layout {}", label(skin.get(l).id()))?;

            for layer in skin.layers(l) {
                writeln!(out, "    layer {}", label(skin.get(layer).id()))?;
            }

            write_region(skin, l.into(), 2, out)?;
        }
    }

    for &g in skin.groups() {
        writeln!(out, "group {}", label(skin.get(g).id()))?;
        write_region(skin, g.into(), 1, out)?;
    }

    for &g in skin.group_defs() {
        writeln!(out, "groupdef {}", label(skin.get(g).id()))?;
        write_region(skin, g.into(), 1, out)?;
    }

    writeln!(out, "bitmaps: {}", skin.bitmaps().len())
}

/// Write the scripts and nested groups of `region`.
fn write_region<W: Write>(
    skin: &Skin,
    region: RegionIndex,
    depth: usize,
    out: &mut W,
) -> fmt::Result {
    let indent = "  ".repeat(depth);

    for s in skin.system_objects(region) {
        let sysobj = skin.get(s);
        writeln!(out, "{indent}script {} ({})", sysobj.id(), sysobj.file())?;
    }

    for g in skin.child_groups(region) {
        writeln!(out, "{indent}group {}", label(skin.get(g).id()))?;
        write_region(skin, g.into(), depth + 1, out)?;
    }

    Ok(())
}
