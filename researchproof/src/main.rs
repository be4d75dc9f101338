//! Command-line front end for checking [ResearchProof](researchproof_rs) theorem
//! scripts.

use annotate_snippets::Renderer;
use clap::Parser;
use log::LevelFilter;
use researchproof_rs::line_cache::LineCache;
use researchproof_rs::{
    parse_script, parse_signature, verify, CheckError, Diagnostic, SourceInfo, Theorem,
};
use simple_logger::SimpleLogger;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::process;
use std::sync::Arc;
use std::time::Instant;

/// A checker for ResearchProof theorem scripts
#[derive(Debug, clap::Parser)]
#[command(version, about, verbatim_doc_comment)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Prints milliseconds after each stage
    #[arg(long = "time", global = true)]
    timing: bool,
    /// Activates debug logs, including each theorem checked and how
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Verifies proofs with the built-in checker
    Verify {
        /// Path to a .rp proof script
        #[arg(value_name("FILE"))]
        file: String,
    },
    /// Writes a proof script back out with its signatures pretty-printed
    Render {
        /// Path to a .rp proof script
        #[arg(value_name("FILE"))]
        file: String,
        /// Output proof script path
        #[arg(value_name("OUTPUT"))]
        output: String,
        /// Module name recorded in the output header
        #[arg(long, value_name("NAME"), default_value = "GeneratedProofs")]
        module_name: String,
    },
}

/// A failure, together with the source it is rendered against.
struct Failure {
    source: SourceInfo,
    error: CheckError,
}

impl Failure {
    fn new(source: &SourceInfo, error: impl Into<CheckError>) -> Self {
        Failure {
            source: source.clone(),
            error: error.into(),
        }
    }
}

fn stage<T>(timing: bool, name: &str, f: impl FnOnce() -> T) -> T {
    let now = Instant::now();
    let out = f();
    if timing {
        println!("{name} {}ms", now.elapsed().as_millis());
    }
    out
}

fn load(file: &str, timing: bool) -> Result<(SourceInfo, Vec<Theorem>), Failure> {
    let text = stage(timing, "read", || fs::read_to_string(file)).map_err(|err| {
        let source = SourceInfo::new(file.to_owned(), Arc::default());
        Failure::new(&source, Diagnostic::from(err))
    })?;
    let source = SourceInfo::new(file.to_owned(), Arc::new(text));
    let theorems = stage(timing, "parse", || parse_script(&source.text))
        .map_err(|err| Failure::new(&source, err))?;
    Ok((source, theorems))
}

fn verify_file(file: &str, timing: bool) -> Result<String, Failure> {
    let (source, theorems) = load(file, timing)?;
    stage(timing, "verify", || verify(&theorems)).map_err(|err| Failure::new(&source, err))?;
    Ok(format!(
        "Verified {} theorem(s) from {file}.",
        theorems.len()
    ))
}

fn write_rendered(
    out: &mut impl Write,
    source: &SourceInfo,
    theorems: &[Theorem],
    module_name: &str,
) -> Result<(), CheckError> {
    writeln!(out, "# module {module_name}").map_err(Diagnostic::from)?;
    writeln!(out, "# rendered from {}", source.name).map_err(Diagnostic::from)?;
    for theorem in theorems {
        let signature = parse_signature(&theorem.signature).map_err(|diagnostic| CheckError {
            theorem: Some(theorem.name.clone()),
            line_number: theorem.line_number,
            span: theorem.signature_span,
            diagnostic,
        })?;
        writeln!(out).map_err(Diagnostic::from)?;
        writeln!(out, "theorem {} : {signature}", theorem.name).map_err(Diagnostic::from)?;
        writeln!(out, "proof {}", theorem.proof).map_err(Diagnostic::from)?;
    }
    out.flush().map_err(Diagnostic::from)?;
    Ok(())
}

fn render_file(
    file: &str,
    output: &str,
    module_name: &str,
    timing: bool,
) -> Result<String, Failure> {
    let (source, theorems) = load(file, timing)?;
    stage(timing, "render", || -> Result<(), CheckError> {
        let file = File::create(output).map_err(Diagnostic::from)?;
        write_rendered(&mut BufWriter::new(file), &source, &theorems, module_name)
    })
    .map_err(|err| Failure::new(&source, err))?;
    Ok(format!(
        "Rendered {} theorem(s) to {output}.",
        theorems.len()
    ))
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        SimpleLogger::new()
            .with_level(LevelFilter::Debug)
            .init()
            .unwrap_or_else(|err| eprintln!("Could not install logger: {err}"));
    }

    let result = match &cli.command {
        Command::Verify { file } => verify_file(file, cli.timing),
        Command::Render {
            file,
            output,
            module_name,
        } => render_file(file, output, module_name, cli.timing),
    };

    match result {
        Ok(summary) => println!("{summary}"),
        Err(Failure { source, error }) => {
            let r = Renderer::styled();
            let mut lc = LineCache::default();
            error.to_snippet(&source, &mut lc, |msg| println!("{}", r.render(msg)));
            process::exit(1);
        }
    }
}
