//! rope-edit - apply a TOML edit script to a document
//!
//! Usage: rope-edit <script.toml>

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tiny_rope_edit::{io, run, EditScript};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("tiny_rope_edit=info,tiny_rope=warn"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }
    let [script_path] = args.as_slice() else {
        print_help();
        bail!("expected exactly one script path");
    };
    let script_path = PathBuf::from(script_path);

    let script = EditScript::load(&script_path)
        .with_context(|| format!("loading {}", script_path.display()))?;
    let session = run(&script).context("running edit script")?;
    let stats = session.stats();
    let rope = session.finish();

    let written = match &script.output.path {
        Some(path) => {
            let path = script.resolve(path);
            io::save(&rope, &path).with_context(|| format!("writing {}", path.display()))?
        }
        None => io::write(&rope, &mut std::io::stdout().lock()).context("writing to stdout")?,
    };
    tracing::info!(written, "done");

    if script.output.stats {
        eprintln!("{stats}");
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        "rope-edit <script.toml>

Applies the [[ops]] of an edit script to its [input] and writes the result
to [output].path, or stdout. Set RUST_LOG=debug to trace each edit.

Ops: slice, drop_prefix, drop_postfix, append, prepend, insert, delete,
     undo, redo"
    );
}
