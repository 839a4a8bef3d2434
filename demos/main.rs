//! `search-cli` — a small external caller exercising the engine's public
//! API: registers file sources, runs one query, and prints matches with
//! surrounding context. Illustrative scaffolding, not part of the core
//! contract.

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use textsearch::{Config, Engine, SourceInput};

use args::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env();
    let engine = Engine::new(config);

    for path in args.paths() {
        let name = path
            .file_name()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("source")
            .to_string();

        if args.verbose() {
            eprintln!("registering source: {name} ({})", path.display());
        }

        engine
            .add_source(&name, SourceInput::Path(path.clone()))
            .with_context(|| format!("failed to register source {}", path.display()))?;

        if args.verbose() {
            let registered = engine.list_names();
            eprintln!("registered sources: {registered:?}");
        }
    }

    if args.verbose() {
        print_verbose_config(&engine);
    }

    let result = engine.search(args.query())?;

    if result.is_empty() {
        println!("no matches for {:?}", args.query());
        return Ok(());
    }

    for (source, positions) in &result {
        for &pos in positions {
            let before = pos.saturating_sub(args.context());
            let context_len = args.context() * 2 + args.query().chars().count();
            let snippet = engine
                .get_slice(source, before, context_len)
                .unwrap_or_default();
            println!("{source}@{pos}: {snippet}");
        }
    }

    Ok(())
}

fn print_verbose_config(engine: &Engine) {
    let config = engine.config();
    eprintln!("load-to-memory-limit {}", config.load_to_memory_limit());
    eprintln!("build-index-limit {}", config.build_index_limit());
    eprintln!("cache-enabled {}", config.cache_enabled());
}
