//! `csforge build` command

use std::time::Instant;

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::render::drain_events;
use csforge::backend::plan::DEFAULT_TARGET_FRAMEWORK;
use csforge::backend::{BackendPreference, TargetKind};
use csforge::ops::{compile, CompileEvent, CompileOptions, Runner};
use csforge::util::config::load_config;
use csforge::util::shell::Shell;
use csforge::GlobalContext;

pub fn execute(args: BuildArgs, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;

    // Load configuration (global + project)
    let config = load_config(&ctx.config_path(), &ctx.project_config_path());

    // CLI overrides config, config overrides defaults
    let preference = if let Some(ref b) = args.backend {
        b.parse::<BackendPreference>()
            .map_err(|e| anyhow::anyhow!(e))?
    } else {
        config.backend().unwrap_or_default()
    };

    let target_kind = args
        .target_kind
        .as_ref()
        .map(|s| s.parse::<TargetKind>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let opts = CompileOptions {
        source: args.source,
        output: args.output,
        preference,
        target_kind,
        self_contained: args
            .self_contained
            .or(config.build.self_contained)
            .unwrap_or(true),
        single_file: args.single_file.or(config.build.single_file).unwrap_or(true),
        base_framework: config
            .build
            .target_framework
            .clone()
            .unwrap_or_else(|| DEFAULT_TARGET_FRAMEWORK.to_string()),
        channel: config.install.channel.clone(),
        offline: args.offline || config.install.offline,
    };

    let mut runner = Runner::new();
    let worker_ctx = ctx.clone();
    let rx = runner
        .try_spawn(move |sink| {
            let start = Instant::now();
            sink.emit(CompileEvent::started("compile"));

            let result = compile(&worker_ctx, &opts, &sink);
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(_) => sink.emit(CompileEvent::finished(true, duration_ms)),
                Err(e) => {
                    sink.emit(CompileEvent::error(e.to_string()));
                    if let Some(hint) = e.hint() {
                        sink.emit(CompileEvent::note(hint));
                    }
                    sink.emit(CompileEvent::finished(false, duration_ms));
                }
            }
        })
        .expect("fresh runner is never busy");

    let spinner = shell.spinner("compiling");
    let success = drain_events(shell, &spinner, rx);
    spinner.finish_and_clear();
    runner.join();

    if !success {
        // The failure has already been rendered as an error event.
        std::process::exit(1);
    }

    Ok(())
}
