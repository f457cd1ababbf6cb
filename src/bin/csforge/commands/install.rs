//! `csforge install` command

use std::time::Instant;

use anyhow::Result;

use crate::cli::InstallArgs;
use crate::render::drain_events;
use csforge::backend::BackendSet;
use csforge::ops::{provision_sdk, CompileEvent, Runner};
use csforge::util::config::load_config;
use csforge::util::shell::{Shell, Status};
use csforge::GlobalContext;

pub fn execute(args: InstallArgs, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let config = load_config(&ctx.config_path(), &ctx.project_config_path());
    let channel = args.channel.unwrap_or(config.install.channel);

    let mut runner = Runner::new();
    let worker_ctx = ctx.clone();
    let rx = runner
        .try_spawn(move |sink| {
            let start = Instant::now();
            sink.emit(CompileEvent::started("install"));

            let result = provision_sdk(&worker_ctx, &channel, &sink);
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(()) => sink.emit(CompileEvent::finished(true, duration_ms)),
                Err(e) => {
                    sink.emit(CompileEvent::error(format!("{:#}", e)));
                    sink.emit(CompileEvent::finished(false, duration_ms));
                }
            }
        })
        .expect("fresh runner is never busy");

    let spinner = shell.spinner("installing dotnet SDK");
    let success = drain_events(shell, &spinner, rx);
    spinner.finish_and_clear();
    runner.join();

    if !success {
        std::process::exit(1);
    }

    // Confirm the install actually made a backend visible.
    match BackendSet::detect(&ctx).dotnet {
        Some(path) => shell.status(Status::Installed, path.display().to_string()),
        None => shell.warn("install finished but no dotnet binary was detected"),
    }

    Ok(())
}
