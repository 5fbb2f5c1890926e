/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use log::{error, info, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use puflib::{Module, ModuleStatus, Provisioning, PufError};

use args::{Args, Command};

mod args;
mod interact;

fn main() -> ExitCode {
    let status = run();
    if let Err(ref err) = status {
        error!("{:?}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logger().with_context(|| "failed to init logger")?;

    puflib::set_status_handler(interact::status_handler);
    if !args.non_interactive {
        puflib::set_query_handler(interact::query_handler);
    }

    match args.command.unwrap_or(Command::List) {
        Command::List => do_list(true),
        Command::Provisioned => do_list(false),
        Command::Provision { module } => do_provision(&module, false),
        Command::Continue { module } => do_provision(&module, true),
        Command::Deprovision { modules } => {
            for_each_module(&modules, "deprovision", puflib::deprovision)
        }
        Command::Enable { modules } => for_each_module(&modules, "enable", puflib::enable),
        Command::Disable { modules } => for_each_module(&modules, "disable", puflib::disable),
    }
}

fn init_logger() -> anyhow::Result<()> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l})} {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Print the module table. With `include_all` every registered module is
/// listed; otherwise only provisioned-and-enabled ones.
fn do_list(include_all: bool) -> anyhow::Result<()> {
    println!(
        "{:<20} {:<15} {:<15} {:<15}",
        "MODULE", "HWSUPPORT", "PROVISIONED", "ENABLED"
    );

    for module in puflib::get_modules().iter().copied() {
        let hw_supported = module.is_hw_supported();
        let status = puflib::module_status(module).with_context(|| {
            format!("failed to derive status of module \"{}\"", module.name())
        })?;
        let provisioned = status.contains(ModuleStatus::PROVISIONED);
        let enabled = !status.contains(ModuleStatus::DISABLED);

        if include_all || (provisioned && enabled) {
            println!(
                "{:<20} {:<15} {:<15} {:<15}",
                module.name(),
                if hw_supported { "supported" } else { "not-supp" },
                if provisioned { "provisioned" } else { "not-prov" },
                if enabled { "enabled" } else { "disabled" },
            );
        }
    }

    Ok(())
}

fn do_provision(name: &str, cont: bool) -> anyhow::Result<()> {
    let module = match puflib::get_module(name) {
        Some(module) => module,
        None => bail!("module \"{}\" not found", name),
    };

    let status = puflib::module_status(module)
        .with_context(|| format!("failed to derive status of module \"{}\"", name))?;
    if status.contains(ModuleStatus::PROVISIONED) {
        bail!("cannot provision module \"{}\": already provisioned", name);
    }
    if !cont && status.contains(ModuleStatus::IN_PROGRESS) {
        bail!(
            "cannot provision module \"{}\": already started provisioning. Try \"continue\"",
            name
        );
    }
    if cont && !status.contains(ModuleStatus::IN_PROGRESS) {
        bail!(
            "cannot continue provisioning module \"{}\": haven't started yet. Try \"provision\"",
            name
        );
    }
    if !module.is_hw_supported() {
        bail!("module \"{}\" does not support this hardware", name);
    }

    match module.provision() {
        Ok(Provisioning::Complete) => {
            info!("module \"{}\" is provisioned", name);
            Ok(())
        }
        Ok(Provisioning::Incomplete) => {
            info!(
                "provisioning is incomplete; run \"pufctl continue {}\" to resume",
                name
            );
            Ok(())
        }
        Ok(Provisioning::NotSupported) => {
            bail!("module \"{}\" does not support this hardware", name)
        }
        Err(PufError::Canceled) => bail!("provisioning of module \"{}\" was canceled", name),
        Err(err) => {
            Err(err).with_context(|| format!("failed to provision module \"{}\"", name))
        }
    }
}

/// Run a lifecycle operation over several modules, refusing the whole batch
/// up front if any of the names is unknown.
fn for_each_module(
    names: &[String],
    action: &str,
    op: fn(&dyn Module) -> puflib::Result<()>,
) -> anyhow::Result<()> {
    for name in names {
        if puflib::get_module(name).is_none() {
            bail!("cannot {} module \"{}\": does not exist", action, name);
        }
    }

    for name in names {
        let module = match puflib::get_module(name) {
            Some(module) => module,
            None => bail!("cannot {} module \"{}\": does not exist", action, name),
        };
        op(module).with_context(|| format!("failed to {} module \"{}\"", action, name))?;
    }

    Ok(())
}
