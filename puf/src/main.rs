/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{bail, Context};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use clap::Parser;
use log::{error, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use puflib::{Module, ModuleStatus, PufError};

use args::{Args, Command};

mod args;
mod interact;

/// Hard ceiling on the input size when streaming to EOF.
const MAX_INPUT_LEN: usize = 8 * 1024 * 1024;

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
    puflib::set_query_handler(interact::query_handler);

    let input_arg = match &args.command {
        Command::Seal { input, .. } | Command::Unseal { input } | Command::Chal { input, .. } => {
            input.clone()
        }
    };

    let mut input = read_input(&input_arg)?;
    if args.input_base64 {
        input = BASE64
            .decode(input.trim_ascii_end())
            .with_context(|| "failed to decode base64 input")?;
    }

    let output = match &args.command {
        Command::Seal { module, .. } => {
            let module = usable_module(module)?;
            ok_or_canceled(puflib::seal(module, &input))
                .with_context(|| format!("failed to seal with module \"{}\"", module.name()))?
        }
        Command::Unseal { .. } => ok_or_canceled(puflib::unseal(&input))
            .with_context(|| "failed to unseal blob")?,
        Command::Chal { module, .. } => {
            let module = usable_module(module)?;
            ok_or_canceled(puflib::chal_resp(module, &input))
                .with_context(|| format!("failed to challenge module \"{}\"", module.name()))?
        }
    };

    write_output(&args, &output)
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

/// Keep user cancellation distinguishable from real failures: it must never
/// surface wrapped in an I/O flavored context chain.
fn ok_or_canceled(result: puflib::Result<Vec<u8>>) -> anyhow::Result<Vec<u8>> {
    match result {
        Err(PufError::Canceled) => bail!("canceled"),
        other => Ok(other?),
    }
}

/// Resolve a module by name and refuse ones that cannot seal right now.
fn usable_module(name: &str) -> anyhow::Result<&'static dyn Module> {
    let module = match puflib::get_module(name) {
        Some(module) => module,
        None => bail!("cannot use module \"{}\": does not exist", name),
    };

    let status = puflib::module_status(module)
        .with_context(|| format!("failed to derive status of module \"{}\"", name))?;
    if status.contains(ModuleStatus::DISABLED) {
        bail!("cannot use module \"{}\": module is disabled", name);
    }
    if !status.contains(ModuleStatus::PROVISIONED) {
        bail!("cannot use module \"{}\": module has not been provisioned", name);
    }

    Ok(module)
}

fn read_input(arg: &str) -> anyhow::Result<Vec<u8>> {
    let mut reader: Box<dyn Read> = if arg == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(
            File::open(arg).with_context(|| format!("failed to open input file '{}'", arg))?,
        )
    };

    let mut buf = Vec::new();
    reader
        .by_ref()
        .take(MAX_INPUT_LEN as u64 + 1)
        .read_to_end(&mut buf)
        .with_context(|| "failed to read input")?;
    if buf.len() > MAX_INPUT_LEN {
        bail!("input is larger than the {} byte limit", MAX_INPUT_LEN);
    }

    Ok(buf)
}

fn write_output(args: &Args, data: &[u8]) -> anyhow::Result<()> {
    let encoded;
    let data = if args.output_base64 {
        let mut buf = BASE64.encode(data).into_bytes();
        buf.push(b'\n');
        encoded = buf;
        &encoded[..]
    } else {
        data
    };

    match &args.output {
        Some(path) => fs::write(path, data)
            .with_context(|| format!("failed to write output to '{}'", path))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(data)
                .with_context(|| "failed to write output")?;
            stdout.flush()?;
        }
    }

    Ok(())
}
