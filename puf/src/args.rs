/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, long_about = None)]
#[command(about = "Seal and unseal secrets using PUFlib PUFs. Use pufctl to discover modules")]
#[command(propagate_version = true)]
pub struct Args {
    /// Input is base64-encoded
    #[arg(short = 'I', long, default_value_t = false)]
    pub input_base64: bool,

    /// Base64-encode the output
    #[arg(short = 'O', long, default_value_t = false)]
    pub output_base64: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Clone, Subcommand)]
#[clap(rename_all = "kebab_case")]
pub enum Command {
    /// Seal data with a module
    Seal {
        /// Module to seal with
        module: String,
        /// Input file, or '-' for stdin
        input: String,
    },
    /// Unseal a sealed blob. The blob names the module that produced it
    Unseal {
        /// Input file, or '-' for stdin
        input: String,
    },
    /// Use a module's raw challenge-response interface
    Chal {
        /// Module to challenge
        module: String,
        /// Input file, or '-' for stdin
        input: String,
    },
}
