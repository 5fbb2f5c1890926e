/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Manage and provision PUFlib PUFs", long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Never prompt; module queries fail as unavailable
    #[arg(short, long, default_value_t = false)]
    pub non_interactive: bool,

    /// Defaults to `list` when omitted
    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, PartialEq, Clone, Subcommand)]
#[clap(rename_all = "kebab_case")]
pub enum Command {
    /// List all PUF modules
    List,
    /// List provisioned and enabled PUF modules
    Provisioned,
    /// Provision a module. May be interactive
    Provision {
        /// Module to provision
        module: String,
    },
    /// Continue provisioning a module
    Continue {
        /// Module to continue provisioning
        module: String,
    },
    /// Deprovision modules, removing every stored artifact
    Deprovision {
        /// Modules to deprovision
        #[arg(required = true)]
        modules: Vec<String>,
    },
    /// Temporarily disable provisioned modules
    Disable {
        /// Modules to disable
        #[arg(required = true)]
        modules: Vec<String>,
    },
    /// Re-enable disabled modules
    Enable {
        /// Modules to enable
        #[arg(required = true)]
        modules: Vec<String>,
    },
}
