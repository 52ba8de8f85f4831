// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

#[macro_use]
extern crate tracing;

mod commands;
mod log;
mod opt;

use clap::Parser;
use color_eyre::Result;

use opt::Opt;

fn main() -> Result<()> {
    color_eyre::install()?;
    let opt = Opt::parse();
    // held until exit so buffered file logs are flushed
    let _log_guards = log::init_logging(&opt)?;

    // Log the full command that was run
    info!("\"{}\"", std::env::args().collect::<Vec<_>>().join(" "));
    info!("airgap version {}", env!("CARGO_PKG_VERSION"));

    commands::handle_subcommand(opt)
}
