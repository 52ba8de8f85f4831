// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod demo;
mod inspect;
mod relay;
mod sign;

use clap::Subcommand;
use color_eyre::Result;
use sn_airgap::{Address, Bytes, DEFAULT_CHAIN_ID, U256};
use std::path::PathBuf;

use crate::opt::Opt;

/// Amounts and gas prices are in wei, given as decimal or as `0x` prefixed hex.
#[derive(Subcommand, Debug)]
pub enum SubCmd {
    /// Run both halves in one process: two fresh accounts, one offline signature, one block.
    Demo {
        /// Amount moved from A to B, or funding the deployed contract.
        #[arg(long, default_value = "1000000000000000000")]
        amount: U256,
        /// Deploy a small contract from A instead of transferring to B.
        #[arg(long)]
        deploy: bool,
    },

    /// Print the address of a secret key.
    Address {
        /// Hex encoded 32 byte secret key.
        #[arg(long)]
        secret_key: String,
    },

    /// Offline half: sign a transfer or deployment and print its authorization hex.
    Sign {
        /// Hex encoded 32 byte secret key of the sender.
        #[arg(long)]
        secret_key: String,
        /// Sequence of this authorization. Must be above any the sender used before.
        #[arg(long)]
        sequence: u64,
        /// Recipient. Leave out to deploy the payload as a contract.
        #[arg(long)]
        to: Option<Address>,
        #[arg(long)]
        amount: U256,
        #[arg(long)]
        gas_price: U256,
        /// Defaults to the intrinsic gas of the authorization.
        #[arg(long)]
        gas_limit: Option<u64>,
        /// Hex payload. Init code when deploying.
        #[arg(long)]
        payload: Option<Bytes>,
        #[arg(long, default_value_t = DEFAULT_CHAIN_ID)]
        chain_id: u64,
    },

    /// Decode an authorization hex and check its signature.
    Inspect {
        /// Authorization hex as printed by `sign`.
        authorization: String,
    },

    /// Online half: submit authorizations to a ledger built from a genesis file and produce a block.
    Relay {
        /// JSON genesis file.
        #[arg(long)]
        genesis: PathBuf,
        /// Burn fees instead of crediting them to the zero address.
        #[arg(long)]
        burn_fees: bool,
        /// Authorization hexes, applied in the given order.
        #[arg(required = true)]
        authorizations: Vec<String>,
    },
}

pub fn handle_subcommand(opt: Opt) -> Result<()> {
    match opt.command {
        SubCmd::Demo { amount, deploy } => demo::run(amount, deploy),
        SubCmd::Address { secret_key } => sign::address(&secret_key),
        SubCmd::Sign {
            secret_key,
            sequence,
            to,
            amount,
            gas_price,
            gas_limit,
            payload,
            chain_id,
        } => sign::sign(
            &secret_key,
            sign::SignArgs {
                sequence,
                to,
                amount,
                gas_price,
                gas_limit,
                payload: payload.unwrap_or_default(),
                chain_id,
            },
        ),
        SubCmd::Inspect { authorization } => inspect::inspect(&authorization),
        SubCmd::Relay {
            genesis,
            burn_fees,
            authorizations,
        } => relay::run(&genesis, burn_fees, &authorizations),
    }
}
