// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    config::{DEFAULT_BLOCK_GAS_LIMIT, DEFAULT_CHAIN_ID},
    Address, Error, Result, U256,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path, str::FromStr};

/// Starting balance of every identifier known at height 0.
pub type GenesisAlloc = BTreeMap<Address, U256>;

/// One entry of the genesis file's `alloc` map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    /// Decimal, or hex with a `0x` prefix.
    pub balance: String,
}

#[derive(Serialize, Deserialize)]
struct GenesisFile {
    #[serde(default = "default_chain_id")]
    chain_id: u64,
    #[serde(default = "default_block_gas_limit")]
    block_gas_limit: u64,
    alloc: BTreeMap<String, GenesisAccount>,
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_block_gas_limit() -> u64 {
    DEFAULT_BLOCK_GAS_LIMIT
}

/// Everything needed to bring a ledger to height 0.
///
/// Shared between both sides of the air gap as a JSON file, so that the signing
/// side and the relaying side agree on chain id and starting balances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Genesis {
    pub chain_id: u64,
    pub block_gas_limit: u64,
    pub alloc: GenesisAlloc,
}

impl Genesis {
    pub fn new(alloc: GenesisAlloc, block_gas_limit: u64) -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            block_gas_limit,
            alloc,
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Sum of all allocations. Fails if it does not fit in 256 bits.
    pub fn total_supply(&self) -> Result<U256> {
        self.alloc
            .values()
            .try_fold(U256::ZERO, |total, balance| total.checked_add(*balance))
            .ok_or_else(|| Error::InvalidGenesis("total allocation overflows".to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: GenesisFile = serde_json::from_str(json)?;

        let mut alloc = GenesisAlloc::new();
        for (address, account) in file.alloc {
            let address = Address::from_str(&address).map_err(|err| {
                Error::InvalidGenesis(format!("bad address {address:?}: {err}"))
            })?;
            let balance = U256::from_str(account.balance.trim()).map_err(|err| {
                Error::InvalidGenesis(format!(
                    "bad balance {:?} for {address}: {err}",
                    account.balance
                ))
            })?;
            if alloc.insert(address, balance).is_some() {
                return Err(Error::InvalidGenesis(format!(
                    "{address} is allocated twice"
                )));
            }
        }

        let genesis = Self {
            chain_id: file.chain_id,
            block_gas_limit: file.block_gas_limit,
            alloc,
        };
        let _ = genesis.total_supply()?;
        Ok(genesis)
    }

    pub fn to_json(&self) -> Result<String> {
        let file = GenesisFile {
            chain_id: self.chain_id,
            block_gas_limit: self.block_gas_limit,
            alloc: self
                .alloc
                .iter()
                .map(|(address, balance)| {
                    (
                        address.to_string(),
                        GenesisAccount {
                            balance: balance.to_string(),
                        },
                    )
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        debug!("Loaded genesis from {path:?}");
        Self::from_json(&json)
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
