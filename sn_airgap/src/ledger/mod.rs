// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod receipt;
mod state;

pub use receipt::{Block, PendingHandle, Receipt, ReceiptStatus};

use crate::{
    codec::AuthorizationCodec, Address, Bytes, Error, Genesis, GenesisAlloc, LedgerConfig, Result,
    SignedAuthorization, B256, U256,
};
use state::LedgerState;
use std::sync::{Mutex, MutexGuard};

/// An in-memory ledger that accepts signed authorizations and applies them in blocks.
///
/// Moves through `uninitialized -> height 0 -> height 1 -> ...`. Only
/// [`LedgerSimulator::initialize`] and [`LedgerSimulator::produce_block`] change
/// committed state. Every call takes the one state lock for its whole duration,
/// so a shared simulator sees operations in a single total order.
#[derive(Debug)]
pub struct LedgerSimulator {
    config: LedgerConfig,
    state: Mutex<Option<LedgerState>>,
}

impl Default for LedgerSimulator {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl LedgerSimulator {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            state: Mutex::new(None),
        }
    }

    /// A simulator already initialized from `genesis`, running the genesis chain id.
    pub fn from_genesis(config: LedgerConfig, genesis: &Genesis) -> Result<Self> {
        let ledger = Self::new(config.with_chain_id(genesis.chain_id));
        ledger.initialize(genesis.alloc.clone(), genesis.block_gas_limit)?;
        Ok(ledger)
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<LedgerState>>> {
        self.state.lock().map_err(|_| {
            error!("Ledger state lock is poisoned");
            Error::StatePoisoned
        })
    }

    fn read<T>(&self, f: impl FnOnce(&LedgerState) -> Result<T>) -> Result<T> {
        let guard = self.lock()?;
        let state = guard.as_ref().ok_or(Error::NotInitialized)?;
        f(state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut LedgerState) -> Result<T>) -> Result<T> {
        let mut guard = self.lock()?;
        let state = guard.as_mut().ok_or(Error::NotInitialized)?;
        f(state)
    }

    /// Sets the height 0 balances. Can only happen once.
    pub fn initialize(&self, alloc: GenesisAlloc, block_gas_limit: u64) -> Result<()> {
        let mut guard = self.lock()?;
        if guard.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        if block_gas_limit == 0 {
            return Err(Error::InvalidGenesis(
                "block gas limit must be positive".to_string(),
            ));
        }
        let supply = alloc
            .values()
            .try_fold(U256::ZERO, |total, balance| total.checked_add(*balance))
            .ok_or_else(|| Error::InvalidGenesis("total allocation overflows".to_string()))?;

        info!(
            "Initialized ledger on chain {} with {} accounts, supply {supply}, block gas limit {block_gas_limit}",
            self.config.chain_id,
            alloc.len()
        );
        *guard = Some(LedgerState::new(alloc, block_gas_limit));
        Ok(())
    }

    /// Validates `auth` against the pending state and queues it for the next block.
    pub fn submit(&self, auth: SignedAuthorization) -> Result<PendingHandle> {
        let config = &self.config;
        self.write(|state| state.submit(config, auth))
            .inspect_err(|err| debug!("Rejected submission: {err}"))
    }

    /// Decodes transport bytes and submits the result.
    pub fn submit_encoded(&self, bytes: &[u8]) -> Result<PendingHandle> {
        let auth = AuthorizationCodec::decode(bytes)?;
        self.submit(auth)
    }

    /// Applies the pending queue and returns the new height.
    pub fn produce_block(&self) -> Result<u64> {
        let fee_policy = self.config.fee_policy;
        self.write(|state| {
            let height = state.produce_block(fee_policy)?;
            let block = state.block(height)?;
            info!(
                "Produced block {height}: {} applied, {} dropped, {} deferred, {} gas used",
                block.applied.len(),
                block.dropped.len(),
                block.deferred,
                block.gas_used
            );
            Ok(height)
        })
    }

    pub fn height(&self) -> Result<u64> {
        self.read(|state| Ok(state.height()))
    }

    pub fn block_gas_limit(&self) -> Result<u64> {
        self.read(|state| Ok(state.block_gas_limit()))
    }

    pub fn pending_count(&self) -> Result<usize> {
        self.read(|state| Ok(state.pending_count()))
    }

    /// Committed balance at the current height. Unknown addresses hold zero.
    pub fn balance(&self, address: &Address) -> Result<U256> {
        self.read(|state| Ok(state.balance(address)))
    }

    /// Balance as if every queued transfer were applied at its fee ceiling.
    pub fn pending_balance(&self, address: &Address) -> Result<U256> {
        self.read(|state| Ok(state.pending_balance(address)))
    }

    /// Balance as it stood right after block `height` was produced.
    pub fn balance_at(&self, address: &Address, height: u64) -> Result<U256> {
        self.read(|state| state.balance_at(address, height))
    }

    /// Highest committed sequence of `address`, 0 if it never sent anything.
    pub fn last_sequence(&self, address: &Address) -> Result<u64> {
        self.read(|state| Ok(state.last_sequence(address)))
    }

    pub fn receipt(&self, tx_hash: &B256) -> Result<Option<Receipt>> {
        self.read(|state| Ok(state.receipt(tx_hash)))
    }

    pub fn block(&self, height: u64) -> Result<Block> {
        self.read(|state| state.block(height))
    }

    /// Payload stored by a deployment at `address`.
    pub fn code(&self, address: &Address) -> Result<Option<Bytes>> {
        self.read(|state| Ok(state.code(address)))
    }

    pub fn total_supply_at(&self, height: u64) -> Result<U256> {
        self.read(|state| state.total_supply_at(height))
    }

    /// Fees burned up to and including block `height`.
    pub fn burned_at(&self, height: u64) -> Result<U256> {
        self.read(|state| state.burned_at(height))
    }
}
