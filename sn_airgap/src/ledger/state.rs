// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::receipt::{Block, PendingHandle, Receipt, ReceiptStatus};
use crate::{
    Address, Bytes, Error, FeePolicy, GenesisAlloc, IntentKind, LedgerConfig, Result,
    SignedAuthorization, B256, U256,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

pub(super) type Balances = BTreeMap<Address, U256>;

#[derive(Clone, Debug)]
struct PendingEntry {
    tx_hash: B256,
    auth: SignedAuthorization,
}

/// Everything a ledger knows once it has a genesis.
///
/// Committed state only changes in [`LedgerState::produce_block`]. Submissions
/// only touch the queue and the pending projection, which is what the queue
/// would leave behind if every queued transfer were applied at its fee ceiling.
#[derive(Debug)]
pub(super) struct LedgerState {
    block_gas_limit: u64,
    balances: Balances,
    sequences: BTreeMap<Address, u64>,
    code: BTreeMap<Address, Bytes>,
    /// Index is the height. Append only.
    snapshots: Vec<Balances>,
    /// Cumulative burned fees per height.
    burned: Vec<U256>,
    blocks: Vec<Block>,
    receipts: HashMap<B256, Receipt>,
    pending: VecDeque<PendingEntry>,
    pending_balances: Balances,
    pending_sequences: BTreeMap<Address, u64>,
}

impl LedgerState {
    pub(super) fn new(alloc: GenesisAlloc, block_gas_limit: u64) -> Self {
        let genesis_block = Block {
            height: 0,
            gas_limit: block_gas_limit,
            gas_used: 0,
            applied: vec![],
            dropped: vec![],
            deferred: 0,
        };
        Self {
            block_gas_limit,
            balances: alloc.clone(),
            sequences: BTreeMap::new(),
            code: BTreeMap::new(),
            snapshots: vec![alloc.clone()],
            burned: vec![U256::ZERO],
            blocks: vec![genesis_block],
            receipts: HashMap::new(),
            pending: VecDeque::new(),
            pending_balances: alloc,
            pending_sequences: BTreeMap::new(),
        }
    }

    pub(super) fn height(&self) -> u64 {
        // one snapshot per height, genesis included
        self.snapshots.len() as u64 - 1
    }

    pub(super) fn block_gas_limit(&self) -> u64 {
        self.block_gas_limit
    }

    pub(super) fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub(super) fn balance(&self, address: &Address) -> U256 {
        self.balances.get(address).copied().unwrap_or_default()
    }

    pub(super) fn pending_balance(&self, address: &Address) -> U256 {
        self.pending_balances
            .get(address)
            .copied()
            .unwrap_or_default()
    }

    pub(super) fn last_sequence(&self, address: &Address) -> u64 {
        self.sequences.get(address).copied().unwrap_or_default()
    }

    pub(super) fn code(&self, address: &Address) -> Option<Bytes> {
        self.code.get(address).cloned()
    }

    pub(super) fn receipt(&self, tx_hash: &B256) -> Option<Receipt> {
        self.receipts.get(tx_hash).cloned()
    }

    fn snapshot(&self, height: u64) -> Result<&Balances> {
        usize::try_from(height)
            .ok()
            .and_then(|index| self.snapshots.get(index))
            .ok_or(Error::UnknownHeight {
                requested: height,
                current: self.height(),
            })
    }

    pub(super) fn balance_at(&self, address: &Address, height: u64) -> Result<U256> {
        Ok(self
            .snapshot(height)?
            .get(address)
            .copied()
            .unwrap_or_default())
    }

    pub(super) fn total_supply_at(&self, height: u64) -> Result<U256> {
        Ok(self
            .snapshot(height)?
            .values()
            .fold(U256::ZERO, |total, balance| total.saturating_add(*balance)))
    }

    pub(super) fn burned_at(&self, height: u64) -> Result<U256> {
        let _ = self.snapshot(height)?;
        Ok(usize::try_from(height)
            .ok()
            .and_then(|index| self.burned.get(index))
            .copied()
            .unwrap_or_default())
    }

    pub(super) fn block(&self, height: u64) -> Result<Block> {
        usize::try_from(height)
            .ok()
            .and_then(|index| self.blocks.get(index))
            .cloned()
            .ok_or(Error::UnknownHeight {
                requested: height,
                current: self.height(),
            })
    }

    /// Queues `auth` after checking it against the pending projection.
    ///
    /// Nothing is modified unless every check passes.
    pub(super) fn submit(
        &mut self,
        config: &LedgerConfig,
        auth: SignedAuthorization,
    ) -> Result<PendingHandle> {
        let intent = &auth.intent;
        let sender = intent.sender;

        if intent.chain_id != config.chain_id {
            return Err(Error::WrongChain {
                expected: config.chain_id,
                got: intent.chain_id,
            });
        }

        auth.verify()?;

        intent.validate()?;
        if intent.fee.gas_limit > self.block_gas_limit {
            return Err(Error::GasLimitExceeded {
                gas_limit: intent.fee.gas_limit,
                block_gas_limit: self.block_gas_limit,
            });
        }

        // a replay is a conflict even when its sender could no longer afford it
        let last = self
            .pending_sequences
            .get(&sender)
            .copied()
            .unwrap_or_default();
        if intent.sequence <= last {
            return Err(Error::SequenceConflict {
                address: sender,
                last,
                got: intent.sequence,
            });
        }

        let required = intent
            .max_cost()
            .ok_or_else(|| Error::InvalidIntent("amount plus fee ceiling overflows".to_string()))?;
        let available = self.pending_balance(&sender);
        if available < required {
            return Err(Error::InsufficientFunds {
                address: sender,
                available,
                required,
            });
        }

        let tx_hash = auth.hash();
        let handle = PendingHandle {
            tx_hash,
            sender,
            sequence: intent.sequence,
            queue_position: self.pending.len(),
        };

        let _ = self.pending_balances.insert(sender, available - required);
        credit(&mut self.pending_balances, intent.beneficiary(), intent.amount);
        let _ = self.pending_sequences.insert(sender, intent.sequence);
        debug!(
            "Queued {tx_hash} ({}) at position {}",
            auth.intent, handle.queue_position
        );
        self.pending.push_back(PendingEntry { tx_hash, auth });

        Ok(handle)
    }

    /// Applies the queue to committed state and advances the height by one.
    pub(super) fn produce_block(&mut self, fee_policy: FeePolicy) -> Result<u64> {
        let height = self.height() + 1;
        let mut gas_pool = self.block_gas_limit;
        let mut gas_used = 0u64;
        let mut burned = self.burned.last().copied().unwrap_or_default();
        let mut deferred_senders = BTreeSet::new();
        let mut remaining = VecDeque::new();
        let mut applied = vec![];
        let mut dropped = vec![];

        while let Some(entry) = self.pending.pop_front() {
            let intent = &entry.auth.intent;
            let sender = intent.sender;

            if deferred_senders.contains(&sender) {
                remaining.push_back(entry);
                continue;
            }
            if intent.fee.gas_limit > gas_pool {
                trace!(
                    "Deferring {} and later transfers from {sender}: needs {} gas, {gas_pool} left",
                    entry.tx_hash,
                    intent.fee.gas_limit
                );
                let _ = deferred_senders.insert(sender);
                remaining.push_back(entry);
                continue;
            }

            let status = match self.apply(&entry.auth, fee_policy, &mut burned) {
                Ok(status) => {
                    gas_pool -= intent.fee.gas_limit;
                    if let ReceiptStatus::Applied { gas_used: used, .. } = &status {
                        gas_used += used;
                    }
                    applied.push(entry.tx_hash);
                    status
                }
                Err(err) => {
                    warn!("Dropping {} from block {height}: {err}", entry.tx_hash);
                    dropped.push(entry.tx_hash);
                    ReceiptStatus::Dropped {
                        reason: err.to_string(),
                    }
                }
            };

            let receipt = Receipt {
                tx_hash: entry.tx_hash,
                sender,
                sequence: intent.sequence,
                height,
                status,
            };
            let _ = self.receipts.insert(entry.tx_hash, receipt);
        }

        self.pending = remaining;
        self.rebuild_pending_projection();

        self.snapshots.push(self.balances.clone());
        self.burned.push(burned);
        self.blocks.push(Block {
            height,
            gas_limit: self.block_gas_limit,
            gas_used,
            applied,
            dropped,
            deferred: self.pending.len(),
        });

        Ok(height)
    }

    /// Applies one transfer to committed state, or fails without touching it.
    fn apply(
        &mut self,
        auth: &SignedAuthorization,
        fee_policy: FeePolicy,
        burned: &mut U256,
    ) -> Result<ReceiptStatus> {
        let intent = &auth.intent;
        let sender = intent.sender;

        let last = self.last_sequence(&sender);
        if intent.sequence <= last {
            return Err(Error::StaleSubmission(format!(
                "sequence {} of {sender} is no longer above the committed {last}",
                intent.sequence
            )));
        }

        let max_cost = intent
            .max_cost()
            .ok_or_else(|| Error::InvalidIntent("amount plus fee ceiling overflows".to_string()))?;
        let available = self.balance(&sender);
        if available < max_cost {
            return Err(Error::StaleSubmission(format!(
                "{sender} holds {available}, {max_cost} required"
            )));
        }

        let contract_address = intent.contract_address();
        if let Some(contract) = contract_address {
            if self.code.contains_key(&contract) {
                return Err(Error::StaleSubmission(format!(
                    "{contract} already holds code"
                )));
            }
        }

        let gas_used = intent.intrinsic_gas();
        let fee = intent
            .fee()
            .ok_or_else(|| Error::InvalidIntent("fee overflows".to_string()))?;
        // amount + fee <= amount + ceiling <= available
        let cost = intent.amount + fee;

        let _ = self.balances.insert(sender, available - cost);
        credit(&mut self.balances, intent.beneficiary(), intent.amount);
        match fee_policy {
            FeePolicy::Collect(collector) => credit(&mut self.balances, collector, fee),
            FeePolicy::Burn => *burned = burned.saturating_add(fee),
        }
        let _ = self.sequences.insert(sender, intent.sequence);

        if let (IntentKind::Deploy, Some(contract)) = (intent.kind, contract_address) {
            debug!(
                "Stored {} bytes of code at {contract}",
                intent.payload.len()
            );
            let _ = self.code.insert(contract, intent.payload.clone());
        }

        debug!("Applied {}: gas {gas_used}, fee {fee}", intent);
        Ok(ReceiptStatus::Applied {
            gas_used,
            fee,
            contract_address,
        })
    }

    /// Replays whatever is still queued over the new committed state.
    ///
    /// Pessimistic: a queued transfer its sender can no longer cover still
    /// debits the sender, but credits nothing to its recipient.
    fn rebuild_pending_projection(&mut self) {
        self.pending_balances = self.balances.clone();
        self.pending_sequences = self.sequences.clone();

        for entry in &self.pending {
            let intent = &entry.auth.intent;
            let sender = intent.sender;
            let required = intent.max_cost().unwrap_or(U256::MAX);
            let available = self
                .pending_balances
                .get(&sender)
                .copied()
                .unwrap_or_default();
            let covered = available >= required;
            if !covered {
                // it will be dropped as stale when its block comes
                trace!("Queued {} is no longer covered", entry.tx_hash);
            }
            let _ = self
                .pending_balances
                .insert(sender, available.saturating_sub(required));
            if covered {
                credit(&mut self.pending_balances, intent.beneficiary(), intent.amount);
            }
            let _ = self.pending_sequences.insert(sender, intent.sequence);
        }
    }
}

/// Adds `amount` to `address`. Total supply is bounded by the genesis total, so this cannot saturate.
fn credit(balances: &mut Balances, address: Address, amount: U256) {
    let balance = balances.entry(address).or_default();
    *balance = balance.saturating_add(amount);
}
