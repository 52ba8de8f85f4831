// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use eyre::{eyre, Result};
use sn_airgap::{
    Account, Address, AuthorizationCodec, Bytes, Error, FeeParams, FeePolicy, Genesis,
    GenesisAlloc, LedgerConfig, LedgerSimulator, ReceiptStatus, B256, DEFAULT_BLOCK_GAS_LIMIT,
    U256,
};
use sn_logging::LogBuilder;
use std::{sync::Arc, thread};

const TEN_ETH: u128 = 10_000_000_000_000_000_000;
const GWEI: u64 = 1_000_000_000;

fn alloc_for(accounts: &[Address]) -> GenesisAlloc {
    accounts
        .iter()
        .map(|address| (*address, U256::from(TEN_ETH)))
        .collect()
}

fn ledger_for(
    config: LedgerConfig,
    accounts: &[Address],
    block_gas_limit: u64,
) -> Result<LedgerSimulator> {
    let ledger = LedgerSimulator::new(config);
    ledger.initialize(alloc_for(accounts), block_gas_limit)?;
    Ok(ledger)
}

#[test]
fn transfer_signed_offline_is_applied_online() -> Result<()> {
    let _log_guards = LogBuilder::init_single_threaded_test("relay");

    let mut alice = Account::generate()?;
    let bob = Account::generate()?;
    let ledger = ledger_for(
        LedgerConfig::default(),
        &[alice.address(), bob.address()],
        DEFAULT_BLOCK_GAS_LIMIT,
    )?;

    // offline side
    let amount = U256::from(1_234_567_890u64);
    let fee = FeeParams::new(U256::from(GWEI), 21_000);
    let intent = alice.transfer_intent(ledger.chain_id(), bob.address(), amount, fee);
    assert_eq!(intent.sequence, 1);
    let charged = intent.fee().ok_or_else(|| eyre!("fee overflow"))?;
    let hex = AuthorizationCodec::encode_hex(&alice.sign(intent)?);
    drop(alice);

    // online side only sees the hex
    let auth = AuthorizationCodec::decode_hex(&hex)?;
    let sender = auth.sender();
    let _ = ledger.submit(auth)?;
    assert_eq!(ledger.produce_block()?, 1);

    assert_eq!(ledger.balance_at(&sender, 0)?, U256::from(TEN_ETH));
    assert_eq!(ledger.balance_at(&bob.address(), 0)?, U256::from(TEN_ETH));
    assert_eq!(
        ledger.balance_at(&sender, 1)?,
        U256::from(TEN_ETH) - amount - charged
    );
    assert_eq!(
        ledger.balance_at(&bob.address(), 1)?,
        U256::from(TEN_ETH) + amount
    );
    assert_eq!(
        ledger.balance_at(&sender, 2),
        Err(Error::UnknownHeight {
            requested: 2,
            current: 1
        })
    );
    Ok(())
}

#[test]
fn deployment_stores_payload_at_derived_address() -> Result<()> {
    let mut alice = Account::generate()?;
    let ledger = ledger_for(
        LedgerConfig::default(),
        &[alice.address()],
        DEFAULT_BLOCK_GAS_LIMIT,
    )?;

    let init_code = Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52, 0x00]);
    let intent = alice.deploy_intent(
        ledger.chain_id(),
        init_code.clone(),
        U256::from(500u64),
        FeeParams::new(U256::from(GWEI), 200_000),
    );
    let contract = intent
        .contract_address()
        .ok_or_else(|| eyre!("deployment without contract address"))?;
    assert_eq!(contract, alice.address().create(1));

    let bytes = alice.sign(intent)?.to_bytes();
    let handle = ledger.submit_encoded(&bytes)?;
    let _ = ledger.produce_block()?;

    assert_eq!(ledger.code(&contract)?, Some(init_code));
    assert_eq!(ledger.balance(&contract)?, U256::from(500u64));
    let receipt = ledger
        .receipt(&handle.tx_hash)?
        .ok_or_else(|| eyre!("missing receipt"))?;
    assert!(matches!(
        receipt.status,
        ReceiptStatus::Applied {
            contract_address: Some(address),
            ..
        } if address == contract
    ));
    Ok(())
}

#[test]
fn insufficient_funds_leave_height_alone() -> Result<()> {
    let mut alice = Account::generate()?;
    let bob = Account::generate()?;
    let ledger = ledger_for(
        LedgerConfig::default(),
        &[alice.address()],
        DEFAULT_BLOCK_GAS_LIMIT,
    )?;

    let auth = alice.sign(alice.transfer_intent(
        ledger.chain_id(),
        bob.address(),
        U256::from(TEN_ETH),
        FeeParams::new(U256::from(GWEI), 21_000),
    ))?;
    assert!(matches!(
        ledger.submit(auth),
        Err(Error::InsufficientFunds { .. })
    ));
    assert_eq!(ledger.height()?, 0);
    assert_eq!(ledger.pending_count()?, 0);
    assert_eq!(ledger.balance(&alice.address())?, U256::from(TEN_ETH));
    Ok(())
}

#[test]
fn sequences_must_increase_across_blocks() -> Result<()> {
    const SECRET: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    let mut alice = Account::from_secret_hex(SECRET)?;
    let bob = Account::generate()?;
    let ledger = ledger_for(
        LedgerConfig::default(),
        &[alice.address()],
        DEFAULT_BLOCK_GAS_LIMIT,
    )?;
    let fee = FeeParams::new(U256::from(GWEI), 21_000);

    let mut late = alice.transfer_intent(ledger.chain_id(), bob.address(), U256::from(1u64), fee);
    late.sequence = 5;
    let _ = ledger.submit(alice.sign(late)?)?;
    let _ = ledger.produce_block()?;
    assert_eq!(ledger.last_sequence(&alice.address())?, 5);

    // same key imported elsewhere, unaware of sequence 5
    let mut elsewhere = Account::from_secret_hex(SECRET)?;
    let mut early =
        elsewhere.transfer_intent(ledger.chain_id(), bob.address(), U256::from(1u64), fee);
    early.sequence = 3;
    let early = elsewhere.sign(early)?;
    assert_eq!(
        ledger.submit(early),
        Err(Error::SequenceConflict {
            address: alice.address(),
            last: 5,
            got: 3
        })
    );
    assert_eq!(ledger.pending_count()?, 0);
    Ok(())
}

#[test]
fn value_is_conserved_under_both_fee_policies() -> Result<()> {
    for policy in [FeePolicy::Burn, FeePolicy::Collect(Address::repeat_byte(0xcb))] {
        let mut alice = Account::generate()?;
        let mut bob = Account::generate()?;
        let carol = Account::generate()?;
        let ledger = ledger_for(
            LedgerConfig::default().with_fee_policy(policy),
            &[alice.address(), bob.address()],
            DEFAULT_BLOCK_GAS_LIMIT,
        )?;
        let genesis_supply = ledger.total_supply_at(0)?;
        let fee = FeeParams::new(U256::from(GWEI), 30_000);

        for _ in 0..3 {
            let auth = alice.sign(alice.transfer_intent(
                ledger.chain_id(),
                carol.address(),
                U256::from(GWEI),
                fee,
            ))?;
            let _ = ledger.submit(auth)?;
        }
        let auth = bob.sign(
            bob.transfer_intent(ledger.chain_id(), alice.address(), U256::from(7u64), fee)
                .with_payload(vec![0u8, 1, 2, 3]),
        )?;
        let _ = ledger.submit(auth)?;

        for height in 1..=2 {
            assert_eq!(ledger.produce_block()?, height);
            assert_eq!(
                ledger.total_supply_at(height)? + ledger.burned_at(height)?,
                genesis_supply
            );
        }
        match policy {
            FeePolicy::Burn => assert!(ledger.burned_at(1)? > U256::ZERO),
            FeePolicy::Collect(collector) => {
                assert_eq!(ledger.burned_at(2)?, U256::ZERO);
                assert!(ledger.balance(&collector)? > U256::ZERO);
            }
        }
    }
    Ok(())
}

#[test]
fn history_is_immutable() -> Result<()> {
    let mut alice = Account::generate()?;
    let bob = Account::generate()?;
    let ledger = ledger_for(
        LedgerConfig::default(),
        &[alice.address(), bob.address()],
        DEFAULT_BLOCK_GAS_LIMIT,
    )?;
    let fee = FeeParams::new(U256::from(GWEI), 21_000);

    let mut seen = vec![];
    for _ in 0..4 {
        let auth = alice.sign(alice.transfer_intent(
            ledger.chain_id(),
            bob.address(),
            U256::from(TEN_ETH / 100),
            fee,
        ))?;
        let _ = ledger.submit(auth)?;
        let height = ledger.produce_block()?;
        seen.push((
            height,
            ledger.balance_at(&alice.address(), height)?,
            ledger.balance_at(&bob.address(), height)?,
        ));
    }

    for (height, alice_balance, bob_balance) in seen {
        assert_eq!(ledger.balance_at(&alice.address(), height)?, alice_balance);
        assert_eq!(ledger.balance_at(&bob.address(), height)?, bob_balance);
    }
    assert_eq!(ledger.balance_at(&alice.address(), 0)?, U256::from(TEN_ETH));
    Ok(())
}

#[test]
fn transfer_funded_by_deferred_one_is_dropped() -> Result<()> {
    let mut alice = Account::generate()?;
    let mut bob = Account::generate()?;
    let carol = Account::generate()?;
    let mut dave = Account::generate()?;

    // bob starts empty and only gets funds from alice
    let mut alloc = alloc_for(&[alice.address(), dave.address()]);
    let _ = alloc.insert(bob.address(), U256::ZERO);
    let ledger = LedgerSimulator::new(LedgerConfig::default());
    ledger.initialize(alloc, 50_000)?;
    let chain_id = ledger.chain_id();

    let from_dave = dave.sign(dave.transfer_intent(
        chain_id,
        carol.address(),
        U256::from(1u64),
        FeeParams::new(U256::from(1u64), 21_000),
    ))?;
    let from_alice = alice.sign(alice.transfer_intent(
        chain_id,
        bob.address(),
        U256::from(GWEI),
        FeeParams::new(U256::from(1u64), 30_000),
    ))?;
    let from_bob = bob.sign(bob.transfer_intent(
        chain_id,
        carol.address(),
        U256::from(1_000u64),
        FeeParams::new(U256::from(1u64), 21_000),
    ))?;

    let from_dave = ledger.submit(from_dave)?;
    let from_alice = ledger.submit(from_alice)?;
    // only covered by what alice's queued transfer will give bob
    let from_bob = ledger.submit(from_bob)?;

    let _ = ledger.produce_block()?;
    let block = ledger.block(1)?;
    assert_eq!(block.applied, vec![from_dave.tx_hash]);
    assert_eq!(block.dropped, vec![from_bob.tx_hash]);
    assert_eq!(block.deferred, 1);

    let dropped = ledger
        .receipt(&from_bob.tx_hash)?
        .ok_or_else(|| eyre!("missing receipt"))?;
    assert!(!dropped.is_applied());
    assert_eq!(ledger.receipt(&from_alice.tx_hash)?, None);
    assert_eq!(ledger.balance(&carol.address())?, U256::from(1u64));

    let _ = ledger.produce_block()?;
    assert_eq!(ledger.block(2)?.applied, vec![from_alice.tx_hash]);
    assert_eq!(ledger.balance(&bob.address())?, U256::from(GWEI));
    assert_eq!(ledger.pending_count()?, 0);
    Ok(())
}

#[test]
fn foreign_chain_is_rejected() -> Result<()> {
    let mut alice = Account::generate()?;
    let genesis = Genesis::new(alloc_for(&[alice.address()]), DEFAULT_BLOCK_GAS_LIMIT)
        .with_chain_id(5);
    let ledger = LedgerSimulator::from_genesis(LedgerConfig::default(), &genesis)?;

    let auth = alice.sign(alice.transfer_intent(
        1,
        Address::repeat_byte(2),
        U256::from(1u64),
        FeeParams::new(U256::from(1u64), 21_000),
    ))?;
    assert_eq!(
        ledger.submit(auth),
        Err(Error::WrongChain {
            expected: 5,
            got: 1
        })
    );
    Ok(())
}

#[test]
fn shared_ledger_serializes_threads() -> Result<()> {
    const SENDERS: usize = 4;
    const TRANSFERS_PER_SENDER: u64 = 5;

    let senders = (0..SENDERS)
        .map(|_| Account::generate())
        .collect::<sn_airgap::Result<Vec<_>>>()?;
    let recipient = Account::generate()?.address();
    let addresses: Vec<Address> = senders.iter().map(Account::address).collect();
    let ledger = Arc::new(ledger_for(
        LedgerConfig::default().with_fee_policy(FeePolicy::Burn),
        &addresses,
        DEFAULT_BLOCK_GAS_LIMIT,
    )?);

    let workers: Vec<_> = senders
        .into_iter()
        .map(|mut sender| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || -> Result<(Vec<u64>, Vec<B256>)> {
                let mut heights = vec![];
                let mut hashes = vec![];
                for _ in 0..TRANSFERS_PER_SENDER {
                    let auth = sender.sign(sender.transfer_intent(
                        ledger.chain_id(),
                        recipient,
                        U256::from(GWEI),
                        FeeParams::new(U256::from(GWEI), 21_000),
                    ))?;
                    hashes.push(ledger.submit(auth)?.tx_hash);
                    let height = ledger.produce_block()?;
                    assert_eq!(ledger.block(height)?.height, height);
                    heights.push(height);
                }
                Ok((heights, hashes))
            })
        })
        .collect();

    let mut heights = vec![];
    let mut hashes = vec![];
    for worker in workers {
        let (worker_heights, worker_hashes) = worker
            .join()
            .map_err(|_| eyre!("ledger worker panicked"))??;
        heights.extend(worker_heights);
        hashes.extend(worker_hashes);
    }

    // every block call got its own height
    heights.sort_unstable();
    let produced = SENDERS as u64 * TRANSFERS_PER_SENDER;
    assert_eq!(heights, (1..=produced).collect::<Vec<_>>());

    // each submission was followed by a block from the same thread
    let last = ledger.height()?;
    assert_eq!(last, produced);
    assert_eq!(ledger.pending_count()?, 0);

    for hash in &hashes {
        let receipt = ledger
            .receipt(hash)?
            .ok_or_else(|| eyre!("missing receipt for {hash}"))?;
        assert!(receipt.is_applied());
    }
    assert_eq!(
        ledger.balance(&recipient)?,
        U256::from(GWEI) * U256::from(produced)
    );
    assert_eq!(
        ledger.total_supply_at(last)? + ledger.burned_at(last)?,
        ledger.total_supply_at(0)?
    );
    Ok(())
}
