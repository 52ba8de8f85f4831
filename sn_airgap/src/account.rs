// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    authorization::AuthSignature, Address, Bytes, Error, FeeParams, Result, SignedAuthorization,
    TransferIntent, U256,
};
use alloy::signers::k256::ecdsa::SigningKey;
use alloy::signers::local::PrivateKeySigner;
use rand::{rngs::OsRng, RngCore};

/// How many times we draw from the entropy source before giving up on finding a valid scalar.
const MAX_KEYGEN_ATTEMPTS: usize = 8;

/// A keypair and the address derived from it.
///
/// The secret key never leaves this struct. The address is fixed at creation.
#[derive(custom_debug::Debug)]
pub struct Account {
    #[debug(skip)]
    signer: PrivateKeySigner,
    address: Address,
    last_sequence: u64,
}

impl Account {
    /// Creates an account from fresh OS entropy.
    pub fn generate() -> Result<Self> {
        let mut secret = [0u8; 32];
        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            OsRng
                .try_fill_bytes(&mut secret)
                .map_err(|err| Error::EntropyError(err.to_string()))?;

            // zero and values above the curve order are the only rejects
            if let Ok(key) = SigningKey::from_slice(&secret) {
                let account = Self::from_signing_key(key);
                debug!("Generated account {}", account.address);
                return Ok(account);
            }
        }
        Err(Error::EntropyError(format!(
            "no valid secret key after {MAX_KEYGEN_ATTEMPTS} draws"
        )))
    }

    /// Imports an account from a hex-encoded 32 byte secret key.
    pub fn from_secret_hex(secret_hex: &str) -> Result<Self> {
        let signer = secret_hex.trim().parse::<PrivateKeySigner>().map_err(|err| {
            error!("Error parsing secret key: {err}");
            Error::InvalidSecretKey(err.to_string())
        })?;
        let address = signer.address();
        Ok(Self {
            signer,
            address,
            last_sequence: 0,
        })
    }

    fn from_signing_key(key: SigningKey) -> Self {
        let signer = PrivateKeySigner::from_signing_key(key);
        let address = signer.address();
        Self {
            signer,
            address,
            last_sequence: 0,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The highest sequence this account has signed.
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    pub fn next_sequence(&self) -> u64 {
        self.last_sequence.saturating_add(1)
    }

    /// Builds a transfer from this account at its next sequence.
    pub fn transfer_intent(
        &self,
        chain_id: u64,
        to: Address,
        amount: U256,
        fee: FeeParams,
    ) -> TransferIntent {
        TransferIntent::transfer(
            chain_id,
            self.address,
            to,
            amount,
            self.next_sequence(),
            fee,
        )
    }

    /// Builds a deployment from this account at its next sequence.
    pub fn deploy_intent(
        &self,
        chain_id: u64,
        init_code: Bytes,
        amount: U256,
        fee: FeeParams,
    ) -> TransferIntent {
        TransferIntent::deploy(
            chain_id,
            self.address,
            init_code,
            amount,
            self.next_sequence(),
            fee,
        )
    }

    /// Signs `intent`, advancing the last known sequence to the intent's.
    pub fn sign(&mut self, intent: TransferIntent) -> Result<SignedAuthorization> {
        if intent.sender != self.address {
            return Err(Error::InvalidIntent(format!(
                "intent sender {} is not the signing account {}",
                intent.sender, self.address
            )));
        }
        if intent.sequence <= self.last_sequence {
            return Err(Error::InvalidIntent(format!(
                "sequence {} is not above the last signed sequence {}",
                intent.sequence, self.last_sequence
            )));
        }
        intent.validate()?;

        let prehash = intent.signing_hash();
        let (signature, recovery_id) = self
            .signer
            .credential()
            .sign_prehash_recoverable(prehash.as_slice())
            .map_err(|err| Error::InvalidIntent(format!("signing failed: {err}")))?;

        self.last_sequence = intent.sequence;
        trace!("Signed {intent} with prehash {prehash}");

        Ok(SignedAuthorization::new(
            intent,
            AuthSignature::from_recoverable(&signature, recovery_id),
        ))
    }
}
