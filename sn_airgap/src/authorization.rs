// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{codec::AuthorizationCodec, Address, Error, Result, TransferIntent, B256, U256};
use alloy::primitives::keccak256;
use alloy::signers::k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use alloy::signers::utils::public_key_to_address;
use serde::{Deserialize, Serialize};

/// A recoverable secp256k1 signature, split the way it travels on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthSignature {
    pub y_parity: bool,
    pub r: U256,
    pub s: U256,
}

impl AuthSignature {
    pub(crate) fn from_recoverable(signature: &Signature, recovery_id: RecoveryId) -> Self {
        let bytes = signature.to_bytes();
        Self {
            y_parity: recovery_id.is_y_odd(),
            r: U256::from_be_slice(&bytes[..32]),
            s: U256::from_be_slice(&bytes[32..]),
        }
    }

    fn to_recoverable(self) -> Option<(Signature, RecoveryId)> {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        bytes[32..].copy_from_slice(&self.s.to_be_bytes::<32>());
        let signature = Signature::from_slice(&bytes).ok()?;
        Some((signature, RecoveryId::new(self.y_parity, false)))
    }

    /// Recovers the address that produced this signature over `prehash`.
    pub fn recover_address(&self, prehash: &B256) -> Option<Address> {
        let (signature, recovery_id) = self.to_recoverable()?;
        let key =
            VerifyingKey::recover_from_prehash(prehash.as_slice(), &signature, recovery_id).ok()?;
        Some(public_key_to_address(&key))
    }
}

/// An intent together with the sender's signature over its canonical bytes.
///
/// This is what crosses the air gap. It is self-contained: whoever holds it can
/// submit it, and nobody can alter it without breaking [`SignedAuthorization::verify`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedAuthorization {
    pub intent: TransferIntent,
    pub signature: AuthSignature,
}

impl SignedAuthorization {
    pub(crate) fn new(intent: TransferIntent, signature: AuthSignature) -> Self {
        Self { intent, signature }
    }

    pub fn intent(&self) -> &TransferIntent {
        &self.intent
    }

    pub fn sender(&self) -> Address {
        self.intent.sender
    }

    /// Keccak-256 of the full transport encoding.
    pub fn hash(&self) -> B256 {
        keccak256(AuthorizationCodec::encode(self))
    }

    /// Checks the signature recovers the claimed sender over the intent's canonical bytes.
    pub fn verify(&self) -> Result<()> {
        let sender = self.intent.sender;
        match self.signature.recover_address(&self.intent.signing_hash()) {
            Some(recovered) if recovered == sender => Ok(()),
            Some(recovered) => {
                debug!("Signature for {sender} recovered {recovered} instead");
                Err(Error::BadSignature(sender))
            }
            None => {
                debug!("Signature for {sender} is not recoverable");
                Err(Error::BadSignature(sender))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Account, FeeParams};
    use eyre::Result;

    fn signed_transfer() -> Result<(Account, SignedAuthorization)> {
        let mut account = Account::generate()?;
        let intent = account.transfer_intent(
            1337,
            Address::repeat_byte(7),
            U256::from(1_000u64),
            FeeParams::new(U256::from(1u64), 21_000),
        );
        let auth = account.sign(intent)?;
        Ok((account, auth))
    }

    #[test]
    fn verify_accepts_untouched_authorization() -> Result<()> {
        let (account, auth) = signed_transfer()?;
        assert_eq!(auth.sender(), account.address());
        auth.verify()?;
        Ok(())
    }

    #[test]
    fn verify_rejects_altered_amount() -> Result<()> {
        let (_, mut auth) = signed_transfer()?;
        auth.intent.amount += U256::from(1u64);
        assert_eq!(auth.verify(), Err(Error::BadSignature(auth.sender())));
        Ok(())
    }

    #[test]
    fn verify_rejects_claimed_sender_swap() -> Result<()> {
        let (_, mut auth) = signed_transfer()?;
        let other = Account::generate()?;
        auth.intent.sender = other.address();
        assert_eq!(auth.verify(), Err(Error::BadSignature(other.address())));
        Ok(())
    }

    #[test]
    fn verify_rejects_zeroed_signature() -> Result<()> {
        let (_, mut auth) = signed_transfer()?;
        auth.signature.r = U256::ZERO;
        assert!(auth.verify().is_err());
        Ok(())
    }

    #[test]
    fn hash_changes_with_signature() -> Result<()> {
        let (_, auth) = signed_transfer()?;
        let mut flipped = auth.clone();
        flipped.signature.y_parity = !flipped.signature.y_parity;
        assert_ne!(auth.hash(), flipped.hash());
        Ok(())
    }
}
