// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Transport encoding of [`SignedAuthorization`].
//!
//! The intent is an RLP list
//! `[chain_id, sequence, gas_price, gas_limit, sender, to, amount, payload]`
//! where `to` is the empty string for deployments. Those are the bytes the sender signs.
//! A signed authorization is the same list with `[y_parity, r, s]` appended.

use crate::{
    authorization::AuthSignature, intent::MAX_PAYLOAD_SIZE, Address, Bytes, FeeParams,
    IntentKind, Result, SignedAuthorization, TransferIntent, U256,
};
use alloy_rlp::{BufMut, Decodable, Encodable, Header, EMPTY_STRING_CODE};

/// Converts authorizations to and from the bytes that cross the air gap.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationCodec;

impl AuthorizationCodec {
    /// Canonical bytes of `auth`. Equal inputs always give identical bytes.
    pub fn encode(auth: &SignedAuthorization) -> Vec<u8> {
        let mut out = Vec::with_capacity(auth.length());
        auth.encode(&mut out);
        out
    }

    /// Parses bytes produced by [`Self::encode`]. The signature is not checked here.
    pub fn decode(bytes: &[u8]) -> Result<SignedAuthorization> {
        let mut buf = bytes;
        let auth = SignedAuthorization::decode(&mut buf)?;
        if !buf.is_empty() {
            return Err(crate::Error::MalformedEncoding(format!(
                "{} trailing bytes after the authorization",
                buf.len()
            )));
        }
        Ok(auth)
    }

    /// Hex text form, for copying across the air gap by hand.
    pub fn encode_hex(auth: &SignedAuthorization) -> String {
        hex::encode(Self::encode(auth))
    }

    /// Parses [`Self::encode_hex`] output. A leading `0x` is accepted.
    pub fn decode_hex(text: &str) -> Result<SignedAuthorization> {
        let text = text.trim();
        let text = text.strip_prefix("0x").unwrap_or(text);
        let bytes = hex::decode(text)?;
        Self::decode(&bytes)
    }
}

impl SignedAuthorization {
    /// Shorthand for [`AuthorizationCodec::encode`].
    pub fn to_bytes(&self) -> Vec<u8> {
        AuthorizationCodec::encode(self)
    }

    /// Shorthand for [`AuthorizationCodec::decode`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        AuthorizationCodec::decode(bytes)
    }

    /// Shorthand for [`AuthorizationCodec::encode_hex`].
    pub fn to_hex(&self) -> String {
        AuthorizationCodec::encode_hex(self)
    }

    /// Shorthand for [`AuthorizationCodec::decode_hex`].
    pub fn from_hex(text: &str) -> Result<Self> {
        AuthorizationCodec::decode_hex(text)
    }
}

/// The bytes an intent is signed over.
pub(crate) fn encode_intent(intent: &TransferIntent) -> Vec<u8> {
    let mut out = Vec::with_capacity(intent.length());
    intent.encode(&mut out);
    out
}

fn kind_length(kind: &IntentKind) -> usize {
    match kind {
        IntentKind::Transfer { to } => to.length(),
        IntentKind::Deploy => 1,
    }
}

fn encode_kind(kind: &IntentKind, out: &mut dyn BufMut) {
    match kind {
        IntentKind::Transfer { to } => to.encode(out),
        IntentKind::Deploy => out.put_u8(EMPTY_STRING_CODE),
    }
}

fn decode_kind(buf: &mut &[u8]) -> alloy_rlp::Result<IntentKind> {
    let data: &[u8] = *buf;
    match data.first() {
        None => Err(alloy_rlp::Error::InputTooShort),
        Some(&EMPTY_STRING_CODE) => {
            *buf = &data[1..];
            Ok(IntentKind::Deploy)
        }
        Some(_) => Ok(IntentKind::Transfer {
            to: Address::decode(buf)?,
        }),
    }
}

fn intent_fields_length(intent: &TransferIntent) -> usize {
    intent.chain_id.length()
        + intent.sequence.length()
        + intent.fee.gas_price.length()
        + intent.fee.gas_limit.length()
        + intent.sender.length()
        + kind_length(&intent.kind)
        + intent.amount.length()
        + intent.payload.length()
}

fn encode_intent_fields(intent: &TransferIntent, out: &mut dyn BufMut) {
    intent.chain_id.encode(out);
    intent.sequence.encode(out);
    intent.fee.gas_price.encode(out);
    intent.fee.gas_limit.encode(out);
    intent.sender.encode(out);
    encode_kind(&intent.kind, out);
    intent.amount.encode(out);
    intent.payload.encode(out);
}

fn decode_intent_fields(buf: &mut &[u8]) -> alloy_rlp::Result<TransferIntent> {
    let chain_id = u64::decode(buf)?;
    let sequence = u64::decode(buf)?;
    let gas_price = U256::decode(buf)?;
    let gas_limit = u64::decode(buf)?;
    let sender = Address::decode(buf)?;
    let kind = decode_kind(buf)?;
    let amount = U256::decode(buf)?;
    let payload = Bytes::decode(buf)?;
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(alloy_rlp::Error::Custom("payload exceeds the maximum size"));
    }

    Ok(TransferIntent {
        chain_id,
        sender,
        kind,
        amount,
        sequence,
        fee: FeeParams::new(gas_price, gas_limit),
        payload,
    })
}

fn signature_fields_length(signature: &AuthSignature) -> usize {
    signature.y_parity.length() + signature.r.length() + signature.s.length()
}

/// Decodes one list item, making sure its fields consume exactly the announced payload.
fn decode_list<T>(
    buf: &mut &[u8],
    decode_fields: impl FnOnce(&mut &[u8]) -> alloy_rlp::Result<T>,
) -> alloy_rlp::Result<T> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(alloy_rlp::Error::UnexpectedString);
    }
    let data: &[u8] = *buf;
    if data.len() < header.payload_length {
        return Err(alloy_rlp::Error::InputTooShort);
    }
    let (mut payload, rest) = data.split_at(header.payload_length);
    let value = decode_fields(&mut payload)?;
    if !payload.is_empty() {
        return Err(alloy_rlp::Error::ListLengthMismatch {
            expected: header.payload_length,
            got: header.payload_length - payload.len(),
        });
    }
    *buf = rest;
    Ok(value)
}

impl Encodable for TransferIntent {
    fn encode(&self, out: &mut dyn BufMut) {
        Header {
            list: true,
            payload_length: intent_fields_length(self),
        }
        .encode(out);
        encode_intent_fields(self, out);
    }

    fn length(&self) -> usize {
        let payload_length = intent_fields_length(self);
        Header {
            list: true,
            payload_length,
        }
        .length()
            + payload_length
    }
}

impl Decodable for TransferIntent {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        decode_list(buf, decode_intent_fields)
    }
}

impl Encodable for SignedAuthorization {
    fn encode(&self, out: &mut dyn BufMut) {
        Header {
            list: true,
            payload_length: intent_fields_length(&self.intent)
                + signature_fields_length(&self.signature),
        }
        .encode(out);
        encode_intent_fields(&self.intent, out);
        self.signature.y_parity.encode(out);
        self.signature.r.encode(out);
        self.signature.s.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length =
            intent_fields_length(&self.intent) + signature_fields_length(&self.signature);
        Header {
            list: true,
            payload_length,
        }
        .length()
            + payload_length
    }
}

impl Decodable for SignedAuthorization {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        decode_list(buf, |fields| {
            let intent = decode_intent_fields(fields)?;
            let signature = AuthSignature {
                y_parity: bool::decode(fields)?,
                r: U256::decode(fields)?,
                s: U256::decode(fields)?,
            };
            Ok(SignedAuthorization::new(intent, signature))
        })
    }
}
