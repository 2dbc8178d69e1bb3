use serde::Serialize;
use serde_json::{Map, Value};
use solana_sdk::pubkey::Pubkey;

use crate::shared::errors::QuoteError;

/// One quote API query, amounts in atomic units of the input mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub amount: u128,
    pub slippage_bps: u32,
}

/// Quote as returned by the API: atomic amounts plus every other field untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    pub in_amount: u128,
    pub out_amount: u128,
    pub extra: Map<String, Value>,
}

impl RawQuote {
    /// Split a decoded JSON body into the two amount fields and the rest.
    pub fn from_json(body: Value) -> Result<Self, QuoteError> {
        let mut fields = match body {
            Value::Object(fields) => fields,
            other => {
                return Err(QuoteError::InvalidAmount {
                    field: "body",
                    value: other.to_string(),
                })
            }
        };
        let in_amount = take_atomic(&mut fields, "inAmount")?;
        let out_amount = take_atomic(&mut fields, "outAmount")?;
        // Recomputed from the normalized amounts.
        fields.remove("inputTokenPrice");
        Ok(Self {
            in_amount,
            out_amount,
            extra: fields,
        })
    }
}

// The API sends amounts as decimal strings; plain integers are accepted too.
fn take_atomic(fields: &mut Map<String, Value>, field: &'static str) -> Result<u128, QuoteError> {
    let value = fields.remove(field).ok_or(QuoteError::MissingField(field))?;
    let parsed = match &value {
        Value::String(s) => s.parse::<u128>().ok(),
        Value::Number(n) => n.as_u64().map(u128::from),
        _ => None,
    };
    parsed.ok_or_else(|| QuoteError::InvalidAmount {
        field,
        value: value.to_string(),
    })
}

/// Quote normalized to human units of each side's mint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub in_amount: f64,
    pub out_amount: f64,
    #[serde(rename = "inputTokenPrice")]
    pub price: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quote {
    /// Output minus input, both taken as near-parity stable value.
    pub fn net_gain(&self) -> f64 {
        self.out_amount - self.in_amount
    }

    /// Net gain after a fixed transaction fee estimate.
    pub fn gain(&self, network_fee_estimate: f64) -> f64 {
        self.net_gain() - network_fee_estimate
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
