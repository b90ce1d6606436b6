use std::{fmt, str::FromStr};

use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyId(pub Uuid);

impl PartyId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid party id '{0}'")]
pub struct InvalidPartyId(pub String);

/// Only the lowercase hyphenated form names a party; other UUID spellings
/// (braced, urn, simple, uppercase) are rejected.
impl FromStr for PartyId {
    type Err = InvalidPartyId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .ok()
            .filter(|uuid| uuid.hyphenated().to_string() == s)
            .map(Self)
            .ok_or_else(|| InvalidPartyId(s.to_string()))
    }
}

/// A customer or supplier on the books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: PartyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_limit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_limit_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_field1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_field2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_field3: Option<String>,
}

/// Fields accepted when creating a party. The id is always assigned by the
/// store; an `id` key in the input is read and discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewParty {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_limit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_limit_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_field1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_field2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_field3: Option<String>,
    #[doc(hidden)]
    #[serde(default, rename = "id", skip_serializing)]
    pub ignored_id: Option<IgnoredAny>,
}

impl NewParty {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update applied by a shallow merge.
///
/// For each optional field: an absent key keeps the stored value, a value
/// replaces it and an explicit `null` clears it. `name` cannot be cleared, so
/// `null` there is the same as leaving it out. An `id` key is read and
/// discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub gstin: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub opening_balance: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub gst_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub as_of_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub no_limit: Option<Option<bool>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub custom_limit_value: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub additional_field1: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub additional_field2: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub additional_field3: Option<Option<String>>,
    #[doc(hidden)]
    #[serde(default, rename = "id", skip_serializing)]
    pub ignored_id: Option<IgnoredAny>,
}

// Present-but-null must stay distinguishable from absent.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Party {
    pub fn from_new(id: PartyId, fields: NewParty) -> Self {
        Self {
            id,
            name: fields.name,
            gstin: fields.gstin,
            phone: fields.phone,
            email: fields.email,
            billing_address: fields.billing_address,
            shipping_address: fields.shipping_address,
            opening_balance: fields.opening_balance,
            gst_type: fields.gst_type,
            state: fields.state,
            as_of_date: fields.as_of_date,
            no_limit: fields.no_limit,
            custom_limit_value: fields.custom_limit_value,
            additional_field1: fields.additional_field1,
            additional_field2: fields.additional_field2,
            additional_field3: fields.additional_field3,
        }
    }

    /// Overwrites every field the patch carries. The id is never touched.
    pub fn apply(&mut self, patch: PartyPatch) {
        fn merge<T>(slot: &mut Option<T>, update: Option<Option<T>>) {
            if let Some(value) = update {
                *slot = value;
            }
        }

        if let Some(name) = patch.name {
            self.name = name;
        }
        merge(&mut self.gstin, patch.gstin);
        merge(&mut self.phone, patch.phone);
        merge(&mut self.email, patch.email);
        merge(&mut self.billing_address, patch.billing_address);
        merge(&mut self.shipping_address, patch.shipping_address);
        merge(&mut self.opening_balance, patch.opening_balance);
        merge(&mut self.gst_type, patch.gst_type);
        merge(&mut self.state, patch.state);
        merge(&mut self.as_of_date, patch.as_of_date);
        merge(&mut self.no_limit, patch.no_limit);
        merge(&mut self.custom_limit_value, patch.custom_limit_value);
        merge(&mut self.additional_field1, patch.additional_field1);
        merge(&mut self.additional_field2, patch.additional_field2);
        merge(&mut self.additional_field3, patch.additional_field3);
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
