use serde::{Deserialize, Deserializer};

use crate::database::models::ExpenseFields;

/// Inbound expense body for create and update.
///
/// Every field is optional: a missing field and an explicit `null` both bind
/// to the zero value of the type. Unknown keys, including `id`, are ignored;
/// the id always comes from the store or from the request path.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExpensePayload {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub note: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

impl From<ExpensePayload> for ExpenseFields {
    fn from(payload: ExpensePayload) -> Self {
        Self {
            title: payload.title,
            amount: payload.amount,
            note: payload.note,
            tags: payload.tags,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
