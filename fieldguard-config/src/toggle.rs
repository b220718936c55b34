// Serde helpers for options that are either `false` or an active value

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Toggle<T> {
    Off,
    Flag(bool),
    On(T),
}

pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_bool(false),
    }
}

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Toggle::<T>::deserialize(deserializer)? {
        Toggle::Off | Toggle::Flag(false) => Ok(None),
        Toggle::Flag(true) => Err(serde::de::Error::custom(
            "expected a value or `false`, found `true`",
        )),
        Toggle::On(v) => Ok(Some(v)),
    }
}
