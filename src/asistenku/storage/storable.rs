// src/asistenku/storage/storable.rs
use ic_stable_structures::{storable::Bound, Storable};
use serde::{de::DeserializeOwned, Serialize};
use std::borrow::Cow;

/// Wraps any serde type to make it Storable using CBOR encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cbor<T>(pub T)
where
    T: Serialize + DeserializeOwned;

impl<T> Storable for Cbor<T>
where
    T: Serialize + DeserializeOwned,
{
    fn to_bytes(&self) -> Cow<[u8]> {
        let mut writer = vec![];
        ciborium::ser::into_writer(&self.0, &mut writer)
            .expect("CBOR serialization into a Vec cannot fail for serde types");
        Cow::Owned(writer)
    }

    fn from_bytes(bytes: Cow<[u8]>) -> Self {
        let value: T = ciborium::de::from_reader(bytes.as_ref())
            .expect("stored bytes were written by to_bytes");
        Cbor(value)
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cbor_round_trips_optional_text() {
        let value = Cbor(Some("1700000000000".to_string()));
        let restored = Cbor::<Option<String>>::from_bytes(value.to_bytes());
        assert_eq!(restored, value);
    }
}
