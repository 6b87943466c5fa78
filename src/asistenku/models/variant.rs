// src/asistenku/models/variant.rs
//
// Backend variant tags. Over candid the actor sends real variants
// (`variant { active }`); JSON gateways and Motoko's textual rendering send
// text ("active", "#active") or single-key objects ({"active": null}).
// `Tag<K>` is declared to candid as the variant of `K`'s labels and keeps
// whatever text arrived, so unknown tags survive until normalization.

use crate::models::layananku::LayananKind;
use crate::models::task::{RequestType, TaskStatusInternal};
use crate::models::user_profile::{Role, UserStatus};
use crate::utils::guards::strip_variant_tag;
use candid::types::{Field, Label, Serializer, Type, TypeInner};
use candid::CandidType;
use serde::de::{self, Deserializer, EnumAccess, IgnoredAny, MapAccess, VariantAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Labels of one backend variant type, as the actor declares them.
pub trait TagSet: 'static {
    const LABELS: &'static [&'static str];
}

impl TagSet for Role {
    const LABELS: &'static [&'static str] = &[
        "CLIENT",
        "PARTNER",
        "ADMIN",
        "ASISTENMU",
        "SUPERVISOR",
        "MANAGEMENT",
        "FINANCE",
        "CUSTOMER_SERVICE",
        "SUPERADMIN",
    ];
}

impl TagSet for UserStatus {
    const LABELS: &'static [&'static str] = &["active", "pending", "suspended", "blacklisted"];
}

impl TagSet for RequestType {
    const LABELS: &'static [&'static str] = &["NORMAL", "PRIORITY", "URGENT"];
}

impl TagSet for TaskStatusInternal {
    const LABELS: &'static [&'static str] =
        &["REQUESTED", "IN_PROGRESS", "QA_ASISTENMU", "REVISION", "DONE"];
}

impl TagSet for LayananKind {
    const LABELS: &'static [&'static str] = &["TENANG", "RAPI", "FOKUS", "JAGA"];
}

/// Labels in candid field order (by label hash).
fn candid_labels<K: TagSet>() -> Vec<Label> {
    let mut labels: Vec<Label> = K::LABELS.iter().map(|l| Label::Named(l.to_string())).collect();
    labels.sort();
    labels
}

/// A variant tag as received. Compared and parsed through the domain enums,
/// never matched on directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag<K> {
    raw: String,
    kind: PhantomData<K>,
}

impl<K> Tag<K> {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            kind: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl<K> fmt::Display for Tag<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<K> PartialEq<&str> for Tag<K> {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl<K: TagSet> Tag<K> {
    /// Candid label this tag stands for, matched without `#` and case.
    pub fn label(&self) -> Option<&'static str> {
        let bare = strip_variant_tag(&self.raw);
        K::LABELS
            .iter()
            .copied()
            .find(|label| label.eq_ignore_ascii_case(bare))
    }
}

impl<K: TagSet> CandidType for Tag<K> {
    fn _ty() -> Type {
        let fields = candid_labels::<K>()
            .into_iter()
            .map(|label| Field {
                id: label.into(),
                ty: TypeInner::Null.into(),
            })
            .collect();
        TypeInner::Variant(fields).into()
    }

    fn idl_serialize<S: Serializer>(&self, serializer: S) -> Result<(), S::Error> {
        use serde::ser::Error;

        let label = self
            .label()
            .ok_or_else(|| S::Error::custom(format!("{:?} is not a known variant tag", self.raw)))?;
        let index = candid_labels::<K>()
            .iter()
            .position(|l| matches!(l, Label::Named(name) if name == label))
            .ok_or_else(|| S::Error::custom(format!("{:?} has no candid index", label)))?;
        serializer.serialize_variant(index as u64)?;
        Ok(())
    }
}

impl<K> Serialize for Tag<K> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de, K> Deserialize<'de> for Tag<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TagVisitor).map(Tag::new)
    }
}

/// Name of a variant case. Candid hands it over as an identifier, not text.
struct CaseName(String);

impl<'de> Deserialize<'de> for CaseName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CaseVisitor;

        impl<'de> Visitor<'de> for CaseVisitor {
            type Value = CaseName;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a variant case name")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CaseName, E> {
                Ok(CaseName(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<CaseName, E> {
                Ok(CaseName(v))
            }
        }

        deserializer.deserialize_identifier(CaseVisitor)
    }
}

struct TagVisitor;

impl<'de> Visitor<'de> for TagVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a variant tag as a variant, as text or as a single-key object")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<String, A::Error> {
        let (CaseName(name), case) = data.variant::<CaseName>()?;
        case.unit_variant()?;
        Ok(name)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<String, A::Error> {
        let key: String = map
            .next_key()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let _: IgnoredAny = map.next_value()?;
        if map.next_key::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(2, &self));
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        status: Tag<UserStatus>,
    }

    fn status_of(json: &str) -> String {
        serde_json::from_str::<Holder>(json).expect("valid holder").status.to_string()
    }

    #[derive(CandidType, Deserialize)]
    enum ActorStatus {
        #[serde(rename = "active")]
        Active,
        #[serde(rename = "pending")]
        Pending,
        #[serde(rename = "suspended")]
        Suspended,
        #[serde(rename = "blacklisted")]
        Blacklisted,
    }

    #[test]
    fn accepts_all_json_tag_shapes() {
        assert_eq!(status_of(r#"{"status":"active"}"#), "active");
        assert_eq!(status_of(r##"{"status":"#active"}"##), "#active");
        assert_eq!(status_of(r#"{"status":{"active":null}}"#), "active");
        assert_eq!(status_of(r##"{"status":"#archived"}"##), "#archived");
    }

    #[test]
    fn rejects_multi_key_objects() {
        let parsed = serde_json::from_str::<Holder>(r#"{"status":{"active":null,"pending":null}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn decodes_a_candid_variant() {
        let bytes = candid::encode_one(ActorStatus::Suspended).expect("encodes");
        let tag: Tag<UserStatus> = candid::decode_one(&bytes).expect("variant decodes into a tag");
        assert_eq!(tag.as_str(), "suspended");
    }

    #[test]
    fn encodes_as_the_actor_variant() {
        let bytes = candid::encode_one(Tag::<UserStatus>::new("#Pending")).expect("encodes");
        let status: ActorStatus = candid::decode_one(&bytes).expect("actor type accepts it");
        assert!(matches!(status, ActorStatus::Pending));

        let unknown = candid::encode_one(Tag::<UserStatus>::new("#archived"));
        assert!(unknown.is_err());
    }

    #[test]
    fn labels_follow_the_domain_enums() {
        let roles: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
        assert_eq!(roles, <Role as TagSet>::LABELS);
        let statuses: Vec<&str> = TaskStatusInternal::ALL
            .iter()
            .map(TaskStatusInternal::as_str)
            .collect();
        assert_eq!(statuses, <TaskStatusInternal as TagSet>::LABELS);
    }

    #[test]
    fn label_ignores_prefix_and_case() {
        assert_eq!(Tag::<Role>::new(" #customer_service").label(), Some("CUSTOMER_SERVICE"));
        assert_eq!(Tag::<Role>::new("janitor").label(), None);
    }
}
