//! Strongly-typed identifiers.
//!
//! Submissions are keyed by a UUID minted by the store. Owners and company
//! groups are keyed by opaque strings: the engine never looks inside an owner
//! key, and group keys only need to be stable and unique per (owner, employer).

macro_rules! new_id {
    ($struct:ident, $doc:literal) => {
        #[doc = $doc]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $struct(pub uuid::Uuid);

        impl $struct {
            /// Mint a fresh, random identifier.
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl From<uuid::Uuid> for $struct {
            fn from(value: uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$struct> for uuid::Uuid {
            fn from(value: $struct) -> Self {
                value.0
            }
        }

        impl std::ops::Deref for $struct {
            type Target = uuid::Uuid;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::fmt::Display for $struct {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $struct {
            type Err = <uuid::Uuid as std::str::FromStr>::Err;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

macro_rules! text_key {
    ($struct:ident, $doc:literal) => {
        #[doc = $doc]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $struct(pub String);

        impl $struct {
            /// View the key as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $struct {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $struct {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $struct {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

new_id!(SubmissionId, "The identity of a stored submission");
text_key!(OwnerKey, "An opaque reference to the user who owns a submission");
text_key!(
    GroupKey,
    "Identifies the (owner, employer) cluster a submission belongs to"
);

impl GroupKey {
    /// The key used for a submission that was never assigned one.
    ///
    /// It depends only on the owner and employer, so grouping legacy records
    /// twice yields the same clusters.
    pub fn derived(owner: &OwnerKey, employer: &str) -> Self {
        Self(format!("group_{owner}_{employer}"))
    }

    /// Mint a persistent key, suffixed with a timestamp-derived discriminator.
    pub fn minted(owner: &OwnerKey, employer: &str, nanos: i128) -> Self {
        Self(format!("group_{owner}_{employer}_{nanos}"))
    }
}
