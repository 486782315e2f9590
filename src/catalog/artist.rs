use serde::{Deserialize, Serialize};

#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, Eq, Default)]
pub struct Followers {
    pub total: Option<u64>,
}

/// Artist object as returned by the catalog API.
/// Only the flattened fields are modeled, every other key is ignored
/// whatever its value. Presence is checked by the normalizer.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, Eq, Default)]
pub struct SourceArtist {
    pub id: Option<String>,
    pub name: Option<String>,
    pub followers: Option<Followers>,
}
