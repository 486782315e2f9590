use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct SourceAlbum {
    pub id: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
}
