use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct SourceTrack {
    pub id: Option<String>,
    pub name: Option<String>,
}
