use super::{require, NormalizeError};
use crate::catalog::SourceArtist;
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ArtistRecord {
    #[serde(rename = "ArtistID")]
    pub artist_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Followers")]
    pub followers: u64,
}

pub fn transform_artist(record: &SourceArtist) -> Result<ArtistRecord, NormalizeError> {
    let artist_id = require(record.id.as_ref(), "id")?;
    let name = require(record.name.as_ref(), "name")?;
    let followers = record
        .followers
        .as_ref()
        .ok_or(NormalizeError::MissingField("followers"))?;
    let followers = require(followers.total, "followers.total")?;

    Ok(ArtistRecord {
        artist_id: artist_id.clone(),
        name: name.clone(),
        followers,
    })
}

pub fn transform_artist_value(value: &serde_json::Value) -> Result<ArtistRecord, NormalizeError> {
    let record = SourceArtist::deserialize(value)?;
    transform_artist(&record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_artist() {
        let value = json!({"id": "A1", "name": "Test Artist", "followers": {"total": 42}});

        let record = transform_artist_value(&value).unwrap();

        assert_eq!(
            record,
            ArtistRecord {
                artist_id: "A1".to_owned(),
                name: "Test Artist".to_owned(),
                followers: 42,
            }
        );
    }

    #[test]
    fn serializes_with_renamed_keys() {
        let record = ArtistRecord {
            artist_id: "A1".to_owned(),
            name: "Test Artist".to_owned(),
            followers: 42,
        };

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            json!({"ArtistID": "A1", "Name": "Test Artist", "Followers": 42})
        );
    }

    #[test]
    fn fails_without_followers() {
        let value = json!({"id": "A1", "name": "Test Artist"});

        assert_eq!(
            transform_artist_value(&value),
            Err(NormalizeError::MissingField("followers"))
        );
    }

    #[test]
    fn fails_without_followers_total() {
        let value = json!({"id": "A1", "name": "Test Artist", "followers": {"href": null}});

        assert_eq!(
            transform_artist_value(&value),
            Err(NormalizeError::MissingField("followers.total"))
        );
    }

    #[test]
    fn fails_without_id_or_name() {
        let no_id = json!({"name": "Test Artist", "followers": {"total": 1}});
        let no_name = json!({"id": "A1", "followers": {"total": 1}});

        assert_eq!(
            transform_artist_value(&no_id),
            Err(NormalizeError::MissingField("id"))
        );
        assert_eq!(
            transform_artist_value(&no_name),
            Err(NormalizeError::MissingField("name"))
        );
    }

    #[test]
    fn wrongly_typed_field_is_malformed_record() {
        let value = json!({"id": "A1", "name": "Test Artist", "followers": {"total": "many"}});

        assert!(matches!(
            transform_artist_value(&value),
            Err(NormalizeError::MalformedRecord(_))
        ));
    }

    #[test]
    fn ignores_extra_keys() {
        let value = json!({
            "id": "A1",
            "name": "Test Artist",
            "followers": {"total": 0},
            "popularity": 12,
            "images": []
        });

        assert_eq!(transform_artist_value(&value).unwrap().followers, 0);
    }
}
