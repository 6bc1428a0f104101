use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Fields of one bulk-snapshot card object that the pipeline reads.
///
/// Every field is optional so that sparse objects still decode; unknown fields are ignored.
/// Only the filter inputs (`lang`, `digital`, `booster`, `layout`, `rarity`) must have
/// their expected type. Any other field of the wrong type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCardRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub oracle_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub set: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub set_name: Option<String>,
    pub lang: Option<String>,
    pub digital: Option<bool>,
    pub booster: Option<bool>,
    pub layout: Option<String>,
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_uris: Option<ImageUris>,
    #[serde(default, deserialize_with = "lenient_faces")]
    pub card_faces: Option<Vec<CardFace>>,
    #[serde(default, deserialize_with = "lenient")]
    pub finishes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub prices: Option<RawPrices>,
    #[serde(default, deserialize_with = "lenient")]
    pub collector_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub type_line: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageUris {
    #[serde(default, deserialize_with = "lenient")]
    pub normal: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CardFace {
    #[serde(default, deserialize_with = "lenient")]
    pub image_uris: Option<ImageUris>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPrices {
    #[serde(default, deserialize_with = "lenient")]
    pub usd: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub usd_foil: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub eur: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub eur_foil: Option<String>,
}

/// Reads a display field, treating a value of the wrong type like a missing one.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Keeps face positions: a face that is not an object becomes an empty face.
fn lenient_faces<'de, D>(deserializer: D) -> Result<Option<Vec<CardFace>>, D::Error>
where
    D: Deserializer<'de>,
{
    let faces: Option<Vec<Value>> = lenient(deserializer)?;
    Ok(faces.map(|faces| {
        faces
            .into_iter()
            .map(|face| CardFace::deserialize(face).unwrap_or_default())
            .collect()
    }))
}

impl RawCardRecord {
    /// Key that collapses reprints of one card within a set: the oracle id, else the printing id.
    pub fn dedup_identity(&self) -> Option<&str> {
        non_empty(self.oracle_id.as_deref()).or_else(|| non_empty(self.id.as_deref()))
    }

    /// Own normal-size image, else the first face's.
    pub fn normal_image(&self) -> Option<&str> {
        let own = self
            .image_uris
            .as_ref()
            .and_then(|uris| uris.normal.as_deref());
        let first_face = || {
            self.card_faces
                .as_ref()
                .and_then(|faces| faces.first())
                .and_then(|face| face.image_uris.as_ref())
                .and_then(|uris| uris.normal.as_deref())
        };
        non_empty(own.or_else(first_face))
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sparse_object_and_ignores_unknown_fields() {
        let raw: RawCardRecord = serde_json::from_str(
            r#"{"object":"card","id":"abc","lang":"en","legalities":{"modern":"legal"}}"#,
        )
        .unwrap();
        assert_eq!(raw.id.as_deref(), Some("abc"));
        assert_eq!(raw.rarity, None);
        assert_eq!(raw.booster, None);
    }

    #[test]
    fn null_fields_decode_as_absent() {
        let raw: RawCardRecord =
            serde_json::from_str(r#"{"id":"abc","oracle_id":null,"prices":{"usd":null}}"#)
                .unwrap();
        assert_eq!(raw.oracle_id, None);
        assert_eq!(raw.prices.unwrap().usd, None);
    }

    #[test]
    fn wrongly_typed_display_fields_read_as_absent() {
        let raw: RawCardRecord = serde_json::from_str(
            r#"{"id":"x","lang":"en","rarity":"rare","set":"s","set_name":"S",
                "collector_number":150,"prices":{"usd":1.5,"eur":"0.90"},
                "finishes":"foil","image_uris":"none","type_line":null}"#,
        )
        .unwrap();
        assert_eq!(raw.collector_number, None);
        assert_eq!(raw.finishes, None);
        assert_eq!(raw.image_uris, None);
        assert_eq!(raw.type_line, None);
        let prices = raw.prices.unwrap();
        assert_eq!(prices.usd, None);
        assert_eq!(prices.eur.as_deref(), Some("0.90"));
        assert_eq!(raw.rarity.as_deref(), Some("rare"));
    }

    #[test]
    fn non_object_faces_keep_their_position() {
        let raw: RawCardRecord = serde_json::from_str(
            r#"{"card_faces":[{"image_uris":{"normal":"front.jpg"}}, 7]}"#,
        )
        .unwrap();
        let faces = raw.card_faces.as_ref().unwrap();
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[1], CardFace::default());
        assert_eq!(raw.normal_image(), Some("front.jpg"));

        let raw: RawCardRecord =
            serde_json::from_str(r#"{"card_faces":[7, {"image_uris":{"normal":"back.jpg"}}]}"#)
                .unwrap();
        assert_eq!(raw.normal_image(), None);
    }

    #[test]
    fn filter_inputs_stay_strict() {
        assert!(serde_json::from_str::<RawCardRecord>(r#"{"digital":"yes"}"#).is_err());
        assert!(serde_json::from_str::<RawCardRecord>(r#"{"rarity":3}"#).is_err());
    }

    #[test]
    fn identity_prefers_oracle_id() {
        let mut raw = RawCardRecord {
            id: Some("print-1".into()),
            oracle_id: Some("oracle-1".into()),
            ..Default::default()
        };
        assert_eq!(raw.dedup_identity(), Some("oracle-1"));
        raw.oracle_id = Some(String::new());
        assert_eq!(raw.dedup_identity(), Some("print-1"));
        raw.oracle_id = None;
        assert_eq!(raw.dedup_identity(), Some("print-1"));
    }

    #[test]
    fn image_falls_back_to_first_face() {
        let raw: RawCardRecord = serde_json::from_str(
            r#"{"card_faces":[{"image_uris":{"normal":"front.jpg"}},{"image_uris":{"normal":"back.jpg"}}]}"#,
        )
        .unwrap();
        assert_eq!(raw.normal_image(), Some("front.jpg"));

        let raw: RawCardRecord = serde_json::from_str(
            r#"{"image_uris":{"normal":"own.jpg"},"card_faces":[{"image_uris":{"normal":"front.jpg"}}]}"#,
        )
        .unwrap();
        assert_eq!(raw.normal_image(), Some("own.jpg"));

        let raw: RawCardRecord =
            serde_json::from_str(r#"{"card_faces":[{"name":"no image"}]}"#).unwrap();
        assert_eq!(raw.normal_image(), None);
    }
}
