use serde::{Deserialize, Serialize};

use crate::model::rarity::Rarity;

/// Market prices for a printing, as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPrices {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eur: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eur_foil: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd_foil: Option<String>,
}

impl CardPrices {
    /// Returns `None` unless at least one of the four prices is a non-empty string.
    /// Empty strings are dropped from the result.
    pub fn from_parts(
        eur: Option<String>,
        usd: Option<String>,
        eur_foil: Option<String>,
        usd_foil: Option<String>,
    ) -> Option<Self> {
        let prices = Self {
            eur: non_empty(eur),
            usd: non_empty(usd),
            eur_foil: non_empty(eur_foil),
            usd_foil: non_empty(usd_foil),
        };
        if prices.is_empty() { None } else { Some(prices) }
    }

    pub fn is_empty(&self) -> bool {
        self.eur.is_none() && self.usd.is_none() && self.eur_foil.is_none() && self.usd_foil.is_none()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Per-printing record emitted by the ingestion pipeline.
///
/// Wire keys are abbreviated to keep the multi-hundred-megabyte card stream small.
/// The printing id is omitted when the snapshot record has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactCardRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "s")]
    pub set: String,
    #[serde(rename = "r")]
    pub rarity: Rarity,
    #[serde(rename = "f", default)]
    pub finishes: Vec<String>,
    #[serde(rename = "img", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub prices: Option<CardPrices>,
    #[serde(rename = "cn", default, skip_serializing_if = "Option::is_none")]
    pub collector_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CompactCardRecord {
        CompactCardRecord {
            id: Some("a1".into()),
            name: "Llanowar Elves".into(),
            set: "dmu".into(),
            rarity: Rarity::Common,
            finishes: vec!["nonfoil".into(), "foil".into()],
            image_url: None,
            prices: None,
            collector_number: None,
        }
    }

    #[test]
    fn optional_fields_are_omitted() {
        let json = serde_json::to_string(&record()).unwrap();
        assert_eq!(
            json,
            r#"{"id":"a1","n":"Llanowar Elves","s":"dmu","r":"common","f":["nonfoil","foil"]}"#
        );
    }

    #[test]
    fn prices_keep_only_present_values() {
        let mut card = record();
        card.prices = CardPrices::from_parts(None, Some("0.25".into()), Some(String::new()), None);
        card.collector_number = Some("168".into());
        let json = serde_json::to_string(&card).unwrap();
        assert!(json.ends_with(r#""p":{"usd":"0.25"},"cn":"168"}"#), "{json}");
    }

    #[test]
    fn all_absent_prices_collapse_to_none() {
        assert_eq!(CardPrices::from_parts(None, None, None, None), None);
        assert_eq!(
            CardPrices::from_parts(Some(String::new()), None, Some(String::new()), None),
            None
        );
    }

    #[test]
    fn absent_id_is_omitted() {
        let mut card = record();
        card.id = None;
        let json = serde_json::to_string(&card).unwrap();
        assert!(json.starts_with(r#"{"n":"Llanowar Elves""#), "{json}");
        let back: CompactCardRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, None);
    }

    #[test]
    fn decodes_card_without_finishes() {
        let card: CompactCardRecord =
            serde_json::from_str(r#"{"id":"x","n":"Opt","s":"xln","r":"common"}"#).unwrap();
        assert!(card.finishes.is_empty());
        assert_eq!(card.rarity, Rarity::Common);
    }
}
