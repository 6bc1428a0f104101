use pullrate_core::{CardPrices, CompactCardRecord};

use crate::filter::KeptCard;
use crate::raw::{RawCardRecord, non_empty};

/// Builds the stream record for a card the filter kept.
pub fn compact_record(raw: &RawCardRecord, kept: KeptCard<'_>) -> CompactCardRecord {
    let prices = raw.prices.as_ref().and_then(|p| {
        CardPrices::from_parts(
            p.eur.clone(),
            p.usd.clone(),
            p.eur_foil.clone(),
            p.usd_foil.clone(),
        )
    });

    CompactCardRecord {
        id: kept.id.map(str::to_string),
        name: raw.name.clone().unwrap_or_default(),
        set: raw.set.clone().unwrap_or_default(),
        rarity: kept.rarity,
        finishes: raw.finishes.clone().unwrap_or_default(),
        image_url: raw.normal_image().map(str::to_string),
        prices,
        collector_number: non_empty(raw.collector_number.as_deref()).map(str::to_string),
    }
}
