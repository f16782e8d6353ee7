//! Immutable news catalog.

use std::collections::BTreeMap;

use tracing::info;

use super::error::MarketDataError;
use super::filter::NewsQuery;
use super::model::{NewsItem, NewsRecord};

/// Id-ordered, read-only collection of news items.
///
/// Built once at startup and shared behind an `Arc`. Iteration order is
/// always ascending by id, so serialising a catalog (or a selection from it)
/// is deterministic.
#[derive(Debug, Clone)]
pub struct NewsCatalog {
    items: BTreeMap<u32, NewsItem>,
}

/// Result of applying a `NewsQuery` to a catalog.
#[derive(Debug)]
pub struct NewsSelection<'a> {
    /// Number of items in the catalog.
    pub total: usize,
    /// Number of items that passed the currency filter.
    pub matched: usize,
    /// Returned items, keyed by id (at most `limit`).
    pub items: BTreeMap<u32, &'a NewsItem>,
}

impl NewsCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(items: impl IntoIterator<Item = NewsItem>) -> Result<Self, MarketDataError> {
        let mut map = BTreeMap::new();
        for item in items {
            let id = item.id();
            if map.insert(id, item).is_some() {
                return Err(MarketDataError::DuplicateNewsId(id));
            }
        }
        Ok(Self { items: map })
    }

    /// The built-in news collection served by `noticias_financieras`.
    pub fn builtin() -> Result<Self, MarketDataError> {
        let catalog = Self::new([
            NewsItem::from_parallel(
                1,
                "Mercados financieros globales en alza",
                "Los mercados financieros globales han experimentado un aumento significativo debido a las expectativas de recuperación económica post-pandemia.",
                &["USD", "EUR", "JPY"],
                &["5/10", "6/10", "4/10"],
            )?,
            NewsItem::from_parallel(
                2,
                "Aumento de la inflación en EE.UU.",
                "La inflación en EE.UU. ha alcanzado un nuevo máximo en los últimos 12 meses, afectando el poder adquisitivo de los consumidores.",
                &["USD"],
                &["7/10"],
            )?,
            NewsItem::from_parallel(
                3,
                "Tensiones comerciales entre China y EE.UU.",
                "Las tensiones comerciales entre China y EE.UU. continúan afectando los mercados financieros, con posibles repercusiones en las cadenas de suministro globales.",
                &["CNY", "USD"],
                &["6/10", "5/10"],
            )?,
            NewsItem::from_parallel(
                4,
                "Innovaciones tecnológicas en fintech",
                "El sector fintech está experimentando un auge en innovaciones tecnológicas que están transformando los servicios financieros.",
                &["USD", "EUR"],
                &["4/10", "4/10"],
            )?,
            NewsItem::from_parallel(
                5,
                "Políticas monetarias de los bancos centrales",
                "Los bancos centrales están ajustando sus políticas monetarias para abordar la inflación y estimular el crecimiento económico.",
                &["USD", "EUR", "GBP"],
                &["6/10", "5/10", "4/10"],
            )?,
        ])?;

        info!("Loaded {} built-in news items", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&NewsItem> {
        self.items.get(&id)
    }

    /// Iterate items in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &NewsItem> {
        self.items.values()
    }

    /// Wire records for the whole catalog, keyed by id.
    pub fn records(&self) -> BTreeMap<u32, NewsRecord> {
        self.items
            .iter()
            .map(|(id, item)| (*id, item.to_record()))
            .collect()
    }

    /// Apply a query: filter by currency, then keep the first `limit` items
    /// by id.
    pub fn select(&self, query: &NewsQuery) -> NewsSelection<'_> {
        let matching: Vec<&NewsItem> = self.iter().filter(|item| query.matches(item)).collect();
        let matched = matching.len();
        let limit = query.limit().unwrap_or(matched);

        NewsSelection {
            total: self.len(),
            matched,
            items: matching
                .into_iter()
                .take(limit)
                .map(|item| (item.id(), item))
                .collect(),
        }
    }
}
