//! Mercari search and detail retrieval.
//!
//! Query URLs and row selectors follow the marketplace's rendered markup:
//! each search result is an `a[data-testid="thumbnail-link"]` whose thumbnail
//! carries the title and price in its `aria-label` (`<name>の画像 <price>`).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

use scout_core::{ItemCondition, ItemDetail, ItemId, ItemSummary, Price, SearchIntent, SortOrder};

use crate::error::{RenderError, RetrievalError};
use crate::renderer::{DEFAULT_FIELD_WAIT, PageRenderer, RenderedPage};

const BASE_URL: &str = "https://jp.mercari.com";
const SEARCH_PATH: &str = "/search";

/// Upper bound on materialized search rows. Keeps the candidate set small
/// enough to fit the selection call's context.
pub const SEARCH_RESULT_CAP: usize = 20;

// Search results page.
const ROW_SELECTOR: &str = r#"a[data-testid="thumbnail-link"]"#;
const THUMB_SELECTOR: &str = "div.merItemThumbnail";
const THUMB_IMG_SELECTOR: &str = "figure img";
const LABEL_SPLIT: &str = "の画像";

// Item detail page.
const NAME_SELECTOR: &str = r#"[data-testid="name"]"#;
const PRICE_SELECTOR: &str = r#"[data-testid="price"]"#;
const DESCRIPTION_SELECTOR: &str = r#"[data-testid="description"]"#;
const CONDITION_SELECTOR: &str = r#"[data-testid="item-condition"]"#;
const SELLER_SELECTOR: &str = r#"[data-testid="seller-name"]"#;
const RATING_SELECTOR: &str = r#"[data-testid="seller-rating"]"#;
const SHIPPING_SELECTOR: &str = r#"[data-testid="shipping-method"]"#;
const GALLERY_IMG_SELECTOR: &str = r#"[data-testid="image-gallery"] img"#;

/// Marketplace retrieval capability.
///
/// Stage code depends on this trait, not on [`MercariClient`], so tests can
/// substitute deterministic stubs.
#[async_trait]
pub trait Marketplace: Send + Sync {
    /// Run a search and return summaries in page order, bounded by the
    /// client's result cap. Zero rendered results is an empty `Vec`, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError`] when the results page cannot be retrieved
    /// at all.
    async fn search(&self, intent: &SearchIntent) -> Result<Vec<ItemSummary>, RetrievalError>;

    /// Fetch the full record for one listing.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Delisted`] when the listing no longer
    /// exists, or [`RetrievalError::MissingField`] when a required field
    /// never renders.
    async fn fetch_detail(&self, id: &ItemId) -> Result<ItemDetail, RetrievalError>;
}

/// Mercari client driving a [`PageRenderer`].
pub struct MercariClient {
    renderer: Arc<dyn PageRenderer>,
    result_cap: usize,
    field_wait: Duration,
}

impl MercariClient {
    /// Create a client with the default result cap and field wait.
    #[must_use]
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self::with_limits(renderer, SEARCH_RESULT_CAP, DEFAULT_FIELD_WAIT)
    }

    /// Create a client with explicit bounds.
    #[must_use]
    pub fn with_limits(
        renderer: Arc<dyn PageRenderer>,
        result_cap: usize,
        field_wait: Duration,
    ) -> Self {
        Self {
            renderer,
            result_cap,
            field_wait,
        }
    }

    fn search_url(intent: &SearchIntent) -> Url {
        let mut url = Url::parse(BASE_URL).expect("base url is valid");
        url.set_path(SEARCH_PATH);

        // The marketplace has no free-text category control, so a category
        // hint is folded into the keyword query.
        let mut keyword = intent.query();
        if let Some(category) = &intent.category {
            keyword.push(' ');
            keyword.push_str(category);
        }

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("keyword", &keyword);
            if let Some(min) = intent.price_min {
                pairs.append_pair("price_min", &min.amount().to_string());
            }
            if let Some(max) = intent.price_max {
                pairs.append_pair("price_max", &max.amount().to_string());
            }
            if let Some(id) = intent.condition.and_then(|c| c.mercari_id()) {
                pairs.append_pair("item_condition_id", &id.to_string());
            }
            match intent.sort {
                SortOrder::Relevance => {}
                SortOrder::PriceAsc => {
                    pairs.append_pair("sort", "price");
                    pairs.append_pair("order", "asc");
                }
                SortOrder::PriceDesc => {
                    pairs.append_pair("sort", "price");
                    pairs.append_pair("order", "desc");
                }
                SortOrder::Newest => {
                    pairs.append_pair("sort", "created_time");
                    pairs.append_pair("order", "desc");
                }
            }
        }
        url
    }

    fn item_url(id: &ItemId) -> Url {
        let mut url = Url::parse(BASE_URL).expect("base url is valid");
        url.set_path(&format!("/item/{id}"));
        url
    }
}

#[async_trait]
impl Marketplace for MercariClient {
    #[instrument(skip(self, intent), fields(query = %intent.query()))]
    async fn search(&self, intent: &SearchIntent) -> Result<Vec<ItemSummary>, RetrievalError> {
        let url = Self::search_url(intent);
        debug!(%url, "searching marketplace");

        match self.renderer.render(&url, ROW_SELECTOR, self.field_wait).await {
            Ok(page) => {
                let items = parse_search_results(page.html(), self.result_cap);
                debug!(count = items.len(), "search rows extracted");
                Ok(items)
            }
            // No row ever rendered: a query with zero results, not a fault.
            Err(RenderError::Timeout { .. }) => {
                warn!(%url, "no result rows rendered, treating as empty result set");
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn fetch_detail(&self, id: &ItemId) -> Result<ItemDetail, RetrievalError> {
        let url = Self::item_url(id);
        let page = match self.renderer.render(&url, NAME_SELECTOR, self.field_wait).await {
            Ok(page) => page,
            Err(RenderError::Gone { .. }) => return Err(RetrievalError::Delisted(id.clone())),
            Err(err) => return Err(err.into()),
        };
        parse_item_detail(&page, id, &url)
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("selector constant is valid")
}

/// Extract summaries from a rendered search results page, in page order.
///
/// Rows missing an id, a name, or a parseable price are skipped rather than
/// failing the page; the marketplace interleaves ad tiles that share the row
/// markup but not its fields.
fn parse_search_results(html: &str, cap: usize) -> Vec<ItemSummary> {
    let doc = Html::parse_document(html);
    let row_sel = selector(ROW_SELECTOR);
    let thumb_sel = selector(THUMB_SELECTOR);
    let img_sel = selector(THUMB_IMG_SELECTOR);

    let mut items = Vec::new();
    for row in doc.select(&row_sel) {
        if items.len() >= cap {
            break;
        }
        let Some(thumb) = row.select(&thumb_sel).next() else {
            continue;
        };
        let Some(label) = thumb.value().attr("aria-label") else {
            continue;
        };
        let (name, price_label) = match label.split_once(LABEL_SPLIT) {
            Some((name, price)) => (name.trim(), price.trim()),
            None => (label.trim(), ""),
        };
        let Some(price) = Price::parse_jpy(price_label) else {
            debug!(label, "row without a parseable price, skipping");
            continue;
        };
        let Some(href) = row.value().attr("href") else {
            continue;
        };
        let id = thumb
            .value()
            .attr("id")
            .map_or_else(|| id_from_href(href), ToString::to_string);
        if name.is_empty() || id.is_empty() {
            continue;
        }
        let thumbnail_url = row
            .select(&img_sel)
            .next()
            .and_then(|img| img.value().attr("src").map(ToString::to_string));

        items.push(ItemSummary {
            id: ItemId::new(id),
            name: name.to_string(),
            price,
            condition: ItemCondition::Unknown,
            thumbnail_url,
            listing_url: absolutize(href),
        });
    }
    items
}

fn id_from_href(href: &str) -> String {
    href.rsplit('/').next().unwrap_or_default().to_string()
}

fn absolutize(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{BASE_URL}{href}")
    }
}

/// Extract the full record from a rendered detail page.
fn parse_item_detail(
    page: &RenderedPage,
    id: &ItemId,
    url: &Url,
) -> Result<ItemDetail, RetrievalError> {
    let required = |field: &'static str, value: Option<String>| {
        value
            .filter(|v| !v.is_empty())
            .ok_or(RetrievalError::MissingField {
                id: id.clone(),
                field,
            })
    };

    let name = required("name", page.first_text(NAME_SELECTOR)?)?;
    let price_label = required("price", page.first_text(PRICE_SELECTOR)?)?;
    let price = Price::parse_jpy(&price_label).ok_or(RetrievalError::MissingField {
        id: id.clone(),
        field: "price",
    })?;
    let condition_label = required("condition", page.first_text(CONDITION_SELECTOR)?)?;
    let condition = ItemCondition::from_mercari_label(&condition_label);
    let description = required("description", page.first_text(DESCRIPTION_SELECTOR)?)?;
    let seller_name = required("seller_name", page.first_text(SELLER_SELECTOR)?)?;

    // Optional fields degrade to None rather than failing the fetch.
    let seller_rating = page
        .first_text(RATING_SELECTOR)?
        .and_then(|text| text.split_whitespace().next().and_then(|t| t.parse::<Decimal>().ok()));
    let shipping_info = page.first_text(SHIPPING_SELECTOR)?.filter(|s| !s.is_empty());
    let images = page.all_attrs(GALLERY_IMG_SELECTOR, "src")?;

    Ok(ItemDetail {
        id: id.clone(),
        name,
        price,
        condition,
        description,
        images,
        seller_name,
        seller_rating,
        shipping_info,
        listing_url: url.to_string(),
    })
}
