//! Cart commands: engine wiring and cart rendering.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use rocketshoes_cart::config::CartConfig;
use rocketshoes_cart::notify::TracingNotifier;
use rocketshoes_cart::services::{ApiClient, CatalogService, FixtureInventory, StockService};
use rocketshoes_cart::storage::{CartStorage, FileStore};
use rocketshoes_cart::{CartEngine, CartOutcome, Collaborators};
use rocketshoes_core::Cart;

use super::CommandError;

/// Build an engine over the file store, using `fixtures` for stock and
/// catalog when given and the HTTP API otherwise.
pub fn build_engine(
    config: &CartConfig,
    fixtures: Option<&Path>,
) -> Result<CartEngine, CommandError> {
    let (stock, catalog) = match fixtures {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using fixture inventory");
            let inventory = FixtureInventory::from_path(path)?;
            let stock: Arc<dyn StockService> = Arc::new(inventory.clone());
            let catalog: Arc<dyn CatalogService> = Arc::new(inventory);
            (stock, catalog)
        }
        None => {
            tracing::info!(base_url = %config.api.base_url, "Using inventory API");
            let client = ApiClient::new(&config.api)?;
            let stock: Arc<dyn StockService> = Arc::new(client.clone());
            let catalog: Arc<dyn CatalogService> = Arc::new(client);
            (stock, catalog)
        }
    };

    let store = FileStore::new(&config.storage.dir);
    let storage = CartStorage::new(Arc::new(store), config.storage.key.clone());

    Ok(CartEngine::create(Collaborators {
        stock,
        catalog,
        storage,
        notifier: Arc::new(TracingNotifier),
    }))
}

/// Print the outcome (if an operation ran) followed by the cart.
pub fn print(cart: &Cart, outcome: Option<&CartOutcome>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if let Some(outcome) = outcome {
        render_outcome(outcome, &mut out)?;
    }
    render_cart(cart, &mut out)
}

fn render_outcome(outcome: &CartOutcome, out: &mut impl Write) -> io::Result<()> {
    match outcome {
        CartOutcome::Committed => writeln!(out, "Cart updated."),
        CartOutcome::Unchanged => writeln!(out, "Nothing to change."),
        CartOutcome::Rejected(failure) => writeln!(out, "Rejected: {failure}"),
    }
}

fn render_cart(cart: &Cart, out: &mut impl Write) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    writeln!(
        out,
        "{:<6} {:<40} {:>5} {:>12} {:>12}",
        "ID", "Product", "Qty", "Price", "Subtotal"
    )?;
    for item in cart.items() {
        writeln!(
            out,
            "{:<6} {:<40} {:>5} {:>12} {:>12}",
            item.product.id.to_string(),
            truncate(&item.product.title, 40),
            item.amount,
            item.product.price.to_string(),
            item.line_total().to_string(),
        )?;
    }

    let summary = cart.summary();
    writeln!(
        out,
        "{} product(s), {} unit(s), total {}",
        summary.distinct_items, summary.total_quantity, summary.subtotal
    )
}

fn truncate(title: &str, width: usize) -> String {
    if title.chars().count() <= width {
        return title.to_string();
    }
    let mut short: String = title.chars().take(width.saturating_sub(3)).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::num::NonZeroU32;

    use rocketshoes_cart::CartFailure;
    use rocketshoes_core::{LineItem, Price, ProductDetails, ProductId};

    use super::*;

    fn rendered(cart: &Cart) -> String {
        let mut buf = Vec::new();
        render_cart(cart, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn item(id: i32, title: &str, cents: i64, amount: u32) -> LineItem {
        LineItem {
            product: ProductDetails {
                id: ProductId::new(id),
                title: title.to_string(),
                price: Price::from_cents(cents),
                image: String::new(),
            },
            amount: NonZeroU32::new(amount).unwrap(),
        }
    }

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(rendered(&Cart::new()), "Your cart is empty.\n");
    }

    #[test]
    fn test_render_cart_lines_and_total() {
        let cart = Cart::from_items(vec![
            item(1, "Running shoe", 17990, 2),
            item(2, "Trail shoe", 13990, 1),
        ])
        .unwrap();

        let text = rendered(&cart);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("1 "));
        assert!(lines[1].contains("Running shoe"));
        assert!(lines[1].contains("$359.80"));
        assert_eq!(lines[3], "2 product(s), 3 unit(s), total $499.70");
    }

    #[test]
    fn test_render_outcome() {
        let mut buf = Vec::new();
        render_outcome(
            &CartOutcome::Rejected(CartFailure::NotInCart(ProductId::new(9))),
            &mut buf,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Rejected: product 9 is not in the cart\n"
        );
    }

    #[test]
    fn test_truncate_long_titles() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long product title", 10), "a very ...");
    }

    #[test]
    fn test_build_engine_from_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("db.json");
        std::fs::write(&fixture, r#"{"products": [], "stock": []}"#).unwrap();

        let config = CartConfig::from_lookup(|key| match key {
            "CART_STORAGE_DIR" => Some(dir.path().join("state").display().to_string()),
            _ => None,
        })
        .unwrap();

        let engine = build_engine(&config, Some(&fixture)).unwrap();
        assert!(engine.cart().is_empty());
    }
}
