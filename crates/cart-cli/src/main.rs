use std::sync::Arc;

use anyhow::{bail, Context, Result};
use cart_core::controllers::{DetailController, ListingController};
use cart_core::ports::{Clock, KeyValueStorage, LinkOpener, SystemClock};
use cart_core::services::{
    CartBadge, CartManager, CartStore, NotificationQueue, NotificationTimings, OrderComposer,
    RandomOrderNumber, ScrollMemory,
};
use cart_infrastructure::{
    load_catalog, JsonFileStorage, PrintLinkOpener, SystemLinkOpener, TerminalCartView,
    TerminalDetailView, TerminalForm, TerminalNotifications,
};
use cart_shared::constants::{MAX_QUANTITY, MIN_QUANTITY};
use cart_shared::telemetry::init_telemetry;
use cart_shared::Settings;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cart", version, about = "Restaurant cart and WhatsApp ordering")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit logs as JSON
    #[arg(long, env = "CART_LOG_JSON", default_value_t = false)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the catalog
    Menu,
    /// Show one product
    Show { product_id: String },
    /// Add a product with its selection to the cart
    Add {
        product_id: String,

        #[arg(long, default_value_t = MIN_QUANTITY,
              value_parser = clap::value_parser!(u32).range(MIN_QUANTITY as i64..=MAX_QUANTITY as i64))]
        qty: u32,

        /// Extra as `name=quantity`; repeatable
        #[arg(long = "extra", value_parser = parse_addon)]
        extras: Vec<(String, i32)>,

        /// Drink as `name=quantity`; repeatable
        #[arg(long = "drink", value_parser = parse_addon)]
        drinks: Vec<(String, i32)>,

        #[arg(long)]
        greens: Option<String>,

        #[arg(long)]
        sauce: Option<String>,
    },
    /// Show the cart
    Cart {
        /// Print option blocks as HTML
        #[arg(long)]
        html: bool,
    },
    /// Remove one cart entry by id
    Remove { entry_id: String },
    /// Compose the order and hand it to WhatsApp
    Send {
        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long, default_value = "")]
        instructions: String,

        /// Print the link instead of opening it
        #[arg(long)]
        print_only: bool,
    },
    /// Listing-page scroll position
    Scroll {
        #[command(subcommand)]
        action: ScrollAction,
    },
}

#[derive(Subcommand, Debug)]
enum ScrollAction {
    Save { offset: f64 },
    Restore,
}

/// `name=quantity` with a quantity in `1..=MAX_QUANTITY`.
fn parse_addon(raw: &str) -> Result<(String, i32), String> {
    let (name, qty) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=quantity, got '{}'", raw))?;
    let qty = qty
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad quantity in '{}': {}", raw, e))?;
    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&qty) {
        return Err(format!(
            "quantity in '{}' must be between {} and {}",
            raw, MIN_QUANTITY, MAX_QUANTITY
        ));
    }
    let qty = i32::try_from(qty).map_err(|e| format!("bad quantity in '{}': {}", raw, e))?;
    Ok((name.trim().to_string(), qty))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry("warn,cart_core=info,cart_infrastructure=info", cli.log_json);

    let settings = Settings::load().context("Failed to load settings")?;
    info!("Starting cart for {}", settings.business.name);

    let storage: Arc<dyn KeyValueStorage> =
        Arc::new(JsonFileStorage::open(&settings.storage.path)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let screen = Arc::new(TerminalCartView {
        html: matches!(cli.command, Commands::Cart { html: true }),
    });

    let store = Arc::new(CartStore::new(storage.clone(), clock.clone()));
    let notifier = NotificationQueue::new(
        Arc::new(TerminalNotifications),
        NotificationTimings::from(&settings.notifications),
    );
    let badge = CartBadge::new(store.clone(), screen.clone());
    let cart = CartManager::new(store, notifier.clone(), badge.clone());
    let scroll = ScrollMemory::new(storage.clone(), clock.clone());

    match cli.command {
        Commands::Menu => {
            let catalog = load_catalog(&settings.catalog.path)?;
            for (id, product) in &catalog.products {
                println!("{:<20} {:<28} R{:.2}", id, product.name, product.price);
            }
        }
        Commands::Show { product_id } => {
            let catalog = Arc::new(load_catalog(&settings.catalog.path)?);
            let mut detail = DetailController::new(
                cart.clone(),
                catalog,
                Arc::new(TerminalDetailView::default()),
                clock.clone(),
            );
            detail.load(&product_id);
        }
        Commands::Add {
            product_id,
            qty,
            extras,
            drinks,
            greens,
            sauce,
        } => {
            let catalog = Arc::new(load_catalog(&settings.catalog.path)?);
            if let Some(g) = greens.as_deref() {
                if !catalog.greens.iter().any(|known| known == g) {
                    bail!("Unknown greens choice '{}'", g);
                }
            }
            if let Some(s) = sauce.as_deref() {
                if !catalog.sauces.iter().any(|known| known == s) {
                    bail!("Unknown sauce '{}'", s);
                }
            }

            let mut detail = DetailController::new(
                cart.clone(),
                catalog,
                Arc::new(TerminalDetailView { verbose: true }),
                clock.clone(),
            );
            if !detail.load(&product_id) {
                bail!("No product '{}'", product_id);
            }
            for _ in 1..qty {
                detail.increment_quantity();
            }
            for (name, n) in &extras {
                if detail.adjust_extra(name, *n).is_none() {
                    bail!("Unknown extra '{}'", name);
                }
            }
            for (name, n) in &drinks {
                if detail.adjust_drink(name, *n).is_none() {
                    bail!("Unknown drink '{}'", name);
                }
            }
            detail.select_greens(greens.as_deref());
            detail.select_sauce(sauce.as_deref());

            if let Some(entry) = detail.add_to_cart() {
                println!("Added entry {}", entry.id);
            }
        }
        Commands::Cart { .. } => {
            let listing = listing(&cart, &settings, clock.clone(), screen.clone(), false);
            listing.render();
            badge.refresh_now();
        }
        Commands::Remove { entry_id } => {
            let listing = listing(&cart, &settings, clock.clone(), screen.clone(), false);
            if !listing.remove(&entry_id) {
                println!("No cart entry '{}'", entry_id);
            }
        }
        Commands::Send {
            name,
            phone,
            instructions,
            print_only,
        } => {
            let listing = listing(&cart, &settings, clock.clone(), screen.clone(), print_only);
            let form = TerminalForm::new(&name, &phone, &instructions);
            match listing.send(&form).await {
                Ok(sent) => println!("Order #{} sent, total R{:.2}", sent.order_number, sent.total),
                // The queue already shows the reason.
                Err(e) => info!("Order not sent: {}", e),
            }
        }
        Commands::Scroll { action } => match action {
            ScrollAction::Save { offset } => {
                scroll.on_scroll(offset);
            }
            ScrollAction::Restore => match scroll.restore() {
                Some(offset) => println!("{}", offset),
                None => println!("No saved scroll position"),
            },
        },
    }

    badge.settle().await;
    scroll.settle().await;
    notifier.wait_idle().await;
    Ok(())
}

fn listing(
    cart: &CartManager,
    settings: &Settings,
    clock: Arc<dyn Clock>,
    view: Arc<TerminalCartView>,
    print_only: bool,
) -> ListingController {
    let opener: Arc<dyn LinkOpener> = if print_only {
        Arc::new(PrintLinkOpener)
    } else {
        Arc::new(SystemLinkOpener::new())
    };
    let composer = OrderComposer::new(
        cart.store().clone(),
        cart.notifier().clone(),
        opener,
        Arc::new(RandomOrderNumber),
        clock,
        settings.business.clone(),
        settings.messaging.clone(),
    );
    ListingController::new(cart.clone(), Arc::new(composer), view)
}
