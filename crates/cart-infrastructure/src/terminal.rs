//! Terminal renderings of the page surfaces

use cart_core::ports::{
    BadgeView, CartLineView, CartView, DetailView, NotificationSink, OrderForm, ProductCard,
};
use cart_core::{NotificationKind, NotificationRequest, TransientUIState};
use parking_lot::Mutex;

/// Prints each notification once, on stderr.
#[derive(Default)]
pub struct TerminalNotifications;

impl NotificationSink for TerminalNotifications {
    fn show(&self, request: &NotificationRequest) {
        let marker = match request.kind {
            NotificationKind::Success => "✔",
            NotificationKind::Error => "✖",
            NotificationKind::Info => "ℹ",
        };
        eprintln!("{} {}", marker, request.message);
    }

    fn begin_exit(&self) {}

    fn remove(&self) {}
}

/// Cart list printer. `html` switches option blocks to their HTML form.
#[derive(Default)]
pub struct TerminalCartView {
    pub html: bool,
}

impl CartView for TerminalCartView {
    fn render_items(&self, lines: &[CartLineView], total: &str) {
        for (index, line) in lines.iter().enumerate() {
            println!(
                "{:>2}. {} × {}  {}  [{}]",
                index + 1,
                line.name,
                line.quantity,
                line.line_total,
                line.id
            );
            let options = if self.html {
                &line.options_html
            } else {
                &line.options_text
            };
            if !options.is_empty() {
                println!("{}", options);
            }
        }
        println!("Total: {}", total);
    }

    fn render_empty(&self) {
        println!("Your cart is empty.");
    }
}

impl BadgeView for TerminalCartView {
    fn set_count(&self, count: u32) {
        println!("🛒 {} item(s) in cart", count);
    }
}

#[derive(Default)]
pub struct TerminalDetailView {
    /// Print every selection change, not just product lookups.
    pub verbose: bool,
}

impl DetailView for TerminalDetailView {
    fn render_product(&self, card: &ProductCard) {
        println!("{} ({})  {}", card.name, card.id, card.price);
        if !card.description.is_empty() {
            println!("  {}", card.description);
        }
        println!("  image: {}", card.image);
    }

    fn render_not_found(&self, product_id: &str) {
        println!("Product '{}' was not found.", product_id);
    }

    fn render_selection(&self, state: &TransientUIState, unit_price: &str, total: &str) {
        if self.verbose {
            println!("  qty {} at {} each = {}", state.quantity, unit_price, total);
        }
    }
}

/// Order form fields filled from command-line arguments.
pub struct TerminalForm {
    fields: Mutex<FormFields>,
}

#[derive(Default)]
struct FormFields {
    name: String,
    phone: String,
    instructions: String,
}

impl TerminalForm {
    pub fn new(name: &str, phone: &str, instructions: &str) -> Self {
        Self {
            fields: Mutex::new(FormFields {
                name: name.to_string(),
                phone: phone.to_string(),
                instructions: instructions.to_string(),
            }),
        }
    }
}

impl OrderForm for TerminalForm {
    fn name(&self) -> String {
        self.fields.lock().name.clone()
    }

    fn phone(&self) -> String {
        self.fields.lock().phone.clone()
    }

    fn instructions(&self) -> String {
        self.fields.lock().instructions.clone()
    }

    fn clear(&self) {
        *self.fields.lock() = FormFields::default();
    }
}
