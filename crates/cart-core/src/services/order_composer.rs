//! Order validation, message composition and messaging hand-off

use std::sync::Arc;

use cart_shared::config::{BusinessSettings, MessagingSettings};
use cart_shared::utils::mask_phone;
use chrono::{Local, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use super::cart_store::CartStore;
use super::formatter::{format_options_text, format_price, strip_message_markup};
use super::notification_queue::NotificationQueue;
use super::order_number::OrderNumberSource;
use crate::domain::{CartEntry, CustomerContact, SentOrder};
use crate::error::OrderError;
use crate::ports::{Clock, LinkOpener, OrderForm};

/// `+27` or `0`, a non-zero digit, then eight digits.
static SA_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+27|0)[1-9][0-9]{8}$").expect("valid phone pattern"));

const SECTION_DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━";
const ITEM_DIVIDER: &str = "────────────────────";

/// Check name and phone, returning the phone in local `0XXXXXXXXX` form.
pub fn validate_contact(name: &str, phone: &str) -> Result<CustomerContact, OrderError> {
    let name = name.trim();
    let phone: String = phone.trim().chars().filter(|c| !c.is_whitespace()).collect();

    if name.is_empty() || phone.is_empty() {
        return Err(OrderError::MissingContact);
    }
    if !SA_PHONE.is_match(&phone) {
        return Err(OrderError::InvalidPhone);
    }

    Ok(CustomerContact {
        name: name.to_string(),
        phone: normalize_phone(&phone),
    })
}

/// Rewrite a leading `+27` or `27` to `0`.
pub fn normalize_phone(phone: &str) -> String {
    if let Some(rest) = phone.strip_prefix("+27") {
        format!("0{}", rest)
    } else if let Some(rest) = phone.strip_prefix("27") {
        format!("0{}", rest)
    } else {
        phone.to_string()
    }
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

pub fn build_deep_link(messaging: &MessagingSettings, message: &str) -> String {
    format!(
        "{}/{}?text={}",
        messaging.base_url.trim_end_matches('/'),
        messaging.business_id,
        encode_uri_component(message)
    )
}

/// Validates the order form, builds the order message from the cart and
/// hands it to the messaging application. The cart is cleared only after
/// the link was opened.
pub struct OrderComposer {
    store: Arc<CartStore>,
    notifier: NotificationQueue,
    opener: Arc<dyn LinkOpener>,
    numbers: Arc<dyn OrderNumberSource>,
    clock: Arc<dyn Clock>,
    business: BusinessSettings,
    messaging: MessagingSettings,
}

impl OrderComposer {
    pub fn new(
        store: Arc<CartStore>,
        notifier: NotificationQueue,
        opener: Arc<dyn LinkOpener>,
        numbers: Arc<dyn OrderNumberSource>,
        clock: Arc<dyn Clock>,
        business: BusinessSettings,
        messaging: MessagingSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            opener,
            numbers,
            clock,
            business,
            messaging,
        }
    }

    pub async fn compose_and_send(&self, form: &dyn OrderForm) -> Result<SentOrder, OrderError> {
        // 1. Cart must have something in it
        let entries = self.store.read();
        if entries.is_empty() {
            return Err(self.reject(OrderError::EmptyCart));
        }

        // 2. Contact details
        let contact = validate_contact(&form.name(), &form.phone()).map_err(|e| self.reject(e))?;
        let instructions = form.instructions().trim().to_string();

        // 3. Message and link
        let order_number = self.numbers.next_order_number();
        let message = self.build_message(order_number, &contact, &entries, &instructions);
        let link = build_deep_link(&self.messaging, &message);

        // 4. Hand off; the cart stays intact if this fails
        if let Err(e) = self.opener.open(&link).await {
            warn!("Order #{} not sent: {}", order_number, e);
            return Err(self.reject(OrderError::from(e)));
        }

        // 5. Confirmed: reset cart and form
        if !self.store.clear() {
            warn!("Order #{} sent but the cart could not be cleared", order_number);
        }
        form.clear();

        let total = order_total(&entries);
        info!(
            "Order #{} sent for {} ({} entries, {})",
            order_number,
            mask_phone(&contact.phone),
            entries.len(),
            format_price(total)
        );
        self.notifier.success(format!(
            "Order #{} sent! We'll confirm it on WhatsApp shortly.",
            order_number
        ));

        Ok(SentOrder {
            order_number,
            total,
            message,
            link,
        })
    }

    fn reject(&self, err: OrderError) -> OrderError {
        warn!("Order rejected: {:?}", err);
        self.notifier.error(err.to_string());
        err
    }

    pub fn build_message(
        &self,
        order_number: u16,
        contact: &CustomerContact,
        entries: &[CartEntry],
        instructions: &str,
    ) -> String {
        let business = &self.business;
        let mut lines = vec![
            format!("*🍔 NEW ORDER - {}*", business.name.to_uppercase()),
            format!("Order #{}", order_number),
            SECTION_DIVIDER.to_string(),
            format!("*Customer:* {}", strip_message_markup(&contact.name)),
            format!("*Phone:* {}", strip_message_markup(&contact.phone)),
            SECTION_DIVIDER.to_string(),
            "*ORDER DETAILS:*".to_string(),
        ];

        for (index, entry) in entries.iter().enumerate() {
            if index > 0 {
                lines.push(ITEM_DIVIDER.to_string());
            }
            lines.push(format!("*{}. {}*", index + 1, strip_message_markup(&entry.name)));
            lines.push(format!("   Quantity: {}", entry.quantity));
            lines.push(format!("   Price: {}", format_price(entry.line_total())));
            let options = format_options_text(entry);
            if !options.is_empty() {
                lines.push(options);
            }
        }

        lines.push(SECTION_DIVIDER.to_string());
        lines.push(format!("*TOTAL: {}*", format_price(order_total(entries))));
        lines.push(SECTION_DIVIDER.to_string());
        lines.push(format!("📅 {}", self.local_timestamp()));

        if !instructions.is_empty() {
            lines.push("📝 *Special Instructions:*".to_string());
            lines.push(strip_message_markup(instructions));
        }

        lines.extend([
            SECTION_DIVIDER.to_string(),
            format!("📍 {}", business.address),
            format!("🕒 {}", business.hours),
            format!("📞 {}", business.contact),
            format!("Thank you for ordering from {}!", business.name),
        ]);
        lines.join("\n")
    }

    fn local_timestamp(&self) -> String {
        match Local.timestamp_millis_opt(self.clock.now_millis()).single() {
            Some(at) => at.format("%Y/%m/%d, %H:%M:%S").to_string(),
            None => String::from("unknown time"),
        }
    }
}

fn order_total(entries: &[CartEntry]) -> f64 {
    entries.iter().map(CartEntry::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineAddon, NotificationKind, NotificationRequest};
    use crate::error::OpenError;
    use crate::ports::link_opener::MockLinkOpener;
    use crate::ports::{ManualClock, MemoryStorage, NotificationSink};
    use crate::services::notification_queue::NotificationTimings;
    use crate::services::order_number::FixedOrderNumber;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        shown: Mutex<Vec<NotificationRequest>>,
    }

    impl NotificationSink for RecordingSink {
        fn show(&self, request: &NotificationRequest) {
            self.shown.lock().push(request.clone());
        }
        fn begin_exit(&self) {}
        fn remove(&self) {}
    }

    struct Form {
        fields: Mutex<(String, String, String)>,
    }

    impl Form {
        fn new(name: &str, phone: &str, instructions: &str) -> Self {
            Self {
                fields: Mutex::new((name.into(), phone.into(), instructions.into())),
            }
        }
    }

    impl OrderForm for Form {
        fn name(&self) -> String {
            self.fields.lock().0.clone()
        }
        fn phone(&self) -> String {
            self.fields.lock().1.clone()
        }
        fn instructions(&self) -> String {
            self.fields.lock().2.clone()
        }
        fn clear(&self) {
            *self.fields.lock() = Default::default();
        }
    }

    fn business() -> BusinessSettings {
        BusinessSettings {
            name: "Kasi Grill".into(),
            address: "1 Main Rd".into(),
            hours: "10-21".into(),
            contact: "082 555 0199".into(),
        }
    }

    fn messaging() -> MessagingSettings {
        MessagingSettings {
            base_url: "https://wa.me/".into(),
            business_id: "27825550199".into(),
        }
    }

    fn burger(id: &str, price: f64, quantity: u32) -> CartEntry {
        CartEntry {
            id: id.into(),
            product_id: "burger".into(),
            name: "Classic Burger".into(),
            base_price: price,
            base_product_price: 85.0,
            quantity,
            options: "Greens: Lettuce | Sauces: BBQ".into(),
            extras: vec![LineAddon::new("Cheese", 10.0, 1)],
            drinks: vec![],
            image: "img".into(),
            timestamp: 0,
        }
    }

    struct Fixture {
        store: Arc<CartStore>,
        sink: Arc<RecordingSink>,
        notifier: NotificationQueue,
        composer: OrderComposer,
    }

    fn fixture(opener: MockLinkOpener) -> Fixture {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let store = Arc::new(CartStore::new(Arc::new(MemoryStorage::new()), clock.clone()));
        let sink = Arc::new(RecordingSink::default());
        let notifier = NotificationQueue::new(sink.clone(), NotificationTimings::default());
        let composer = OrderComposer::new(
            store.clone(),
            notifier.clone(),
            Arc::new(opener),
            Arc::new(FixedOrderNumber(4321)),
            clock,
            business(),
            messaging(),
        );
        Fixture {
            store,
            sink,
            notifier,
            composer,
        }
    }

    #[test]
    fn test_phone_validation() {
        assert_eq!(validate_contact("A", "0821234567").unwrap().phone, "0821234567");
        assert_eq!(validate_contact("A", "+27821234567").unwrap().phone, "0821234567");
        assert_eq!(validate_contact("A", " 082 123 4567 ").unwrap().phone, "0821234567");
        assert!(matches!(validate_contact("A", "123"), Err(OrderError::InvalidPhone)));
        assert!(matches!(validate_contact("A", "08212345"), Err(OrderError::InvalidPhone)));
        assert!(matches!(validate_contact("A", "0021234567"), Err(OrderError::InvalidPhone)));
        assert!(matches!(validate_contact("  ", "0821234567"), Err(OrderError::MissingContact)));
        assert!(matches!(validate_contact("A", ""), Err(OrderError::MissingContact)));
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+27821234567"), "0821234567");
        assert_eq!(normalize_phone("27821234567"), "0821234567");
        assert_eq!(normalize_phone("0821234567"), "0821234567");
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("a b&c"), "a%20b%26c");
        assert_eq!(encode_uri_component("*x*\n"), "*x*%0A");
        assert_eq!(encode_uri_component("R1.00 ×"), "R1.00%20%C3%97");
    }

    #[test]
    fn test_deep_link_shape() {
        let link = build_deep_link(&messaging(), "hi there");
        assert_eq!(link, "https://wa.me/27825550199?text=hi%20there");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cart_never_opens_link() {
        let mut opener = MockLinkOpener::new();
        opener.expect_open().never();
        let f = fixture(opener);
        let form = Form::new("Thabo", "0821234567", "no onions");

        let result = f.composer.compose_and_send(&form).await;
        assert!(matches!(result, Err(OrderError::EmptyCart)));
        assert_eq!(form.name(), "Thabo");
        assert_eq!(form.instructions(), "no onions");

        f.notifier.wait_idle().await;
        assert_eq!(f.sink.shown.lock()[0].kind, NotificationKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_name_leaves_cart_unchanged() {
        let mut opener = MockLinkOpener::new();
        opener.expect_open().never();
        let f = fixture(opener);
        f.store.write(&[burger("a", 95.0, 1)]);
        let form = Form::new("", "0821234567", "");

        let result = f.composer.compose_and_send(&form).await;
        assert!(matches!(result, Err(OrderError::MissingContact)));
        assert_eq!(f.store.read().len(), 1);

        f.notifier.wait_idle().await;
        let shown = f.sink.shown.lock();
        assert_eq!(shown[0].message, OrderError::MissingContact.to_string());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_popup_keeps_cart() {
        let mut opener = MockLinkOpener::new();
        opener.expect_open().times(1).returning(|_| Err(OpenError::Blocked));
        let f = fixture(opener);
        f.store.write(&[burger("a", 95.0, 1)]);
        let form = Form::new("Thabo", "0821234567", "");

        let result = f.composer.compose_and_send(&form).await;
        assert!(matches!(result, Err(OrderError::LinkBlocked)));
        assert_eq!(f.store.read().len(), 1);
        assert_eq!(form.name(), "Thabo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_send_clears_cart_and_form() {
        let mut opener = MockLinkOpener::new();
        opener
            .expect_open()
            .withf(|url| url.starts_with("https://wa.me/27825550199?text="))
            .times(1)
            .returning(|_| Ok(()));
        let f = fixture(opener);
        f.store.write(&[burger("a", 95.0, 2), burger("b", 85.0, 1)]);
        let form = Form::new(" Thabo ", "+27821234567", "Ring the bell");

        let sent = f.composer.compose_and_send(&form).await.unwrap();
        assert_eq!(sent.order_number, 4321);
        assert_eq!(format_price(sent.total), "R275.00");
        assert!(f.store.read().is_empty());
        assert_eq!(form.name(), "");
        assert_eq!(form.phone(), "");
        assert_eq!(form.instructions(), "");

        let msg = &sent.message;
        assert!(msg.starts_with("*🍔 NEW ORDER - KASI GRILL*\nOrder #4321\n"));
        assert!(msg.contains("*Customer:* Thabo\n*Phone:* 0821234567\n"));
        assert!(msg.contains("*1. Classic Burger*\n   Quantity: 2\n   Price: R190.00\n"));
        assert!(msg.contains("   🥬 Greens: Lettuce\n   🌶️ Sauces: BBQ\n"));
        assert!(msg.contains(&format!("{}\n*2. Classic Burger*", ITEM_DIVIDER)));
        assert!(msg.contains("*TOTAL: R275.00*"));
        assert!(msg.contains("📝 *Special Instructions:*\nRing the bell\n"));
        assert!(msg.ends_with("Thank you for ordering from Kasi Grill!"));
        assert_eq!(msg.matches(ITEM_DIVIDER).count(), 1);

        f.notifier.wait_idle().await;
        assert_eq!(f.sink.shown.lock()[0].kind, NotificationKind::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_instructions_section_omitted_when_blank() {
        let mut opener = MockLinkOpener::new();
        opener.expect_open().returning(|_| Ok(()));
        let f = fixture(opener);
        f.store.write(&[burger("a", 85.0, 2)]);
        let form = Form::new("Thabo", "0821234567", "   ");

        let sent = f.composer.compose_and_send(&form).await.unwrap();
        assert!(!sent.message.contains("Special Instructions"));
        assert!(sent.message.contains("*TOTAL: R170.00*"));
    }

    #[test]
    fn test_message_sections_in_order() {
        let f = fixture(MockLinkOpener::new());
        let contact = CustomerContact {
            name: "Thabo".into(),
            phone: "0821234567".into(),
        };
        let msg = f
            .composer
            .build_message(1000, &contact, &[burger("a", 85.0, 1)], "");

        let header = [
            "*🍔 NEW ORDER - KASI GRILL*",
            "Order #1000",
            SECTION_DIVIDER,
            "*Customer:* Thabo",
            "*Phone:* 0821234567",
            SECTION_DIVIDER,
            "*ORDER DETAILS:*",
            "*1. Classic Burger*",
        ]
        .join("\n");
        assert!(msg.starts_with(&header));

        let footer = [
            SECTION_DIVIDER,
            "📍 1 Main Rd",
            "🕒 10-21",
            "📞 082 555 0199",
            "Thank you for ordering from Kasi Grill!",
        ]
        .join("\n");
        assert!(msg.ends_with(&footer));
        assert!(!msg.contains(ITEM_DIVIDER));
        assert!(!msg.contains("\n\n"));
    }
}
