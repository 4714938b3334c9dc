//! Initial catalog and pricing data.
//!
//! Seeding runs at startup and is idempotent: pricing rows are only written
//! when missing and duplicate service slugs are skipped, so restarting the
//! service never clobbers admin price changes or re-inserts the catalog.

use numbox_core::{PricingSetting, Service, ServiceType};
use numbox_store::{Result, Store, StoreError};

/// The built-in pricing settings, in cents.
const PRICING_SEED: [(ServiceType, i64, &str); 3] = [
    (ServiceType::Verification, 25, "One-time SMS verification"),
    (
        ServiceType::NonRenewableRental,
        150,
        "1-14 day phone number rental",
    ),
    (
        ServiceType::RenewableRental,
        500,
        "Monthly renewable phone number rental",
    ),
];

/// The built-in verification catalog: (name, slug, category, price in cents).
const CATALOG_SEED: [(&str, &str, &str, i64); 20] = [
    ("Google", "google", "Social Media", 25),
    ("Tinder", "tinder", "Dating", 30),
    ("PayPal", "paypal", "Finance", 25),
    ("Uber", "uber", "Rideshare", 25),
    ("Twitter", "twitter", "Social Media", 25),
    ("Facebook", "facebook", "Social Media", 25),
    ("Amazon", "amazon", "E-commerce", 25),
    ("WhatsApp", "whatsapp", "Messaging", 25),
    ("Instagram", "instagram", "Social Media", 25),
    ("LinkedIn", "linkedin", "Professional", 30),
    ("Snapchat", "snapchat", "Social Media", 25),
    ("Discord", "discord", "Messaging", 25),
    ("Telegram", "telegram", "Messaging", 25),
    ("Microsoft", "microsoft", "Technology", 25),
    ("Apple", "apple", "Technology", 30),
    ("Netflix", "netflix", "Entertainment", 25),
    ("Spotify", "spotify", "Entertainment", 25),
    ("eBay", "ebay", "E-commerce", 25),
    ("Airbnb", "airbnb", "Travel", 30),
    ("Lyft", "lyft", "Rideshare", 25),
];

/// Seed pricing settings and the service catalog.
///
/// # Errors
///
/// Returns an error when the store fails; already-present rows are not
/// errors.
pub fn seed_store(store: &dyn Store) -> Result<()> {
    let mut pricing_created = 0;
    for (service_type, base_price_cents, description) in PRICING_SEED {
        if store.get_pricing_setting(service_type)?.is_none() {
            let setting = PricingSetting::new(service_type, base_price_cents, description);
            store.put_pricing_setting(&setting)?;
            pricing_created += 1;
        }
    }

    let mut services_created = 0;
    for (name, slug, category, base_price_cents) in CATALOG_SEED {
        let service = Service::new(name, slug, category, base_price_cents);
        match store.create_service(&service) {
            Ok(()) => services_created += 1,
            Err(StoreError::AlreadyExists { .. }) => {}
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        pricing_created = %pricing_created,
        services_created = %services_created,
        "Seed data applied"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use numbox_store::RocksStore;
    use tempfile::TempDir;

    #[test]
    fn seeding_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = RocksStore::open(temp_dir.path()).unwrap();

        seed_store(&store).unwrap();
        let services = store.list_active_services().unwrap();
        assert_eq!(services.len(), 20);

        // Running again neither errors nor duplicates
        seed_store(&store).unwrap();
        assert_eq!(store.list_active_services().unwrap().len(), 20);
        assert_eq!(store.list_pricing_settings().unwrap().len(), 3);
    }

    #[test]
    fn seeding_preserves_admin_price_changes() {
        let temp_dir = TempDir::new().unwrap();
        let store = RocksStore::open(temp_dir.path()).unwrap();
        seed_store(&store).unwrap();

        let mut setting = store
            .get_pricing_setting(ServiceType::RenewableRental)
            .unwrap()
            .unwrap();
        setting.base_price_cents = 700;
        store.put_pricing_setting(&setting).unwrap();

        seed_store(&store).unwrap();

        let kept = store
            .get_pricing_setting(ServiceType::RenewableRental)
            .unwrap()
            .unwrap();
        assert_eq!(kept.base_price_cents, 700);
    }
}
