//! Stub number provider for local development and tests.

use async_trait::async_trait;
use rand::Rng;

use super::{NumberProvider, NumberSpec, ProviderError};

/// A provider that synthesizes numbers in the reserved 555 exchange.
///
/// Used whenever no real provider is configured. Numbers look real enough
/// for end-to-end flows but never route anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubProvider;

#[async_trait]
impl NumberProvider for StubProvider {
    async fn assign_number(&self, spec: &NumberSpec) -> Result<String, ProviderError> {
        let (prefix, line) = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(100..=999), rng.gen_range(1000..=9999))
        };
        let number = format!("+1 (555) {prefix}-{line}");

        match spec {
            NumberSpec::Verification { service_slug } => {
                tracing::debug!(service = %service_slug, number = %number, "Assigned verification number");
            }
            NumberSpec::Rental { duration_days } => {
                tracing::debug!(duration_days = %duration_days, number = %number, "Assigned rental number");
            }
        }

        Ok(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_numbers_use_the_reserved_exchange() {
        let provider = StubProvider;
        let spec = NumberSpec::Verification {
            service_slug: "whatsapp".into(),
        };

        let number = provider.assign_number(&spec).await.unwrap();

        assert!(number.starts_with("+1 (555) "));
        assert_eq!(number.len(), "+1 (555) 123-4567".len());
    }

    #[tokio::test]
    async fn rental_spec_is_accepted() {
        let provider = StubProvider;
        let spec = NumberSpec::Rental { duration_days: 30 };

        assert!(provider.assign_number(&spec).await.is_ok());
    }
}
