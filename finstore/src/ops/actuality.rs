use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use finstore_core::exporter::ExporterFactory;
use finstore_core::{
    Capability, ExporterType, FinStoreError, SourceApiActuality, SourceApiActualityInfo,
};

use crate::FinStore;

fn registry_id(id: usize) -> i64 {
    i64::try_from(id).unwrap_or(i64::MAX)
}

impl FinStore {
    /// Stored API check results merged with the registry.
    ///
    /// Registered types come first in registration order, with their registry
    /// id. Stored results of types that are no longer registered follow with
    /// a negative id.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn source_api_actualities(
        &self,
    ) -> Result<Vec<SourceApiActualityInfo>, FinStoreError> {
        let stored = self.store.source_api_actualities().await?;
        let by_type: HashMap<&ExporterType, &SourceApiActuality> =
            stored.iter().map(|s| (&s.exporter_type, s)).collect();

        let mut out: Vec<SourceApiActualityInfo> = self
            .registry
            .iter()
            .map(|(id, factory)| {
                let exporter_type = factory.exporter_type();
                let last = by_type.get(&exporter_type);
                SourceApiActualityInfo {
                    id: registry_id(id),
                    registered: true,
                    check_error_message: last.and_then(|s| s.check_error_message.clone()),
                    last_check_moment: last.map(|s| s.last_check_moment),
                    exporter_type,
                }
            })
            .collect();

        out.extend(
            stored
                .iter()
                .enumerate()
                .filter(|(_, s)| !self.registry.contains(&s.exporter_type))
                .map(|(pos, s)| SourceApiActualityInfo {
                    id: -registry_id(pos + 1),
                    exporter_type: s.exporter_type.clone(),
                    registered: false,
                    check_error_message: s.check_error_message.clone(),
                    last_check_moment: Some(s.last_check_moment),
                }),
        );
        Ok(out)
    }

    /// Probe the remote API of every selected exporter type and store the outcome.
    ///
    /// Probes run concurrently, bypass the cache and are bounded by the
    /// download timeout. A failing probe is recorded, not returned as an
    /// error. Returns the refreshed listing.
    ///
    /// # Errors
    /// `InvalidArg` for an empty selection, `NotFound` for an unregistered
    /// type, or a store failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finstore::actuality::check_source_api_actuality",
            skip(self, types),
            fields(types = types.len()),
        )
    )]
    pub async fn check_source_api_actuality(
        &self,
        types: &[ExporterType],
        now: DateTime<Utc>,
    ) -> Result<Vec<SourceApiActualityInfo>, FinStoreError> {
        if types.is_empty() {
            return Err(FinStoreError::InvalidArg(
                "nothing to check; select exporter types".to_string(),
            ));
        }
        let factories = types
            .iter()
            .map(|t| {
                self.registry
                    .get(t)
                    .cloned()
                    .ok_or_else(|| FinStoreError::not_found(format!("exporter type {t}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let timeout = self.cfg.download_timeout;
        let results = futures::future::join_all(
            factories
                .iter()
                .map(|factory| Self::probe(Arc::clone(factory), timeout)),
        )
        .await;

        for (factory, result) in factories.iter().zip(results) {
            let check_error_message = match result {
                Ok(()) => None,
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    if e.is_actionable() {
                        tracing::warn!(exporter_type = factory.name(), error = %e, "source API is not actual");
                    } else {
                        tracing::debug!(exporter_type = factory.name(), error = %e, "source API cannot be checked");
                    }
                    Some(e.to_string())
                }
            };
            self.store
                .upsert_source_api_actuality(SourceApiActuality {
                    exporter_type: factory.exporter_type(),
                    check_error_message,
                    last_check_moment: now,
                })
                .await?;
        }

        self.source_api_actualities().await
    }

    async fn probe(
        factory: Arc<dyn ExporterFactory>,
        timeout: std::time::Duration,
    ) -> Result<(), FinStoreError> {
        let checker = factory
            .as_api_actuality_checker()
            .ok_or_else(|| FinStoreError::unsupported(Capability::ApiActuality.as_str()))?;
        Self::exporter_call_with_timeout(
            factory.name(),
            Capability::ApiActuality.as_str(),
            timeout,
            checker.check(),
        )
        .await
    }
}
