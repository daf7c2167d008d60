use std::{sync::Arc, time::Duration};

use crate::{
    models::{EnrichedRecommendation, Recommendation, TitleMetadata},
    services::providers::MetadataProvider,
};

/// Decorates ranked titles with provider metadata.
///
/// Each title with an external id is looked up in its own task under
/// `timeout`. A slow or failing lookup leaves that title's metadata empty and
/// never affects the others; order is preserved. Every title gets a trailer
/// link, falling back to a YouTube search when the provider has none.
pub async fn enrich(
    provider: Option<Arc<dyn MetadataProvider>>,
    recommendations: Vec<Recommendation>,
    timeout: Duration,
) -> Vec<EnrichedRecommendation> {
    let Some(provider) = provider else {
        return recommendations
            .into_iter()
            .map(|recommendation| EnrichedRecommendation::new(recommendation, None))
            .collect();
    };

    let tasks: Vec<_> = recommendations
        .iter()
        .map(|recommendation| {
            recommendation.external_id.map(|external_id| {
                let provider = provider.clone();
                tokio::spawn(async move { fetch_with_timeout(provider, external_id, timeout).await })
            })
        })
        .collect();

    let mut enriched = Vec::with_capacity(recommendations.len());
    let mut missing = 0usize;

    for (recommendation, task) in recommendations.into_iter().zip(tasks) {
        let metadata = match task {
            Some(handle) => match handle.await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::error!(error = %e, "Metadata task join error");
                    None
                }
            },
            None => None,
        };

        if metadata.is_none() {
            missing += 1;
        }

        enriched.push(EnrichedRecommendation::new(recommendation, metadata));
    }

    if missing > 0 {
        tracing::debug!(
            provider = provider.name(),
            total = enriched.len(),
            missing,
            "Some titles returned without metadata"
        );
    }

    enriched
}

async fn fetch_with_timeout(
    provider: Arc<dyn MetadataProvider>,
    external_id: u64,
    timeout: Duration,
) -> Option<TitleMetadata> {
    match tokio::time::timeout(timeout, provider.fetch(external_id)).await {
        Ok(Ok(metadata)) => Some(metadata),
        Ok(Err(e)) => {
            tracing::warn!(
                external_id,
                provider = provider.name(),
                error = %e,
                "Metadata fetch failed"
            );
            None
        }
        Err(_) => {
            tracing::warn!(
                external_id,
                provider = provider.name(),
                timeout_ms = timeout.as_millis() as u64,
                "Metadata fetch timed out"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{trailer_search_url, Availability, AVAILABILITY_UNKNOWN};
    use crate::services::providers::MockMetadataProvider;
    use mockall::predicate::eq;

    fn recommendation(index: usize, external_id: Option<u64>) -> Recommendation {
        Recommendation {
            index,
            title: format!("Movie {}", index),
            external_id,
            score: Some(1.0 - index as f64 / 10.0),
        }
    }

    fn metadata(rating: f64) -> TitleMetadata {
        TitleMetadata {
            rating: Some(rating),
            ..TitleMetadata::default()
        }
    }

    #[tokio::test]
    async fn test_without_provider_returns_bare_titles() {
        let enriched = enrich(
            None,
            vec![recommendation(1, Some(10)), recommendation(2, None)],
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(enriched.len(), 2);
        assert!(enriched.iter().all(|e| e.metadata.is_none()));
        assert!(enriched.iter().all(|e| e.availability == AVAILABILITY_UNKNOWN));
    }

    #[tokio::test]
    async fn test_every_title_gets_a_trailer_link() {
        let mut provider = MockMetadataProvider::new();
        provider.expect_fetch().with(eq(10)).returning(|_| {
            Ok(TitleMetadata {
                trailer_url: Some("https://www.youtube.com/watch?v=5PSNL1qE6VY".to_string()),
                ..metadata(7.2)
            })
        });
        provider.expect_fetch().with(eq(20)).returning(|_| {
            Ok(TitleMetadata {
                availability: Availability {
                    streaming: vec!["Netflix".to_string()],
                    rent_or_buy: true,
                },
                ..metadata(6.0)
            })
        });
        provider.expect_name().return_const("mock");

        let enriched = enrich(
            Some(Arc::new(provider)),
            vec![
                recommendation(1, Some(10)),
                recommendation(2, Some(20)),
                recommendation(3, None),
            ],
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(
            enriched[0].trailer_url,
            "https://www.youtube.com/watch?v=5PSNL1qE6VY"
        );
        // record without a trailer
        assert_eq!(enriched[1].trailer_url, trailer_search_url("Movie 2"));
        assert_eq!(enriched[1].availability, "Streaming on: Netflix");
        // title without an external id
        assert_eq!(
            enriched[2].trailer_url,
            "https://www.youtube.com/results?search_query=Movie%203%20trailer"
        );
        assert_eq!(enriched[2].availability, AVAILABILITY_UNKNOWN);
    }

    #[tokio::test]
    async fn test_failure_is_isolated_per_title() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch()
            .with(eq(10))
            .returning(|_| Ok(metadata(8.1)));
        provider
            .expect_fetch()
            .with(eq(20))
            .returning(|_| Err(AppError::Metadata("upstream 500".to_string())));
        provider.expect_name().return_const("mock");

        let enriched = enrich(
            Some(Arc::new(provider)),
            vec![
                recommendation(1, Some(10)),
                recommendation(2, Some(20)),
                recommendation(3, None),
            ],
            Duration::from_secs(1),
        )
        .await;

        let indices: Vec<usize> = enriched.iter().map(|e| e.recommendation.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(enriched[0].metadata, Some(metadata(8.1)));
        assert_eq!(enriched[1].metadata, None);
        assert_eq!(enriched[2].metadata, None);
    }

    #[tokio::test]
    async fn test_titles_without_external_id_are_not_looked_up() {
        let mut provider = MockMetadataProvider::new();
        provider.expect_fetch().never();
        provider.expect_name().return_const("mock");

        let enriched = enrich(
            Some(Arc::new(provider)),
            vec![recommendation(1, None)],
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(enriched.len(), 1);
        assert!(enriched[0].metadata.is_none());
    }

    struct SlowProvider;

    #[async_trait::async_trait]
    impl MetadataProvider for SlowProvider {
        async fn fetch(&self, external_id: u64) -> crate::error::AppResult<TitleMetadata> {
            if external_id == 1 {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok(metadata(external_id as f64))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_slow_title_times_out_without_blocking_others() {
        let enriched = enrich(
            Some(Arc::new(SlowProvider)),
            vec![recommendation(0, Some(1)), recommendation(1, Some(7))],
            Duration::from_millis(100),
        )
        .await;

        assert_eq!(enriched[0].metadata, None);
        assert_eq!(enriched[1].metadata, Some(metadata(7.0)));
    }
}
