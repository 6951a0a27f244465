// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::BoxError;
use crate::utils::Metadata;

/// Produces the metadata of the calling context at the moment of dispatch.
///
/// A source is queried once per dispatch and never cached, so it should read
/// from whatever per-request store the embedding application uses. It may be
/// called concurrently from many tasks; no locking is placed around it.
pub trait MetadataSource: Send + Sync {
    fn current(&self) -> Result<Metadata, BoxError>;
}

/// Any infallible closure returning metadata is a source.
impl<F> MetadataSource for F
where
    F: Fn() -> Metadata + Send + Sync,
{
    fn current(&self) -> Result<Metadata, BoxError> {
        Ok(self())
    }
}

/// A source that always yields the same map.
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub Metadata);

impl MetadataSource for StaticSource {
    fn current(&self) -> Result<Metadata, BoxError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::metadata_from_pairs;

    #[test]
    fn test_static_source_yields_same_map_every_call() {
        let source = StaticSource(metadata_from_pairs([("service", "billing")]));

        assert_eq!(source.current().unwrap(), metadata_from_pairs([("service", "billing")]));
        assert_eq!(source.current().unwrap(), source.current().unwrap());
        assert!(StaticSource::default().current().unwrap().is_empty());
    }

    #[test]
    fn test_closure_is_a_source() {
        let source = || metadata_from_pairs([("trace_id", "abc")]);

        assert_eq!(MetadataSource::current(&source).unwrap()["trace_id"], "abc");
    }
}
