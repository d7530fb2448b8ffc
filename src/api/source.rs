//! Device source abstraction.

use async_trait::async_trait;

use crate::api::client::WatchmanApi;
use crate::dedup::DeviceRecord;
use crate::error::Result;

/// Anything that can produce the full current device inventory.
#[async_trait]
pub trait DeviceSource: Send + Sync {
    /// Return every device record for the account.
    async fn fetch_all(&self) -> Result<Vec<DeviceRecord>>;
}

#[async_trait]
impl DeviceSource for WatchmanApi {
    async fn fetch_all(&self) -> Result<Vec<DeviceRecord>> {
        self.get_all_devices().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::analyze;
    use crate::error::Error;
    use chrono::{TimeZone, Utc};

    struct FixedSource(Vec<DeviceRecord>);

    #[async_trait]
    impl DeviceSource for FixedSource {
        async fn fetch_all(&self) -> Result<Vec<DeviceRecord>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl DeviceSource for FailingSource {
        async fn fetch_all(&self) -> Result<Vec<DeviceRecord>> {
            Err(Error::Authentication("HTTP 401".into()))
        }
    }

    async fn analyze_source(source: &dyn DeviceSource) -> Result<crate::dedup::Analysis> {
        let records = source.fetch_all().await?;
        Ok(analyze(&records))
    }

    #[test]
    fn test_stub_source_feeds_engine() {
        let newer = Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2023, 2, 17, 8, 15, 0).unwrap();
        let source = FixedSource(vec![
            DeviceRecord::new("old", "Laptop", "AA:BB:CC:DD:EE:FF").with_last_report(older),
            DeviceRecord::new("new", "Laptop", "aabbccddeeff").with_last_report(newer),
        ]);

        let analysis = tokio_test::block_on(analyze_source(&source)).unwrap();
        assert_eq!(analysis.decisions.len(), 1);
        assert_eq!(analysis.decisions[0].keeper.identifier, "new");
        assert_eq!(analysis.decisions[0].removable[0].record.identifier, "old");
    }

    #[test]
    fn test_source_failure_aborts() {
        let result = tokio_test::block_on(analyze_source(&FailingSource));
        assert!(matches!(result, Err(Error::Authentication(_))));
    }
}
