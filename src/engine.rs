use std::io::Read;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    dto::{AccountRecord, ProvisioningResult, RecordFormat},
    error::Result,
    namespace::NamespaceProvisioner,
    normalizer::{normalize, ColumnLayout},
    readers::{self, RawRow},
    stores::AccountStore,
};

/// Normalized records of one upload, held back until the whole stream has been read.
#[derive(Debug)]
pub(crate) struct StagedBatch {
    layout: ColumnLayout,
    records: Vec<AccountRecord>,
    skipped: usize,
}

impl StagedBatch {
    pub(crate) fn new(layout: ColumnLayout) -> Self {
        Self {
            layout,
            records: Vec::new(),
            skipped: 0,
        }
    }

    pub(crate) fn push_row(&mut self, row: &[String]) {
        match normalize(row, self.layout) {
            Some(record) => self.records.push(record),
            None => {
                self.skipped += 1;
                debug!(cells = row.len(), required = self.layout.min_cells(), "row dropped");
            }
        }
    }
}

/// Bulk account provisioning: read, normalize, upsert, then create namespaces.
#[derive(Clone)]
pub struct ProvisioningService {
    accounts: AccountStore,
    namespaces: Arc<dyn NamespaceProvisioner>,
}

impl ProvisioningService {
    pub fn new(accounts: AccountStore, namespaces: Arc<dyn NamespaceProvisioner>) -> Self {
        Self {
            accounts,
            namespaces,
        }
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// Provisions every usable row of `input`.
    ///
    /// The stream is read to the end before the store is touched, so a
    /// malformed stream changes nothing.
    ///
    /// # Errors
    /// Returns [`Error::MalformedInput`](crate::Error::MalformedInput) if the
    /// stream cannot be parsed as `format`. Short rows and namespace failures
    /// are not errors.
    pub fn provision<R: Read>(&self, input: R, format: RecordFormat) -> Result<ProvisioningResult> {
        let rows = readers::read_rows(input, format)?;
        let batch = stage(rows, ColumnLayout::for_format(format))?;
        Ok(self.commit(batch))
    }

    /// Upserts the staged records and requests their namespaces.
    pub(crate) fn commit(&self, batch: StagedBatch) -> ProvisioningResult {
        let result = ProvisioningResult {
            created: batch.records.len(),
            skipped: batch.skipped,
        };
        for record in batch.records {
            if record.username.is_empty() || record.password.is_empty() {
                warn!(username = %record.username, "provisioning account with an empty field");
            }
            let username = record.username.clone();
            self.accounts.upsert(record);
            // Namespace failures never abort the batch.
            if let Err(err) = self.namespaces.ensure_namespace(&username) {
                warn!(%username, error = %err, "namespace creation failed");
            }
        }
        info!(created = result.created, skipped = result.skipped, "accounts provisioned");
        result
    }
}

/// Normalizes every row, failing on the first stream-level error.
pub(crate) fn stage<I>(rows: I, layout: ColumnLayout) -> Result<StagedBatch>
where
    I: IntoIterator<Item = Result<RawRow>>,
{
    let mut batch = StagedBatch::new(layout);
    for row in rows {
        batch.push_row(&row?);
    }
    Ok(batch)
}
