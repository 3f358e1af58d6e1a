use std::fs::File;
use std::path::Path;

use crate::{
    dto::{ProvisioningResult, RecordFormat},
    engine::ProvisioningService,
    error::{Error, Result},
};

/// Provisions accounts from a file on disk, choosing the format from its extension.
///
/// # Arguments
/// * `service` - Provisioning service holding the account store
/// * `input_path` - Path to a `.csv`, `.xlsx` or `.xls` file
///
/// # Errors
/// Returns an error if:
/// * The extension is not a supported format
/// * The file cannot be opened or parsed
pub fn provision_path<P>(service: &ProvisioningService, input_path: P) -> Result<ProvisioningResult>
where
    P: AsRef<Path>,
{
    let input_path = input_path.as_ref();
    let format = RecordFormat::from_file_name(input_path).ok_or_else(|| {
        Error::validation(format!("unsupported file type: {}", input_path.display()))
    })?;
    let file = File::open(input_path)?;
    service.provision(file, format)
}
