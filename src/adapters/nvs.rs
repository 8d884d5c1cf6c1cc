//! NVS (Non-Volatile Storage) settings adapter.
//!
//! Persists [`UserSettings`] as a single postcard blob under the `swell`
//! namespace.  NVS commits are atomic, so a power cut mid-save leaves the
//! previous blob intact.  Values are sanitized on load — out-of-range data
//! from an older firmware is corrected, never rejected.
//!
//! The host backend keeps the blob in memory, which is all the integration
//! tests and simulation need.

use log::info;

use crate::app::ports::{SettingsError, SettingsPort};
use crate::config::UserSettings;

const NVS_NAMESPACE: &str = "swell";
const SETTINGS_KEY: &str = "settings";

/// Upper bound for the encoded settings blob.
const MAX_BLOB_SIZE: usize = 256;

// ---------------------------------------------------------------------------
// ESP-IDF backend
// ---------------------------------------------------------------------------

#[cfg(feature = "espidf")]
mod esp {
    use core::cell::RefCell;

    use esp_idf_svc::nvs::{EspNvs, EspNvsPartition, NvsDefault};
    use log::{info, warn};

    use super::{SettingsError, SettingsPort, UserSettings, MAX_BLOB_SIZE, NVS_NAMESPACE, SETTINGS_KEY};

    pub struct NvsSettings {
        nvs: RefCell<EspNvs<NvsDefault>>,
    }

    impl NvsSettings {
        /// Open (or create) the settings namespace on the default partition.
        pub fn new(partition: EspNvsPartition<NvsDefault>) -> Result<Self, SettingsError> {
            let nvs = EspNvs::new(partition, NVS_NAMESPACE, true).map_err(|e| {
                warn!("NVS namespace open failed: {e}");
                SettingsError::IoError
            })?;
            info!("NVS settings store ready (namespace '{NVS_NAMESPACE}')");
            Ok(Self {
                nvs: RefCell::new(nvs),
            })
        }
    }

    impl SettingsPort for NvsSettings {
        fn load(&self) -> Result<UserSettings, SettingsError> {
            let mut buf = [0u8; MAX_BLOB_SIZE];
            let blob = self
                .nvs
                .borrow()
                .get_blob(SETTINGS_KEY, &mut buf)
                .map_err(|_| SettingsError::IoError)?;
            let Some(bytes) = blob else {
                return Err(SettingsError::NotFound);
            };
            let mut settings: UserSettings =
                postcard::from_bytes(bytes).map_err(|_| SettingsError::Corrupted)?;
            settings.sanitize();
            Ok(settings)
        }

        fn save(&self, settings: &UserSettings) -> Result<(), SettingsError> {
            let bytes =
                postcard::to_allocvec(settings).map_err(|_| SettingsError::IoError)?;
            self.nvs
                .borrow_mut()
                .set_blob(SETTINGS_KEY, &bytes)
                .map_err(|e| {
                    warn!("settings write failed: {e}");
                    SettingsError::IoError
                })?;
            info!("settings saved to NVS ({} bytes)", bytes.len());
            Ok(())
        }
    }
}

#[cfg(feature = "espidf")]
pub use esp::NvsSettings;

// ---------------------------------------------------------------------------
// Host backend
// ---------------------------------------------------------------------------

/// In-memory settings store for host builds.
#[cfg(not(feature = "espidf"))]
pub struct NvsSettings {
    blob: core::cell::RefCell<Option<Vec<u8>>>,
}

#[cfg(not(feature = "espidf"))]
impl NvsSettings {
    pub fn new() -> Self {
        info!("NVS settings store: simulation backend");
        Self {
            blob: core::cell::RefCell::new(None),
        }
    }
}

#[cfg(not(feature = "espidf"))]
impl Default for NvsSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(feature = "espidf"))]
impl SettingsPort for NvsSettings {
    fn load(&self) -> Result<UserSettings, SettingsError> {
        let blob = self.blob.borrow();
        let Some(bytes) = blob.as_deref() else {
            return Err(SettingsError::NotFound);
        };
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(SettingsError::Corrupted);
        }
        let mut settings: UserSettings =
            postcard::from_bytes(bytes).map_err(|_| SettingsError::Corrupted)?;
        settings.sanitize();
        Ok(settings)
    }

    fn save(&self, settings: &UserSettings) -> Result<(), SettingsError> {
        let bytes = postcard::to_allocvec(settings).map_err(|_| SettingsError::IoError)?;
        *self.blob.borrow_mut() = Some(bytes);
        Ok(())
    }
}
