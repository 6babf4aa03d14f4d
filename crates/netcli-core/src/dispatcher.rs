use crate::config::SessionConfig;
use crate::error::NetcliError;
use crate::platform;
use crate::session::DeviceSession;
use tracing::debug;

/// Create an unconnected session bound to the platform profile selected by
/// `device_type`. The caller connects it afterwards.
///
/// Unknown device types are rejected with an error listing every supported
/// key.
pub fn create(device_type: &str, config: SessionConfig) -> Result<DeviceSession, NetcliError> {
    debug!(
        "Creating session for {} of type {}",
        config.host, device_type
    );
    let profile = platform::lookup(device_type).ok_or_else(|| {
        NetcliError::UsageError(format!(
            "Unsupported device_type: currently supported platforms are: {}",
            platform::supported_platforms().join("\n")
        ))
    })?;
    DeviceSession::new(profile, config)
}

/// All supported device type keys, sorted.
pub fn platforms() -> Vec<&'static str> {
    platform::supported_platforms()
}
