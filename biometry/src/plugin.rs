//! Registration of the biometry operations with the shell's plugin bridge.

use serde_json::Value;
use shellkit_bridge::{InvokeError, Registry};

use crate::{AuthOptions, BiometryError};

/// Operation name of the availability check.
pub const CHECK_BIOMETRY: &str = "checkBiometry";

/// Operation name of the authentication prompt.
pub const AUTHENTICATE: &str = "authenticate";

/// Register the biometry operations in `registry`.
///
/// Runs once at process start, alongside the registrations of the other
/// plugin crates.
pub fn register(registry: &mut Registry) {
    registry.register(CHECK_BIOMETRY, |_args| async {
        serde_json::to_value(crate::check_biometry())
            .map_err(|err| InvokeError::new(format!("failed to serialize availability: {err}")))
    });

    registry.register(AUTHENTICATE, |args| async move {
        let options = parse_options(args)?;
        crate::authenticate(options)
            .await
            .map(|()| Value::Null)
            .map_err(reject)
    });
}

fn parse_options(args: Value) -> Result<AuthOptions, InvokeError> {
    if args.is_null() {
        return Ok(AuthOptions::new());
    }
    serde_json::from_value(args)
        .map_err(|err| InvokeError::new(format!("invalid authenticate options: {err}")))
}

fn reject(error: BiometryError) -> InvokeError {
    InvokeError::with_code(error.to_string(), error.code().as_str())
}
