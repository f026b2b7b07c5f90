//! # Shellkit
//!
//! Device-capability plugins for cross-platform application shells.
//!
//! Each capability lives in its own crate and registers its operations with
//! the shell through an explicit bridge table built at process start. The
//! plugin crates delegate every decision to the host operating system; this
//! facade only re-exports them behind feature gates.
//!
//! ## Features
//!
//! - `bridge`: the operation registry connecting the shell to plugin crates.
//! - `biometry`: biometric authentication (`FaceID`, fingerprint,
//!   Windows Hello). Implies `bridge`.
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! shellkit = { version = "0.1", features = ["biometry"] }
//! ```
//!
//! ```rust,ignore
//! use shellkit::{biometry, bridge::Registry};
//!
//! async fn unlock() {
//!     let availability = biometry::check_biometry();
//!     if availability.is_available {
//!         let options = biometry::AuthOptions::new().with_reason("Unlock vault");
//!         let _ = biometry::authenticate(options).await;
//!     }
//! }
//! ```

#[cfg(feature = "biometry")]
pub use shellkit_biometry as biometry;

#[cfg(feature = "bridge")]
pub use shellkit_bridge as bridge;
