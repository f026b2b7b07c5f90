//! Android biometry implementation.
//!
//! The Java half lives in `BiometryHelper.java`, compiled to DEX at build
//! time, written into the app's cache directory and loaded through a
//! `DexClassLoader` at runtime. The helper's `onResult` native is
//! registered manually on the dynamically loaded class, and the oneshot
//! sender crosses the JNI boundary as a raw pointer packed into a `jlong`.

use std::sync::OnceLock;

use jni::JNIEnv;
use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::sys::{jboolean, jint, jlong};
use serde::Deserialize;

use crate::BiometryError;
use crate::code::ErrorCode;
use crate::probe::{BiometryType, Probe, ProbeFault};
use crate::prompt::PromptSpec;

/// Embedded DEX bytecode.
static DEX_BYTES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/classes.dex"));

/// Cached class loader.
static CLASS_LOADER: OnceLock<GlobalRef> = OnceLock::new();

type PromptSender = tokio::sync::oneshot::Sender<Result<(), BiometryError>>;

const HELPER_CLASS: &str = "shellkit.biometry.BiometryHelper";

fn platform_err(context: &str, err: impl std::fmt::Display) -> BiometryError {
    BiometryError::Platform(format!("{context}: {err}"))
}

/// Initialize the DEX class loader. Must be called with a valid Context.
pub fn init_with_context(env: &mut JNIEnv, context: &JObject) -> Result<(), BiometryError> {
    if CLASS_LOADER.get().is_some() {
        return Ok(());
    }

    let cache_dir = env
        .call_method(context, "getCacheDir", "()Ljava/io/File;", &[])
        .map_err(|e| platform_err("getCacheDir", e))?
        .l()
        .map_err(|e| platform_err("getCacheDir result", e))?;

    let cache_path = env
        .call_method(&cache_dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
        .map_err(|e| platform_err("getAbsolutePath", e))?
        .l()
        .map_err(|e| platform_err("getAbsolutePath result", e))?;

    let dex_path = format!(
        "{}/shellkit_biometry.dex",
        env.get_string((&cache_path).into())
            .map_err(|e| platform_err("get_string", e))?
            .to_str()
            .map_err(|e| platform_err("to_str", e))?
    );

    std::fs::write(&dex_path, DEX_BYTES).map_err(|e| platform_err("write DEX", e))?;

    let dex_path_jstring = env
        .new_string(&dex_path)
        .map_err(|e| platform_err("new_string", e))?;

    let parent_loader = env
        .call_method(context, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .map_err(|e| platform_err("getClassLoader", e))?
        .l()
        .map_err(|e| platform_err("getClassLoader result", e))?;

    let dex_class_loader_class = env
        .find_class("dalvik/system/DexClassLoader")
        .map_err(|e| platform_err("find DexClassLoader", e))?;

    let class_loader = env
        .new_object(
            dex_class_loader_class,
            "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;Ljava/lang/ClassLoader;)V",
            &[
                JValue::Object(&dex_path_jstring),
                JValue::Object(&cache_path),
                JValue::Object(&JObject::null()),
                JValue::Object(&parent_loader),
            ],
        )
        .map_err(|e| platform_err("new DexClassLoader", e))?;

    let global_ref = env
        .new_global_ref(class_loader)
        .map_err(|e| platform_err("new_global_ref", e))?;

    let _ = CLASS_LOADER.set(global_ref);

    // The helper lives in a secondary DEX, so the runtime never resolves
    // its native symbol on its own; it must be registered on the loaded
    // class explicitly.
    register_natives(env)?;

    Ok(())
}

fn register_natives(env: &mut JNIEnv) -> Result<(), BiometryError> {
    let class = helper_class(env)?;
    let native_methods = [jni::NativeMethod {
        name: "onResult".into(),
        sig: "(JZILjava/lang/String;)V".into(),
        fn_ptr: Java_shellkit_biometry_BiometryHelper_onResult as *mut _,
    }];

    env.register_native_methods(class, &native_methods)
        .map_err(|e| platform_err("register_native_methods", e))
}

fn helper_class<'a>(env: &'a mut JNIEnv) -> Result<JClass<'a>, BiometryError> {
    let class_loader = CLASS_LOADER
        .get()
        .ok_or_else(|| BiometryError::Platform("class loader not initialized".to_owned()))?;

    let helper_class_name = env
        .new_string(HELPER_CLASS)
        .map_err(|e| platform_err("new_string", e))?;

    let helper_class = env
        .call_method(
            class_loader.as_obj(),
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&helper_class_name)],
        )
        .map_err(|e| platform_err("loadClass", e))?
        .l()
        .map_err(|e| platform_err("loadClass result", e))?;

    Ok(helper_class.into())
}

#[unsafe(no_mangle)]
pub unsafe extern "system" fn Java_shellkit_biometry_BiometryHelper_onResult(
    mut env: JNIEnv,
    _class: JClass,
    callback_ptr: jlong,
    success: jboolean,
    error_code: jint,
    error_message: JString,
) {
    let sender = unsafe { Box::from_raw(callback_ptr as *mut PromptSender) };

    if success != 0 {
        let _ = sender.send(Ok(()));
    } else {
        let message: String = env
            .get_string(&error_message)
            .map(Into::into)
            .unwrap_or_else(|_| "unknown JNI error".to_owned());
        let _ = sender.send(Err(BiometryError::Prompt {
            message,
            code: map_prompt_error(error_code),
        }));
    }
}

/// `android.hardware.biometrics.BiometricPrompt` error constants.
const fn map_prompt_error(code: jint) -> ErrorCode {
    match code {
        1 | 4 | 12 => ErrorCode::BiometryNotAvailable, // HW_UNAVAILABLE, NO_SPACE, HW_NOT_PRESENT
        3 | 5 => ErrorCode::SystemCancel,              // TIMEOUT, CANCELED
        7 | 9 => ErrorCode::BiometryLockout,           // LOCKOUT, LOCKOUT_PERMANENT
        10 | 13 => ErrorCode::UserCancel,              // USER_CANCELED, NEGATIVE_BUTTON
        11 => ErrorCode::BiometryNotEnrolled,          // NO_BIOMETRICS
        14 => ErrorCode::PasscodeNotSet,               // NO_DEVICE_CREDENTIAL
        2 | 8 => ErrorCode::AuthenticationFailed,      // UNABLE_TO_PROCESS, VENDOR
        _ => ErrorCode::BiometryNotAvailable,
    }
}

/// `android.hardware.biometrics.BiometricManager` status constants.
const fn map_probe_status(code: i32) -> ErrorCode {
    match code {
        11 => ErrorCode::BiometryNotEnrolled, // BIOMETRIC_ERROR_NONE_ENROLLED
        // HW_UNAVAILABLE, NO_HARDWARE, SECURITY_UPDATE_REQUIRED
        _ => ErrorCode::BiometryNotAvailable,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProbePayload {
    available: bool,
    kind: u8,
    status_code: Option<i32>,
    description: Option<String>,
}

pub(crate) fn probe() -> Probe {
    // Availability needs an Android Context; without one, report
    // unavailable and point at the context-taking entry point.
    Probe {
        available: false,
        kind: BiometryType::None,
        fault: Some(ProbeFault {
            code: Some(ErrorCode::BiometryNotAvailable),
            description: "an Android Context is required; use probe_with_context".to_owned(),
            detail: None,
        }),
        face_disclosure_declared: true,
    }
}

#[allow(clippy::unused_async)]
pub(crate) async fn evaluate(_spec: PromptSpec) -> Result<(), BiometryError> {
    Err(BiometryError::Platform(
        "an Android Context is required; use evaluate_with_context".to_owned(),
    ))
}

/// Query biometric capability through the helper class.
///
/// # Errors
/// Returns [`BiometryError::Platform`] when the helper cannot be loaded or
/// called.
pub fn probe_with_context(env: &mut JNIEnv, context: &JObject) -> Result<Probe, BiometryError> {
    init_with_context(env, context)?;

    let class = helper_class(env)?;
    let payload = env
        .call_static_method(
            class,
            "probe",
            "(Landroid/content/Context;)Ljava/lang/String;",
            &[JValue::Object(context)],
        )
        .map_err(|e| platform_err("probe call", e))?
        .l()
        .map_err(|e| platform_err("probe result", e))?;

    let payload: String = env
        .get_string((&payload).into())
        .map_err(|e| platform_err("probe string", e))?
        .into();

    let snapshot: ProbePayload = serde_json::from_str(&payload)
        .map_err(|e| platform_err("malformed probe payload", e))?;

    Ok(Probe {
        available: snapshot.available,
        kind: BiometryType::from_raw(snapshot.kind),
        fault: snapshot.description.map(|description| ProbeFault {
            code: snapshot.status_code.map(map_probe_status),
            description,
            detail: None,
        }),
        // Android has no usage-disclosure precondition for face unlock.
        face_disclosure_declared: true,
    })
}

/// Start one prompt evaluation through the helper class.
///
/// Returns the receiver for the single completion callback; awaiting it
/// marshals the outcome back to the calling context.
///
/// # Errors
/// Returns [`BiometryError::Platform`] when the helper cannot be loaded or
/// called.
pub fn evaluate_with_context(
    env: &mut JNIEnv,
    context: &JObject,
    spec: &PromptSpec,
) -> Result<tokio::sync::oneshot::Receiver<Result<(), BiometryError>>, BiometryError> {
    init_with_context(env, context)?;

    let spec_json = serde_json::to_string(spec)
        .map_err(|e| platform_err("failed to serialize prompt spec", e))?;

    let (tx, rx) = tokio::sync::oneshot::channel();
    let sender_ptr = Box::into_raw(Box::new(tx)) as jlong;

    let spec_jstr = env
        .new_string(&spec_json)
        .map_err(|e| platform_err("new_string", e))?;

    let class = helper_class(env)?;
    env.call_static_method(
        class,
        "authenticate",
        "(Landroid/content/Context;Ljava/lang/String;J)V",
        &[
            JValue::Object(context),
            JValue::Object(&spec_jstr),
            JValue::Long(sender_ptr),
        ],
    )
    .map_err(|e| {
        // Reclaim the sender on failure so it is not leaked.
        let _ = unsafe { Box::from_raw(sender_ptr as *mut PromptSender) };
        platform_err("authenticate call", e)
    })?;

    Ok(rx)
}
