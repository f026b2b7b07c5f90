//! Build script for shellkit-biometry.

fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

    if target_os == "ios" || target_os == "macos" {
        apple::generate_bridge();
    }

    if target_os == "android" {
        android::build_helper_dex();
    }
}

// Apple targets are only ever built from Apple hosts, which is where the
// bridge generator dependency is available.
#[cfg(any(target_os = "macos", target_os = "ios"))]
mod apple {
    use std::env;
    use std::path::PathBuf;

    pub fn generate_bridge() {
        let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
        let pkg_name = env::var("CARGO_PKG_NAME").unwrap();

        println!("cargo:rerun-if-changed=src/sys/apple/mod.rs");
        println!("cargo:rustc-link-lib=framework=LocalAuthentication");

        swift_bridge_build::parse_bridges(vec!["src/sys/apple/mod.rs"])
            .write_all_concatenated(out_dir, &pkg_name);
    }
}

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
mod apple {
    pub fn generate_bridge() {}
}

mod android {
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::process::Command;

    const HELPER_SOURCE: &str = "src/sys/android/BiometryHelper.java";

    /// Compiles the Java helper against the SDK's android.jar and packages
    /// it as the DEX embedded by `src/sys/android/mod.rs`.
    pub fn build_helper_dex() {
        let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
        let sdk_root = env::var("ANDROID_HOME")
            .or_else(|_| env::var("ANDROID_SDK_ROOT"))
            .expect("ANDROID_HOME or ANDROID_SDK_ROOT must be set for Android builds");
        let sdk_root = PathBuf::from(sdk_root);

        let platform = env::var("ANDROID_PLATFORM").unwrap_or_else(|_| "android-35".to_owned());
        let android_jar = sdk_root.join("platforms").join(platform).join("android.jar");

        println!("cargo:rerun-if-changed={HELPER_SOURCE}");

        let classes_dir = out_dir.join("classes");
        fs::create_dir_all(&classes_dir).expect("failed to create class output directory");

        run(Command::new("javac")
            .arg("-classpath")
            .arg(&android_jar)
            .arg("-d")
            .arg(&classes_dir)
            .arg(HELPER_SOURCE));

        let class_files = collect_class_files(&classes_dir);
        assert!(!class_files.is_empty(), "javac produced no class files");

        run(Command::new(d8_tool(&sdk_root))
            .arg("--lib")
            .arg(&android_jar)
            .arg("--output")
            .arg(&out_dir)
            .args(&class_files));
    }

    fn collect_class_files(dir: &std::path::Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let mut pending = vec![dir.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir).expect("failed to read class output directory") {
                let path = entry.expect("failed to read directory entry").path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "class") {
                    files.push(path);
                }
            }
        }
        files
    }

    /// The d8 dexer from the newest installed build-tools.
    fn d8_tool(sdk_root: &std::path::Path) -> PathBuf {
        let build_tools = sdk_root.join("build-tools");
        let mut versions: Vec<PathBuf> = fs::read_dir(&build_tools)
            .expect("no build-tools directory in the Android SDK")
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .collect();
        versions.sort();
        versions
            .pop()
            .expect("no build-tools installed in the Android SDK")
            .join("d8")
    }

    fn run(command: &mut Command) {
        let status = command
            .status()
            .unwrap_or_else(|err| panic!("failed to spawn {command:?}: {err}"));
        assert!(status.success(), "{command:?} exited with {status}");
    }
}
