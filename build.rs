use std::cmp::Ordering;
use std::env;
use std::process::Command;

// Every cfg flag the crate may be built with. Exactly one is emitted.
const CATALOG_FLAGS: [&str; 5] = ["avx512", "avx2", "sse", "neon", "fallback"];

// Name of the environment variable overriding detection.
const CATALOG_OVERRIDE: &str = "FIXSIMD_CATALOG";

// CPU features we want to detect
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    cfg_flag: &'static str,
    detected: bool,
}

impl CpuFeature {
    // Define priority order between CPU Features (Lowest number == Highest Priority)
    fn priority(&self) -> usize {
        match self.name {
            "avx512f" => 0,
            "avx2" => 1,
            "sse4_1" => 2,
            "neon" => 3,
            _ => usize::MAX, // lowest priority by default
        }
    }

    // Groups all CPU features that map to a chunk catalog of this crate.
    // The widest register a feature unlocks decides the catalog.
    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "sse4_1",
                cfg_flag: "sse",
                detected: false,
            },
            CpuFeature {
                name: "avx512f",
                cfg_flag: "avx512",
                detected: false,
            },
            CpuFeature {
                name: "avx2",
                cfg_flag: "avx2",
                detected: false,
            },
            CpuFeature {
                name: "neon",
                cfg_flag: "neon",
                detected: false,
            },
        ]
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Feature detection trait to make implementations more modular
trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

// Linux CPU feature detector
struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
            let contents = cpuinfo.to_lowercase();
            for feature in features.iter_mut() {
                // aarch64 kernels report NEON as "asimd"
                feature.detected = match feature.name {
                    "neon" => contents.contains("asimd") || contents.contains(" neon"),
                    name => contents.contains(name),
                };
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

// macOS CPU feature detector
struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let output = Command::new("sysctl").args(["-a"]).output();

        if let Ok(output) = output {
            let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();

            for feature in features.iter_mut() {
                match feature.name {
                    "avx512f" => feature.detected = contents.contains("hw.optional.avx512f: 1"),
                    "avx2" => feature.detected = contents.contains("hw.optional.avx2_0: 1"),
                    "sse4_1" => feature.detected = contents.contains("hw.optional.sse4_1: 1"),
                    "neon" => feature.detected = contents.contains("hw.optional.neon: 1"),
                    _ => {}
                }
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

// No windows detector for now, Windows builds use the per-arch default.

// Factory that creates the appropriate detector for the current OS
struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn detect_cpu_features(features: &mut [CpuFeature]) {
        // Get detectors for all supported platforms
        let detectors = Self::cpu_features_detectors();

        // Find the applicable detector and use it
        for detector in detectors {
            if detector.is_applicable() {
                detector.detect_features(features);
                break;
            }
        }
    }

    // Catalog used when nothing was detected (cross builds, unknown OS).
    // x86_64 always has 128-bit SSE2 and aarch64 always has NEON.
    fn arch_default() -> &'static str {
        match env::var("CARGO_CFG_TARGET_ARCH").as_deref() {
            Ok("x86_64") => "sse",
            Ok("aarch64") => "neon",
            _ => "fallback",
        }
    }

    fn select(features: &mut [CpuFeature]) -> &'static str {
        if let Ok(forced) = env::var(CATALOG_OVERRIDE) {
            let forced = forced.trim().to_lowercase();
            if let Some(flag) = CATALOG_FLAGS.iter().find(|flag| **flag == forced) {
                return flag;
            }
            println!("cargo:warning={CATALOG_OVERRIDE}={forced} is not one of {CATALOG_FLAGS:?}, ignoring");
        }

        // Sort features by priority (highest first)
        features.sort();

        // Find and use the highest detected feature (if any)
        features
            .iter()
            .find(|cpu_feature| cpu_feature.detected)
            .map(|cpu_feature| cpu_feature.cfg_flag)
            .unwrap_or_else(Self::arch_default)
    }

    fn apply(features: &mut [CpuFeature]) {
        let cfg_flag = Self::select(features);

        println!("cargo:rustc-cfg={cfg_flag}");

        for flag in CATALOG_FLAGS {
            println!("cargo::rustc-check-cfg=cfg({flag})");
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed={CATALOG_OVERRIDE}");

    let mut features = CpuFeature::features();

    // Determine if we're cross-compiling
    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();

    let is_native_build = host == target;

    // Only run CPU detection for native builds
    if is_native_build {
        PlatformDetector::detect_cpu_features(&mut features);
    }

    PlatformDetector::apply(&mut features);
}
