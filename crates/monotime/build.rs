use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

const SOURCES: &[&str] = &["qpc", "micros", "nanos", "portable"];

fn select_source() -> &'static str {
    let portable = env::var_os("CARGO_FEATURE_PORTABLE").is_some();
    let legacy_micros = env::var_os("CARGO_FEATURE_LEGACY_MICROS").is_some();
    let windows = env::var_os("CARGO_CFG_WINDOWS").is_some();
    let family = env::var("CARGO_CFG_TARGET_FAMILY").unwrap_or_default();
    let unix = family.split(',').any(|f| f == "unix");

    if portable {
        return "portable";
    }

    if legacy_micros && !unix {
        println!("cargo:warning=feature `legacy-micros` only applies to unix targets; ignoring");
    }

    if windows {
        "qpc"
    } else if unix && legacy_micros {
        "micros"
    } else if unix {
        "nanos"
    } else {
        "portable"
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_PORTABLE");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_LEGACY_MICROS");

    let values = SOURCES
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join(", ");
    println!("cargo:rustc-check-cfg=cfg(monotime_clock, values({}))", values);

    let source = select_source();
    println!("cargo:rustc-cfg=monotime_clock=\"{}\"", source);

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("clock_source.rs");
    let mut f = fs::File::create(&dest_path).unwrap();

    let content = format!(
        "/// Name of the clock source selected for this build.\npub const CLOCK_SOURCE: &str = \"{}\";\n",
        source
    );

    f.write_all(content.as_bytes()).unwrap();
}
