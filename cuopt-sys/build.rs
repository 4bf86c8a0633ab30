use std::env;
use std::path::PathBuf;

fn main() {
    // cuOpt ships either as a standalone install or inside a conda environment
    let cuopt_home = env::var("CUOPT_HOME")
        .or_else(|_| env::var("CONDA_PREFIX"))
        .expect("CUOPT_HOME or CONDA_PREFIX environment variable must be set");

    let cuopt_path = PathBuf::from(&cuopt_home);
    let include_path = cuopt_path.join("include");
    let lib_path = cuopt_path.join("lib");
    let header = include_path
        .join("cuopt")
        .join("linear_programming")
        .join("cuopt_c.h");

    if !header.exists() {
        panic!("cuOpt C API header not found at: {}", header.display());
    }
    if !lib_path.exists() {
        panic!(
            "cuOpt library directory not found at: {}",
            lib_path.display()
        );
    }

    println!("cargo:rerun-if-env-changed=CUOPT_HOME");
    println!("cargo:rerun-if-env-changed=CONDA_PREFIX");

    println!("cargo:rustc-link-search=native={}", lib_path.display());
    println!("cargo:rustc-link-lib=dylib=cuopt");

    if cfg!(target_os = "linux") || cfg!(target_os = "macos") {
        println!("cargo:rustc-link-arg=-Wl,-rpath,{}", lib_path.display());
    }

    let bindings = bindgen::Builder::default()
        .header(header.to_string_lossy())
        .clang_arg(format!("-I{}", include_path.display()))
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .allowlist_function("cuOpt.*")
        .allowlist_type("cuOpt.*")
        .allowlist_type("cuopt_.*")
        .allowlist_var("CUOPT_.*")
        .generate()
        .expect("Unable to generate bindings");

    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());
    bindings
        .write_to_file(out_path.join("bindings.rs"))
        .expect("Couldn't write bindings!");
}
