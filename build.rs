fn main() {
    // Tauri build (desktop shell only; the headless runner needs no codegen)
    #[cfg(feature = "desktop")]
    tauri_build::build();

    println!("cargo:rerun-if-changed=tauri.conf.json");
    println!("cargo:rerun-if-changed=config/simulation.json");
}
