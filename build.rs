fn main() {
    // toml-cfg reads the provisioning file at compile time.
    println!("cargo:rerun-if-changed=cfg.toml");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
