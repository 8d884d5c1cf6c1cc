fn main() {
    // ESP-IDF linker/toolchain environment — only wired up for firmware
    // builds; host-target test builds skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
