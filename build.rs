use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds only compile the library for unit tests
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATmega328P
    println!("cargo:rustc-link-arg=-mmcu=atmega328p");

    let mode = if env::var("CARGO_FEATURE_POTENTIOMETER").is_ok() {
        "potentiometer + H-bridge"
    } else {
        "button duty cycle"
    };
    println!("cargo:warning=Building for ATmega328P at 16MHz ({} mode)", mode);
}
