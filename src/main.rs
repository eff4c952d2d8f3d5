//! # adept CLI Entry Point
//!
//! Collects the process arguments (minus the program name), hands them to
//! [`adept::app::run`] and exits with the code it returns.

use adept::app;

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
}

// Progress lines use glyphs like ✓ and ⚡
#[cfg(windows)]
fn enable_windows_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_windows_utf8_console() {}

fn main() {
    enable_windows_utf8_console();

    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let code = app::run(args);
    std::process::exit(code.code());
}
