//! Forwarding of driver debug messages into the `log` facade.

use glow::HasContext;

/// `log` level for a `GL_DEBUG_SEVERITY_*` value.
pub fn severity_level(severity: u32) -> log::Level {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => log::Level::Error,
        glow::DEBUG_SEVERITY_MEDIUM => log::Level::Warn,
        glow::DEBUG_SEVERITY_LOW => log::Level::Info,
        _ => log::Level::Debug,
    }
}

/// Installs a debug callback on `gl` if the context supports it.
///
/// Messages are informational only and never change control flow.
pub fn install(gl: &mut glow::Context) -> bool {
    if !gl.supports_debug() {
        log::info!("debug output not supported by this context");
        return false;
    }

    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(move |source, ty, id, severity, message| {
            log::log!(
                target: "gl",
                severity_level(severity),
                "[source=0x{source:X}; type=0x{ty:X}; id=0x{id:X}] {message}"
            );
        });
    }
    log::debug!("debug output enabled");
    true
}
