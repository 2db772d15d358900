use alloc::format;
use alloc::string::String;

/// Trait for structs that provide metadata for logging
pub trait LogMetadata {
    fn meta(&self) -> String;
}

impl<T: LogMetadata + ?Sized> LogMetadata for &T {
    fn meta(&self) -> String {
        (**self).meta()
    }
}

/// Location inside the IED being compiled.
pub struct NodeContext<'a> {
    pub ied: &'a str,
    pub logical_device: &'a str,
    pub logical_node: &'a str,
}

impl LogMetadata for NodeContext<'_> {
    fn meta(&self) -> String {
        format!(
            "ied={}, ld={}, ln={}",
            self.ied, self.logical_device, self.logical_node
        )
    }
}

// =============================================
// Logging Macros (namespaced under crate::log)
// =============================================

// ===== scl_info! =====
macro_rules! scl_info {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        let meta = $crate::log::LogMetadata::meta(&$ctx);
        log::info!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
    }};
    ($fmt:literal $(, $($arg:tt)+)?) => {{
        log::info!($fmt $(, $($arg)+)?);
    }};
}

// ===== scl_warn! =====
macro_rules! scl_warn {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        let meta = $crate::log::LogMetadata::meta(&$ctx);
        log::warn!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
    }};
    ($fmt:literal $(, $($arg:tt)+)?) => {{
        log::warn!($fmt $(, $($arg)+)?);
    }};
}

// ===== scl_debug! =====
macro_rules! scl_debug {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        let meta = $crate::log::LogMetadata::meta(&$ctx);
        log::debug!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
    }};
    ($fmt:literal $(, $($arg:tt)+)?) => {{
        log::debug!($fmt $(, $($arg)+)?);
    }};
}

// ===== scl_trace! =====
macro_rules! scl_trace {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        let meta = $crate::log::LogMetadata::meta(&$ctx);
        log::trace!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
    }};
    ($fmt:literal $(, $($arg:tt)+)?) => {{
        log::trace!($fmt $(, $($arg)+)?);
    }};
}

// Re-export macros for use in other files
pub(crate) use scl_debug;
pub(crate) use scl_info;
pub(crate) use scl_trace;
pub(crate) use scl_warn;
