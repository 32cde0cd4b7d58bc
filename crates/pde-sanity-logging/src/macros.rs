//! ---
//! pds_section: "03-logging"
//! pds_subsection: "module"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Structured sweep logging context and event helpers."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
/// Shared expansion behind the level-specific sweep macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __sweep_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx: &$crate::SweepContext = &$ctx;
        tracing::event!(
            $level,
            domain = ctx.domain_str(),
            flux = ctx.flux_str(),
            method = ctx.method_str(),
            run = ctx.run.unwrap_or_default(),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Info event carrying the sweep coordinates of `context`, if given.
#[macro_export]
macro_rules! sweep_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__sweep_event!(tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sweep_event!(tracing::Level::INFO, $crate::SweepContext::new(), $($arg)+)
    };
}

/// Debug counterpart of [`sweep_info!`].
#[macro_export]
macro_rules! sweep_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__sweep_event!(tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sweep_event!(tracing::Level::DEBUG, $crate::SweepContext::new(), $($arg)+)
    };
}
