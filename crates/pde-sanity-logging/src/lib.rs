//! ---
//! pds_section: "03-logging"
//! pds_subsection: "module"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Structured sweep logging context and event helpers."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
//! Sweep-aware logging on top of `tracing`. Every event carries the grid
//! coordinates of the run it belongs to, empty when logged outside a run.
#![warn(missing_docs)]

use pde_sanity_common::{Domain, Flux, SolverMethod};
use tracing::Level;

pub mod macros;

/// Grid coordinates attached to sweep log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SweepContext {
    /// Domain of the current run.
    pub domain: Option<Domain>,
    /// Flux of the current run.
    pub flux: Option<Flux>,
    /// Solver method of the current run.
    pub method: Option<SolverMethod>,
    /// One-based position of the run in the sweep.
    pub run: Option<usize>,
}

impl SweepContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a domain.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Attach a flux.
    pub fn with_flux(mut self, flux: Flux) -> Self {
        self.flux = Some(flux);
        self
    }

    /// Attach a solver method.
    pub fn with_method(mut self, method: SolverMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Attach the run position.
    pub fn with_run(mut self, run: usize) -> Self {
        self.run = Some(run);
        self
    }

    #[doc(hidden)]
    pub fn domain_str(&self) -> &'static str {
        self.domain.map(<&'static str>::from).unwrap_or("")
    }

    #[doc(hidden)]
    pub fn flux_str(&self) -> &'static str {
        self.flux.map(<&'static str>::from).unwrap_or("")
    }

    #[doc(hidden)]
    pub fn method_str(&self) -> &'static str {
        self.method.map(<&'static str>::from).unwrap_or("")
    }
}

/// Outcome recorded on lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepEventOutcome {
    /// The step completed successfully.
    Success,
    /// The step failed and the sweep is aborting.
    Fault,
}

impl SweepEventOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            SweepEventOutcome::Success => "success",
            SweepEventOutcome::Fault => "fault",
        }
    }
}

/// Emit a standardized sweep lifecycle event.
///
/// Lifecycle events are recorded at info level whatever the outcome. The
/// binary reports failures to the user itself, so faults stay out of the
/// default `warn` stream.
pub fn log_sweep_event(
    context: Option<&SweepContext>,
    event: &str,
    message: &str,
    outcome: SweepEventOutcome,
) {
    let ctx = context.copied().unwrap_or_default();
    tracing::event!(
        Level::INFO,
        event,
        outcome = outcome.as_str(),
        domain = ctx.domain_str(),
        flux = ctx.flux_str(),
        method = ctx.method_str(),
        run = ctx.run.unwrap_or_default(),
        message = %message
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let sink = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink.clone())
            .with_ansi(false)
            .with_max_level(Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn macros_attach_sweep_coordinates() {
        let ctx = SweepContext::new()
            .with_domain(Domain::Real)
            .with_flux(Flux::Burgers)
            .with_method(SolverMethod::Leapfrog)
            .with_run(3);
        let output = capture(|| {
            sweep_info!(context = ctx, "run finished");
            sweep_debug!("harness state {}", "GuardChecked");
        });
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("run finished"));
        assert!(lines[0].contains("burgers"));
        assert!(lines[0].contains("leapfrog"));
        assert!(lines[0].contains("run=3"));
        assert!(lines[1].contains("DEBUG"));
        assert!(lines[1].contains("harness state GuardChecked"));
    }

    #[test]
    fn context_strings_default_to_empty() {
        let ctx = SweepContext::new().with_flux(Flux::BuckleyLeverett);
        assert_eq!(ctx.domain_str(), "");
        assert_eq!(ctx.flux_str(), "buckley_leverett");
        assert_eq!(ctx.method_str(), "");
    }

    #[test]
    fn fault_events_stay_below_warn() {
        let ctx = SweepContext::new().with_domain(Domain::Affine).with_run(17);
        let output = capture(|| {
            log_sweep_event(
                Some(&ctx),
                "sweep.run",
                "run 17/32 failed",
                SweepEventOutcome::Fault,
            );
            log_sweep_event(None, "sweep.done", "32 runs", SweepEventOutcome::Success);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.contains("INFO")));
        assert!(!output.contains("ERROR"));
        assert!(!output.contains("WARN"));
        assert!(lines[0].contains("sweep.run"));
        assert!(lines[0].contains("fault"));
        assert!(lines[0].contains("affine"));
        assert!(lines[1].contains("success"));
    }
}
