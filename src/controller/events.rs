//! Event reporting to external collaborators.
//!
//! The controller publishes every externally visible change as a small
//! `(kind, variable, value, units, message)` record through an observer
//! trait; logging and display collaborators consume it without the core
//! depending on their concrete types.

use heapless::String;

/// Classification tag carried on every report and command response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportKind {
    /// Fire-and-forget success.
    Event,
    /// Rejected command; nothing was mutated.
    Error,
    /// Calibration operation.
    Calibrate,
}

impl ReportKind {
    /// Wire tag for collaborators that serialize reports.
    pub fn tag(self) -> &'static str {
        match self {
            ReportKind::Event => "event",
            ReportKind::Error => "error",
            ReportKind::Calibrate => "calibrate",
        }
    }
}

/// One published state-change or command report.
#[derive(Debug, Clone, PartialEq)]
pub struct EventReport {
    /// Report classification.
    pub kind: ReportKind,
    /// What changed or was requested.
    pub variable: String<25>,
    /// Resulting value, rendered for display.
    pub value: String<20>,
    /// Units of the value, if any.
    pub units: String<20>,
    /// Free-text message attached by the caller.
    pub message: String<63>,
}

impl EventReport {
    /// A success report for `variable` with empty value/units/message.
    pub fn event(variable: &str) -> Self {
        Self {
            kind: ReportKind::Event,
            variable: String::try_from(variable).unwrap_or_default(),
            value: String::new(),
            units: String::new(),
            message: String::new(),
        }
    }

    /// Attach a rendered value.
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = String::try_from(value).unwrap_or_default();
        self
    }

    /// Attach units.
    pub fn with_units(mut self, units: &str) -> Self {
        self.units = String::try_from(units).unwrap_or_default();
        self
    }
}

/// Observer for controller reports.
pub trait EventSink {
    /// Consume one report. Must not block.
    fn publish(&mut self, report: &EventReport);
}

/// Sink that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _report: &EventReport) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_builder() {
        let report = EventReport::event("speed").with_value("12.50").with_units("rpm");
        assert_eq!(report.kind, ReportKind::Event);
        assert_eq!(report.variable.as_str(), "speed");
        assert_eq!(report.value.as_str(), "12.50");
        assert_eq!(report.units.as_str(), "rpm");
        assert!(report.message.is_empty());
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(ReportKind::Event.tag(), "event");
        assert_eq!(ReportKind::Error.tag(), "error");
        assert_eq!(ReportKind::Calibrate.tag(), "calibrate");
    }
}
