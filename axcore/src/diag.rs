//! Session diagnostics.
//!
//! Codegen failures must reach the host attributed to the method/type that
//! caused them, not vanish into a log file. The `ax*!` macros record a
//! structured [`Diagnostic`] on the session and forward it through the `log`
//! facade; the host reads the collected diagnostics after each unit.
use strum::FromRepr;

/// Diagnostic severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, FromRepr)]
#[repr(u32)]
pub enum Severity {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Severity {
    pub fn log_level(self) -> log::Level {
        match self {
            Severity::Trace => log::Level::Trace,
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warn => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

/// One recorded diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub timepoint: chrono::NaiveDateTime,
    pub message: String,
    pub module: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

#[macro_export]
macro_rules! axdiag {
    (
        $session:expr,
        $severity:expr,
        $( $arg:tt )*
    ) => {
        {
            let diagnostic = $crate::diag::Diagnostic {
                severity: $severity,
                timepoint: $crate::chrono::Local::now().naive_local(),
                message: format!($($arg)*),
                module: module_path!().to_string(),
                file: Some(file!().to_string()),
                line: Some(line!()),
            };
            $session.record(diagnostic);
        }
    };
}

#[macro_export]
macro_rules! axtrace {
    (
        $session:expr,
        $( $arg:tt )*
    ) => {
        $crate::axdiag!(
            $session,
            $crate::diag::Severity::Trace,
            $( $arg )*
        );
    };
}

#[macro_export]
macro_rules! axdebug {
    (
        $session:expr,
        $( $arg:tt )*
    ) => {
        $crate::axdiag!(
            $session,
            $crate::diag::Severity::Debug,
            $( $arg )*
        );
    };
}

#[macro_export]
macro_rules! axinfo {
    (
        $session:expr,
        $( $arg:tt )*
    ) => {
        $crate::axdiag!(
            $session,
            $crate::diag::Severity::Info,
            $( $arg )*
        );
    };
}

#[macro_export]
macro_rules! axwarn {
    (
        $session:expr,
        $( $arg:tt )*
    ) => {
        $crate::axdiag!(
            $session,
            $crate::diag::Severity::Warn,
            $( $arg )*
        );
    };
}

#[macro_export]
macro_rules! axerror {
    (
        $session:expr,
        $( $arg:tt )*
    ) => {
        $crate::axdiag!(
            $session,
            $crate::diag::Severity::Error,
            $( $arg )*
        );
    };
}
