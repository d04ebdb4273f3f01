/// Structured logging for SWOT data retrieval.
///
/// Provides context-rich logging with reach/node identifiers, timestamps,
/// and severity levels. Supports both console output and file-based logging
/// for long-running pulls.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Hydrocron,
    Sword,
    Vdatum,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Hydrocron => write!(f, "HYDROCRON"),
            DataSource::Sword => write!(f, "SWORD"),
            DataSource::Vdatum => write!(f, "VDATUM"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the node may simply have no observation in the
    /// requested window, which Hydrocron reports as an error.
    Expected,
    /// Unexpected failure - indicates service degradation or an API change.
    Unexpected,
    /// Unknown - cannot determine if this is expected or not.
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        *LOGGER.lock().unwrap() = Some(logger);
    }

    /// Log a message with the global logger
    fn log(&self, level: LogLevel, source: &DataSource, feature_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

        // Format the log entry
        let feature_part = feature_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, source, feature_part, message
        );

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, feature_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, feature_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

/// Log a general informational message
pub fn info(source: DataSource, feature_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, &source, feature_id, message);
    }
}

/// Log a warning message
pub fn warn(source: DataSource, feature_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, &source, feature_id, message);
    }
}

/// Log an error message
pub fn error(source: DataSource, feature_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, &source, feature_id, message);
    }
}

/// Log a debug message
pub fn debug(source: DataSource, feature_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, &source, feature_id, message);
    }
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a per-node fetch failure based on the error message.
pub fn classify_node_failure(_node_id: &str, error_message: &str) -> FailureType {
    // Hydrocron reports "no results" for a node with no observation in the
    // requested window via the error key; that is routine, not degradation.
    if error_message.contains("404")
        || error_message.contains("no results")
        || error_message.contains("No data")
    {
        FailureType::Expected
    }
    // HTTP errors might indicate service issues
    else if error_message.contains("HTTP error") || error_message.contains("Network error") {
        FailureType::Unexpected
    }
    // Parse errors suggest API changes or bugs
    else if error_message.contains("Parse error") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

/// Log a skipped node with automatic classification.
pub fn log_node_failure(node_id: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_node_failure(node_id, &error_msg);

    let message = format!("node fetch failed [{}]: {}", failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(DataSource::Hydrocron, Some(node_id), &message),
        FailureType::Unexpected => error(DataSource::Hydrocron, Some(node_id), &message),
        FailureType::Unknown => warn(DataSource::Hydrocron, Some(node_id), &message),
    }
}

// ---------------------------------------------------------------------------
// Profile Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a long-profile pull across all nodes of a reach.
pub fn log_profile_summary(reach_id: &str, total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Node pull complete: {}/{} successful, {} failed",
        successful, total, failed
    );

    if failed == 0 {
        info(DataSource::Hydrocron, Some(reach_id), &message);
    } else if successful == 0 {
        error(DataSource::Hydrocron, Some(reach_id), &message);
    } else {
        warn(DataSource::Hydrocron, Some(reach_id), &message);
    }
}
