use std::fmt;

/// Lifecycle of one job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobState {
    Received,
    Downloading,
    Analyzing,
    Reported,
    Extracting,
    Distributing,
    Summarized,
    /// Terminal, success path.
    Cleaned,
    /// Terminal, failure path.
    Aborted,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cleaned | Self::Aborted)
    }

    /// The state the happy path moves to next.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Downloading),
            Self::Downloading => Some(Self::Analyzing),
            Self::Analyzing => Some(Self::Reported),
            Self::Reported => Some(Self::Extracting),
            Self::Extracting => Some(Self::Distributing),
            Self::Distributing => Some(Self::Summarized),
            Self::Summarized => Some(Self::Cleaned),
            Self::Cleaned | Self::Aborted => None,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Downloading => "downloading",
            Self::Analyzing => "analyzing",
            Self::Reported => "reported",
            Self::Extracting => "extracting",
            Self::Distributing => "distributing",
            Self::Summarized => "summarized",
            Self::Cleaned => "cleaned",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}
