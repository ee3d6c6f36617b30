//! The closed set of operations, one enum per resource.
use std::fmt;

use crate::error::NodeError;

macro_rules! operations {
    ($name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            fn parse(operation: &str) -> Option<Self> {
                match operation {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

operations!(SessionOperation {
    Get => "get",
    GetAll => "getAll",
    GetConsoleLogs => "getConsoleLogs",
    GetErrors => "getErrors",
    GetEvents => "getEvents",
    GetNetworkRequests => "getNetworkRequests",
    GetPerformance => "getPerformance",
    GetSessionUrl => "getSessionUrl",
});

operations!(UserOperation {
    GetAll => "getAll",
    Get => "get",
    GetSessions => "getSessions",
    GetTraits => "getTraits",
    Identify => "identify",
    GetActivity => "getActivity",
});

operations!(IssueOperation {
    GetAll => "getAll",
    Get => "get",
    GetSessions => "getSessions",
    Resolve => "resolve",
    Ignore => "ignore",
    Assign => "assign",
});

operations!(ErrorOperation {
    GetAll => "getAll",
    Get => "get",
    GetSessions => "getSessions",
    GetStackTrace => "getStackTrace",
    GetOccurrences => "getOccurrences",
});

operations!(EventOperation {
    GetAll => "getAll",
    Get => "get",
    GetSessions => "getSessions",
    GetMetrics => "getMetrics",
});

operations!(HighlightOperation {
    GetForUser => "getForUser",
    GetForSession => "getForSession",
    GetForTimeRange => "getForTimeRange",
});

operations!(MetricOperation {
    GetPageViews => "getPageViews",
    GetSessionMetrics => "getSessionMetrics",
    GetErrorMetrics => "getErrorMetrics",
    GetPerformanceMetrics => "getPerformanceMetrics",
    GetCustomMetrics => "getCustomMetrics",
});

operations!(FunnelOperation {
    GetAll => "getAll",
    Get => "get",
    Create => "create",
    Update => "update",
    Delete => "delete",
    GetResults => "getResults",
});

operations!(SegmentOperation {
    GetAll => "getAll",
    Get => "get",
    Create => "create",
    Update => "update",
    Delete => "delete",
    GetUsers => "getUsers",
});

operations!(AlertOperation {
    GetAll => "getAll",
    Get => "get",
    Create => "create",
    Update => "update",
    Delete => "delete",
    Enable => "enable",
    Disable => "disable",
});

operations!(TeamOperation {
    GetAll => "getAll",
    Get => "get",
    Invite => "invite",
    Remove => "remove",
    UpdateRole => "updateRole",
});

operations!(ProjectOperation {
    GetAll => "getAll",
    Get => "get",
    Update => "update",
    GetSdkConfig => "getSDKConfig",
});

/// An operation on a resource, resolved from the names a workflow host uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Session(SessionOperation),
    User(UserOperation),
    Issue(IssueOperation),
    Error(ErrorOperation),
    Event(EventOperation),
    Highlight(HighlightOperation),
    Metric(MetricOperation),
    Funnel(FunnelOperation),
    Segment(SegmentOperation),
    Alert(AlertOperation),
    Team(TeamOperation),
    Project(ProjectOperation),
}

impl Operation {
    pub fn parse(resource: &str, operation: &str) -> Result<Operation, NodeError> {
        let parsed = match resource {
            "session" => SessionOperation::parse(operation).map(Operation::Session),
            "user" => UserOperation::parse(operation).map(Operation::User),
            "issue" => IssueOperation::parse(operation).map(Operation::Issue),
            "error" => ErrorOperation::parse(operation).map(Operation::Error),
            "event" => EventOperation::parse(operation).map(Operation::Event),
            "highlight" => HighlightOperation::parse(operation).map(Operation::Highlight),
            "metric" => MetricOperation::parse(operation).map(Operation::Metric),
            "funnel" => FunnelOperation::parse(operation).map(Operation::Funnel),
            "segment" => SegmentOperation::parse(operation).map(Operation::Segment),
            "alert" => AlertOperation::parse(operation).map(Operation::Alert),
            "team" => TeamOperation::parse(operation).map(Operation::Team),
            "project" => ProjectOperation::parse(operation).map(Operation::Project),
            _ => None,
        };

        parsed.ok_or_else(|| NodeError::UnsupportedOperation {
            resource: resource.to_owned(),
            operation: operation.to_owned(),
        })
    }

    pub fn resource(&self) -> &'static str {
        match self {
            Operation::Session(_) => "session",
            Operation::User(_) => "user",
            Operation::Issue(_) => "issue",
            Operation::Error(_) => "error",
            Operation::Event(_) => "event",
            Operation::Highlight(_) => "highlight",
            Operation::Metric(_) => "metric",
            Operation::Funnel(_) => "funnel",
            Operation::Segment(_) => "segment",
            Operation::Alert(_) => "alert",
            Operation::Team(_) => "team",
            Operation::Project(_) => "project",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Session(op) => op.as_str(),
            Operation::User(op) => op.as_str(),
            Operation::Issue(op) => op.as_str(),
            Operation::Error(op) => op.as_str(),
            Operation::Event(op) => op.as_str(),
            Operation::Highlight(op) => op.as_str(),
            Operation::Metric(op) => op.as_str(),
            Operation::Funnel(op) => op.as_str(),
            Operation::Segment(op) => op.as_str(),
            Operation::Alert(op) => op.as_str(),
            Operation::Team(op) => op.as_str(),
            Operation::Project(op) => op.as_str(),
        }
    }

    /// Every supported operation.
    #[cfg(test)]
    pub(crate) fn all() -> Vec<Operation> {
        let mut all = Vec::new();
        all.extend(SessionOperation::ALL.iter().copied().map(Operation::Session));
        all.extend(UserOperation::ALL.iter().copied().map(Operation::User));
        all.extend(IssueOperation::ALL.iter().copied().map(Operation::Issue));
        all.extend(ErrorOperation::ALL.iter().copied().map(Operation::Error));
        all.extend(EventOperation::ALL.iter().copied().map(Operation::Event));
        all.extend(HighlightOperation::ALL.iter().copied().map(Operation::Highlight));
        all.extend(MetricOperation::ALL.iter().copied().map(Operation::Metric));
        all.extend(FunnelOperation::ALL.iter().copied().map(Operation::Funnel));
        all.extend(SegmentOperation::ALL.iter().copied().map(Operation::Segment));
        all.extend(AlertOperation::ALL.iter().copied().map(Operation::Alert));
        all.extend(TeamOperation::ALL.iter().copied().map(Operation::Team));
        all.extend(ProjectOperation::ALL.iter().copied().map(Operation::Project));
        all
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.resource(), self.name())
    }
}
