use super::{commands::CommandResult, exit_status::ExitStatus};

/// Warnings never fail a run; any error-severity issue does.
pub fn exit_status_from_result(result: &CommandResult) -> ExitStatus {
    if result.error_count > 0 {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    }
}
