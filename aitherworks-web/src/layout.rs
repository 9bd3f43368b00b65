//! Element ids and display rules of the status overlay markup in `www/index.html`.

pub const STATUS_ID: &str = "status";
pub const PROGRESS_ID: &str = "status-progress";
pub const PROGRESS_INNER_ID: &str = "status-progress-inner";
pub const INDETERMINATE_ID: &str = "status-indeterminate";
pub const NOTICE_ID: &str = "status-notice";
pub const FAILURE_ID: &str = "status-failure";

/// CSS `display` value for an overlay element. The `#status` root is a flex
/// container that centers its content.
pub fn display(id: &str, visible: bool) -> &'static str {
    match (visible, id) {
        (false, _) => "none",
        (true, STATUS_ID) => "flex",
        (true, _) => "block",
    }
}
