//! User-facing messages for editor outcomes, kept apart from the editors so
//! those only ever return `Result`.

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// Success text on `Ok`; on failure the error's own message, or `fallback`
    /// when that is empty.
    pub fn from_result<T>(
        result: &Result<T, ClientError>,
        success: impl Into<String>,
        fallback: &str,
    ) -> Self {
        match result {
            Ok(_) => Self::success(success),
            Err(err) => {
                let message = err.to_string();
                if message.trim().is_empty() {
                    Self::error(fallback)
                } else {
                    Self::error(message)
                }
            }
        }
    }
}

pub fn board_saved(result: &Result<(), ClientError>) -> Notice {
    Notice::from_result(result, "Board Members saved!", "Failed to save board members")
}

pub fn board_member_deleted(result: &Result<(), ClientError>) -> Notice {
    Notice::from_result(result, "Member deleted", "Delete failed")
}

/// `created` is what [`crate::editors::EventsEditor::save`] returned.
pub fn event_saved(result: &Result<bool, ClientError>) -> Notice {
    let success = match result {
        Ok(true) => "Event created!",
        _ => "Event updated!",
    };
    Notice::from_result(result, success, "Error saving event")
}

pub fn event_deleted(result: &Result<(), ClientError>) -> Notice {
    Notice::from_result(result, "Event deleted", "Error deleting event")
}

pub fn hero_saved(result: &Result<(), ClientError>) -> Notice {
    Notice::from_result(result, "Hero updated successfully!", "Failed to save hero")
}

pub fn quick_item_created<T>(result: &Result<T, ClientError>) -> Notice {
    Notice::from_result(result, "Item added!", "Failed to add item")
}

pub fn quick_item_deleted(result: &Result<(), ClientError>) -> Notice {
    Notice::from_result(result, "Item deleted", "Failed to delete item")
}
