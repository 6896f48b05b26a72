// ABOUTME: Status line helpers for the CLI.
// ABOUTME: Prefixes messages by type and maps library errors to user-facing hints.

use minitools_assets::AssetError;
use minitools_discover::DiscoverError;
use minitools_feed::{ErrorKind, FeedError};
use minitools_feedbin::FeedbinError;
use minitools_instafed::InstafedError;
use minitools_shared::MessageType;

/// Status lines go to stderr so stdout stays machine-readable.
pub fn status(kind: MessageType, message: impl std::fmt::Display) {
    eprintln!("{} {}", kind.symbol(), message);
}

pub fn success(message: impl std::fmt::Display) {
    status(MessageType::Success, message);
}

pub fn info(message: impl std::fmt::Display) {
    status(MessageType::Info, message);
}

pub fn warning(message: impl std::fmt::Display) {
    status(MessageType::Warning, message);
}

/// Category of the first library error in the chain.
pub fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<FeedError>() {
            Some(e.kind())
        } else if let Some(e) = cause.downcast_ref::<DiscoverError>() {
            Some(e.kind())
        } else if let Some(e) = cause.downcast_ref::<FeedbinError>() {
            Some(e.kind())
        } else if let Some(e) = cause.downcast_ref::<InstafedError>() {
            Some(e.kind())
        } else {
            cause.downcast_ref::<AssetError>().map(AssetError::kind)
        }
    })
}

pub fn report_error(err: &anyhow::Error) {
    let kind = error_kind(err);
    let message_type = kind.map_or(MessageType::Error, MessageType::for_error);
    status(message_type, format!("{:#}", err));
    if let Some(kind) = kind.filter(|k| *k != ErrorKind::Unknown) {
        eprintln!("  {}", kind.user_message());
    }
}
