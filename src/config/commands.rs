//! Start command templating.
//!
//! Worker start commands reach the head through a placeholder that the
//! reconciler substitutes when it launches the node. The loader keeps the
//! token exactly as written and only checks that each role has commands.

use crate::config::schema::NodeRole;
use crate::config::structure::RawClusterConfig;
use crate::config::validation::{ValidationError, ValidationReport, ValidationWarning};

/// Token standing in for the head node's address.
pub const HEAD_ADDRESS_PLACEHOLDER: &str = "$RAY_HEAD_IP";

const HEAD_ADDRESS_PLACEHOLDER_BRACED: &str = "${RAY_HEAD_IP}";

/// Whether any command mentions the head-address placeholder.
pub fn references_head_address(commands: &[String]) -> bool {
    commands.iter().any(|command| {
        command.contains(HEAD_ADDRESS_PLACEHOLDER)
            || command.contains(HEAD_ADDRESS_PLACEHOLDER_BRACED)
    })
}

/// Substitute the head address into a command list.
///
/// Called by the reconciler at launch time, never by the loader.
pub fn render_start_commands(commands: &[String], head_address: &str) -> Vec<String> {
    commands
        .iter()
        .map(|command| {
            command
                .replace(HEAD_ADDRESS_PLACEHOLDER_BRACED, head_address)
                .replace(HEAD_ADDRESS_PLACEHOLDER, head_address)
        })
        .collect()
}

/// Both roles need at least one start command.
pub(crate) fn check_start_commands(raw: &RawClusterConfig, report: &mut ValidationReport) {
    for (role, commands) in [
        (NodeRole::Head, &raw.head_start_ray_commands),
        (NodeRole::Worker, &raw.worker_start_ray_commands),
    ] {
        if commands.as_ref().is_some_and(|commands| commands.is_empty()) {
            report.push_error(ValidationError::EmptyCommandList {
                role,
                path: raw.field_path(role.start_commands_field()),
            });
        }
    }

    if let Some(worker) = &raw.worker_start_ray_commands {
        if !worker.is_empty() && !references_head_address(worker) {
            report.push_warning(ValidationWarning::HeadAddressNotReferenced {
                placeholder: HEAD_ADDRESS_PLACEHOLDER,
            });
        }
    }
}
