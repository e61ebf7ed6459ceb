// ABOUTME: Builds the copy request payload from decomposed source/target URIs
// ABOUTME: No payload is produced unless both endpoints carry a scheme and host

use super::endpoint::DatabaseEndpoint;
use crate::remote::CopyRequestPayload;

/// Builds the submission payload, or `None` when either endpoint is unusable.
///
/// Checked in this order: source scheme, source host, target host, target scheme.
pub fn build_payload(
    source: Option<&DatabaseEndpoint>,
    target: Option<&DatabaseEndpoint>,
    user: Option<&str>,
) -> Option<CopyRequestPayload> {
    let (source, target) = (source?, target?);
    if !(source.has_scheme() && source.has_host() && target.has_host() && target.has_scheme()) {
        return None;
    }

    Some(CopyRequestPayload {
        src_host: source.host_port(),
        src_incl_db: source.database_name.clone(),
        tgt_host: target.host_port(),
        tgt_db_name: target.database_name.clone(),
        user: user.map(str::to_string),
    })
}

/// Payload sent on submission: built from the URIs when possible, otherwise
/// the raw payload from configuration, if any.
pub fn resolve_payload(
    source_db_uri: Option<&str>,
    target_db_uri: Option<&str>,
    user: Option<&str>,
    configured: Option<&str>,
) -> Option<String> {
    let source = DatabaseEndpoint::parse(source_db_uri);
    let target = DatabaseEndpoint::parse(target_db_uri);

    build_payload(source.as_ref(), target.as_ref(), user)
        .map(|payload| payload.to_wire())
        .or_else(|| configured.map(str::to_string))
}
