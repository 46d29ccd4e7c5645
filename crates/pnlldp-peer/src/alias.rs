use crate::error::{LldpError, Result};

/// Joins the port and chassis parts of an alias name.
pub const ALIAS_SEPARATOR: char = '.';

/// Alias name under which a neighbor's port is known to the station.
///
/// A port id that already carries the separator (`port-001.dut`) is the
/// alias as is. Otherwise the alias is `{port_id}.{chassis_id}`.
///
/// `capacity` is the size of the caller's buffer including the terminating
/// NUL. An alias that does not fit is an error; it is never shortened.
pub fn generate_alias_name(port_id: &str, chassis_id: &str, capacity: usize) -> Result<String> {
    if port_id.is_empty() {
        return Err(LldpError::InvalidAlias("empty port id"));
    }

    let alias = if port_id.contains(ALIAS_SEPARATOR) {
        port_id.to_string()
    } else {
        format!("{port_id}{ALIAS_SEPARATOR}{chassis_id}")
    };

    let needed = alias.len() + 1;
    if needed > capacity {
        return Err(LldpError::BufferTooSmall { needed, capacity });
    }
    Ok(alias)
}
