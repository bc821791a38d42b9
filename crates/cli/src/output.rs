//! Human-readable rendering of devices and cooks.

use meater_client::{Cook, Device, DeviceList};

/// Shorten long probe ids for display.
pub fn short_id(id: &str) -> String {
    if id.chars().count() > 12 {
        let head: String = id.chars().take(12).collect();
        format!("{}...", head)
    } else {
        id.to_string()
    }
}

fn format_cook(cook: &Cook) -> String {
    let time = cook.time();
    let remaining = if time.remaining_known() {
        format!("{:.0}m left", time.remaining_mins())
    } else {
        "estimating".to_string()
    };
    format!(
        "  cook \"{}\": {}, target {:.1}°C, peak {:.1}°C, {:.0}m elapsed, {}",
        cook.name(),
        cook.state(),
        cook.temperature().target(),
        cook.temperature().peak(),
        time.elapsed_mins(),
        remaining,
    )
}

/// One or two lines: the probe, then its cook if any.
pub fn format_device(device: &Device) -> String {
    let temp = device.temperature();
    let mut out = format!(
        "{}  internal {:.1}°C  ambient {:.1}°C  updated {}",
        short_id(device.id()),
        temp.internal(),
        temp.ambient(),
        device.updated_at(),
    );
    match device.cook() {
        Some(cook) => {
            out.push('\n');
            out.push_str(&format_cook(cook));
        }
        None => out.push_str("  (no cook)"),
    }
    out
}

pub fn format_device_list(devices: &DeviceList) -> String {
    devices.iter().map(format_device).collect::<Vec<_>>().join("\n")
}
